use thiserror::Error;

use crate::options::Field;

#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("{field} expects a whole number, got {value:?}")]
    InvalidNumber { field: Field, value: String },

    #[error("{value:?} is not an option for {field}")]
    InvalidOption { field: Field, value: String },

    #[error("A submission is already pending for session {0}")]
    SubmissionPending(String),
}

pub type Result<T> = std::result::Result<T, QuoteError>;
