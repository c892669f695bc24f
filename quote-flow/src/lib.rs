//! Input controls, payload shaping and result presentation for a health insurance
//! premium estimator.
//!
//! The premium model itself is an injected [`Predictor`]. This crate owns everything
//! around it: the fixed option table, bounded input controls, the twelve-field request
//! handed to the model, and the formatted result with its summary.

pub mod controls;
pub mod error;
pub mod form;
pub mod options;
pub mod predictor;
pub mod present;
pub mod request;
pub mod runner;
pub mod storage;

// Re-export commonly used types
pub use controls::{Control, NumberInput, SelectBox};
pub use error::{QuoteError, Result};
pub use form::FormState;
pub use options::{FIELDS, Field, FieldKind};
#[cfg(feature = "http")]
pub use predictor::HttpPredictor;
pub use predictor::{NOT_CONFIGURED, PredictionResult, Predictor, UnavailablePredictor, submit};
pub use present::{Presentation, QuoteSummary, RESULT_LABEL, age_group, format_inr, present};
pub use request::QuoteRequest;
pub use runner::QuoteRunner;
pub use storage::{FormSession, InMemorySessionStorage, SessionStorage};
