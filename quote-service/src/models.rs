use quote_flow::{Control, FormSession, Presentation, QuoteRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize, Deserialize)]
pub struct FieldUpdateRequest {
    /// Number or string, exactly as a widget would hand it over.
    pub value: Value,
}

impl FieldUpdateRequest {
    pub fn raw_value(&self) -> Option<String> {
        match &self.value {
            Value::Number(number) => Some(number.to_string()),
            Value::String(text) => Some(text.clone()),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub controls: Vec<Control>,
    pub request: QuoteRequest,
    pub last_presentation: Option<Presentation>,
    pub pending: bool,
    pub updated_at: String,
}

impl SessionResponse {
    pub fn new(session: FormSession, pending: bool) -> Self {
        Self {
            session_id: session.id,
            request: session.form.collect(),
            controls: session.form.controls().to_vec(),
            last_presentation: session.last_presentation,
            pending,
            updated_at: session.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub session_id: String,
    #[serde(flatten)]
    pub presentation: Presentation,
}
