use serde::Serialize;

use crate::{predictor::PredictionResult, request::QuoteRequest};

pub const RESULT_LABEL: &str = "Estimated Annual Health Insurance Cost";
pub const BELOW_25: &str = "Below 25";
pub const FROM_25: &str = "25 and above";

/// What the result area shows after a button press.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Presentation {
    Estimate {
        amount: f64,
        display: String,
        label: &'static str,
        summary: QuoteSummary,
    },
    Error {
        message: String,
    },
}

/// Summary box derived from the request, never from the estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteSummary {
    pub age_group: &'static str,
    pub medical_history: &'static str,
    pub region: &'static str,
    pub selected_plan: &'static str,
}

impl Presentation {
    pub fn is_error(&self) -> bool {
        matches!(self, Presentation::Error { .. })
    }
}

/// Age 25 itself falls in "Below 25"; the form has always grouped it that way.
pub fn age_group(age: u32) -> &'static str {
    if age <= 25 { BELOW_25 } else { FROM_25 }
}

/// Rupee amount with comma thousands separators and no decimals.
pub fn format_inr(amount: f64) -> String {
    let rounded = format!("{amount:.0}");
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", rounded.as_str()),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("₹{sign}{grouped}")
}

pub fn summarize(request: &QuoteRequest) -> QuoteSummary {
    QuoteSummary {
        age_group: age_group(request.age),
        medical_history: request.medical_history,
        region: request.region,
        selected_plan: request.insurance_plan,
    }
}

pub fn present(result: &PredictionResult, request: &QuoteRequest) -> Presentation {
    match result {
        PredictionResult::Estimate(amount) => Presentation::Estimate {
            amount: *amount,
            display: format_inr(*amount),
            label: RESULT_LABEL,
            summary: summarize(request),
        },
        PredictionResult::Failure(message) => Presentation::Error {
            message: message.clone(),
        },
    }
}
