use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::request::QuoteRequest;

/// Outcome of one prediction call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PredictionResult {
    /// Estimated annual premium.
    Estimate(f64),
    /// Anything that was not a number, shown to the user verbatim.
    Failure(String),
}

/// The external premium model.
///
/// Implementations answer with a JSON number for an estimate or a JSON string holding
/// an error message. Returning `Err` is treated the same as an error message.
#[async_trait]
pub trait Predictor: Send + Sync {
    async fn predict(&self, request: &QuoteRequest) -> anyhow::Result<Value>;
}

#[async_trait]
impl<F> Predictor for F
where
    F: Fn(&QuoteRequest) -> anyhow::Result<Value> + Send + Sync,
{
    async fn predict(&self, request: &QuoteRequest) -> anyhow::Result<Value> {
        self(request)
    }
}

/// Calls the collaborator once and classifies its answer.
pub async fn submit(predictor: &dyn Predictor, request: &QuoteRequest) -> PredictionResult {
    let result = match predictor.predict(request).await {
        Ok(Value::Number(number)) => match number.as_f64() {
            Some(amount) => PredictionResult::Estimate(amount),
            None => PredictionResult::Failure(number.to_string()),
        },
        Ok(Value::String(message)) => PredictionResult::Failure(message),
        Ok(other) => PredictionResult::Failure(other.to_string()),
        // alternate form keeps the whole context chain, not just the outermost message
        Err(e) => PredictionResult::Failure(format!("{e:#}")),
    };

    match &result {
        PredictionResult::Estimate(amount) => info!(amount, "prediction succeeded"),
        PredictionResult::Failure(message) => warn!(error = %message, "prediction failed"),
    }
    result
}

pub const NOT_CONFIGURED: &str = "Prediction model is not configured";

/// Stand-in used when no model endpoint is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailablePredictor;

#[async_trait]
impl Predictor for UnavailablePredictor {
    async fn predict(&self, _request: &QuoteRequest) -> anyhow::Result<Value> {
        Ok(Value::String(NOT_CONFIGURED.to_string()))
    }
}

#[cfg(feature = "http")]
pub use http::HttpPredictor;

#[cfg(feature = "http")]
mod http {
    use super::*;
    use anyhow::Context as _;

    /// Posts the request payload to a model endpoint and returns the decoded JSON body.
    #[derive(Debug, Clone)]
    pub struct HttpPredictor {
        client: reqwest::Client,
        url: String,
    }

    impl HttpPredictor {
        pub fn new(url: impl Into<String>) -> Self {
            Self {
                client: reqwest::Client::new(),
                url: url.into(),
            }
        }
    }

    #[async_trait]
    impl Predictor for HttpPredictor {
        async fn predict(&self, request: &QuoteRequest) -> anyhow::Result<Value> {
            let response = self
                .client
                .post(&self.url)
                .json(request)
                .send()
                .await
                .with_context(|| format!("prediction request to {} failed", self.url))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                if body.trim().is_empty() {
                    anyhow::bail!("prediction service returned {status}");
                }
                anyhow::bail!("prediction service returned {status}: {}", body.trim());
            }

            response
                .json::<Value>()
                .await
                .context("prediction service returned malformed JSON")
        }
    }
}
