use axum::{
    Form, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware::from_fn,
    response::{Html, Json},
    routing::{get, post, put},
};
use quote_flow::{
    Field, FormState, InMemorySessionStorage, Predictor, QuoteError, QuoteRunner,
    UnavailablePredictor,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use crate::{
    config::ServiceConfig,
    models::{FieldUpdateRequest, PredictResponse, SessionResponse},
    page::render_page,
    telemetry::correlation_id_middleware,
};

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<Value>)>;
type ApiError = (StatusCode, Json<Value>);

fn bad_request_error(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

fn not_found_error(message: &str, id: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": message,
            "session_id": id
        })),
    )
}

fn conflict_error(message: &str, id: &str) -> ApiError {
    (
        StatusCode::CONFLICT,
        Json(json!({
            "error": message,
            "session_id": id
        })),
    )
}

fn internal_error(message: &str, details: &str) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": message,
            "details": details
        })),
    )
}

fn quote_error(session_id: &str, e: QuoteError) -> ApiError {
    match e {
        QuoteError::SessionNotFound(_) => not_found_error("Session not found", session_id),
        QuoteError::UnknownField(_) => not_found_error(&e.to_string(), session_id),
        QuoteError::InvalidNumber { .. } | QuoteError::InvalidOption { .. } => {
            bad_request_error(&e.to_string())
        }
        QuoteError::SubmissionPending(_) => {
            conflict_error("A prediction is already running", session_id)
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub runner: QuoteRunner,
}

impl AppState {
    pub fn new(predictor: Arc<dyn Predictor>) -> Self {
        Self {
            runner: QuoteRunner::new(predictor, Arc::new(InMemorySessionStorage::new())),
        }
    }
}

pub fn create_predictor(config: &ServiceConfig) -> Arc<dyn Predictor> {
    match &config.predictor_url {
        Some(url) => {
            info!(url = %url, "Using HTTP prediction model");
            Arc::new(quote_flow::HttpPredictor::new(url.clone()))
        }
        None => {
            warn!("PREDICTOR_URL not set; predictions will report that no model is configured");
            Arc::new(UnavailablePredictor)
        }
    }
}

pub fn create_app(config: &ServiceConfig) -> Router {
    build_router(AppState::new(create_predictor(config)))
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(form_page).post(predict_page))
        .route("/health", get(health_check))
        .route("/quote/session", post(start_session))
        .route("/quote/{session_id}", get(get_session).delete(end_session))
        .route("/quote/{session_id}/fields/{field}", put(update_field))
        .route("/quote/{session_id}/predict", post(predict_session))
        .layer(from_fn(correlation_id_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn form_page() -> Html<String> {
    Html(render_page(&FormState::new(), None))
}

/// Button press from the HTML form. The browser holds the form state, so each post
/// rebuilds it through the controls before predicting.
async fn predict_page(
    State(state): State<AppState>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Html<String> {
    let form = FormState::from_pairs(fields.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    let presentation = state.runner.quote(&form).await;
    info!(failed = presentation.is_error(), "Rendered prediction page");
    Html(render_page(&form, Some(&presentation)))
}

async fn start_session(State(state): State<AppState>) -> ApiResult<SessionResponse> {
    let session = state.runner.start().await.map_err(|e| {
        error!("Failed to create session: {}", e);
        internal_error("Failed to create session", &e.to_string())
    })?;
    Ok(Json(SessionResponse::new(session, false)))
}

async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<SessionResponse> {
    info!("Getting session: {}", session_id);

    let session = state
        .runner
        .load(&session_id)
        .await
        .map_err(|e| quote_error(&session_id, e))?;
    let pending = state.runner.is_pending(&session_id);
    Ok(Json(SessionResponse::new(session, pending)))
}

async fn update_field(
    State(state): State<AppState>,
    Path((session_id, field_name)): Path<(String, String)>,
    Json(request): Json<FieldUpdateRequest>,
) -> ApiResult<SessionResponse> {
    let field = Field::parse(&field_name).ok_or_else(|| {
        quote_error(&session_id, QuoteError::UnknownField(field_name.clone()))
    })?;
    let raw = request
        .raw_value()
        .ok_or_else(|| bad_request_error("value must be a number or a string"))?;

    let session = state
        .runner
        .update(&session_id, field, &raw)
        .await
        .map_err(|e| quote_error(&session_id, e))?;
    let pending = state.runner.is_pending(&session_id);
    Ok(Json(SessionResponse::new(session, pending)))
}

async fn predict_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<PredictResponse> {
    info!("Predicting for session: {}", session_id);

    let presentation = state
        .runner
        .submit(&session_id)
        .await
        .map_err(|e| quote_error(&session_id, e))?;
    Ok(Json(PredictResponse {
        session_id,
        presentation,
    }))
}

async fn end_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .runner
        .end(&session_id)
        .await
        .map_err(|e| quote_error(&session_id, e))?;
    Ok(StatusCode::NO_CONTENT)
}
