//! HTTP request handlers for the verification service.
//!
//! Implements the root, health, verify and demo endpoints using axum.

use crate::api::{ErrorResponse, HealthResponse, RootResponse, VerifyRequestBody, VerifyResponse};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::error;
use verity_engine::{EngineError, Verifier, VerifyRequest};

/// Service name reported by `GET /`
pub const SERVICE_NAME: &str = "Verity Hallucination Checker";

/// Routes listed by `GET /`
const ROUTES: [&str; 4] = ["GET /", "GET /health", "POST /verify", "GET /demo"];

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The verification pipeline
    pub verifier: Arc<Verifier>,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Malformed or out-of-range request
    Validation(String),
    /// Internal server error
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::Internal(msg) => {
                error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        if err.is_validation() {
            AppError::Validation(err.to_string())
        } else {
            AppError::Internal(err.to_string())
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// Root endpoint
///
/// GET /
async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        name: SERVICE_NAME.to_string(),
        corpus_size: state.verifier.retrieval().corpus_size(),
        routes: ROUTES.iter().map(|r| r.to_string()).collect(),
    })
}

/// Health check endpoint
///
/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::from(state.verifier.health()))
}

/// Verify an answer
///
/// POST /verify
async fn verify(
    State(state): State<AppState>,
    body: Result<Json<VerifyRequestBody>, JsonRejection>,
) -> Result<Json<VerifyResponse>, AppError> {
    let Json(body) = body?;
    let request = VerifyRequest::from(body);
    let verification = state.verifier.verify(&request).await?;
    Ok(Json(VerifyResponse::from(&verification)))
}

/// Built-in demonstration check
///
/// GET /demo
async fn demo(State(state): State<AppState>) -> Result<Json<VerifyResponse>, AppError> {
    let verification = state.verifier.demo().await?;
    Ok(Json(VerifyResponse::from(&verification)))
}

/// Create the axum router with all endpoints
pub fn create_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/verify", post(verify))
        .route("/demo", get(demo))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
