//! HTTP Route Handlers
//!
//! The predict handler awaits exactly one invocation outcome per request
//! and maps it to a 200 or a textual 500 body; it never distinguishes
//! failure subkinds for the caller.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use adoptml_core::application::{PredictionService, UserRegistry};
use adoptml_core::domain::Username;

use crate::error::to_http_error;
use crate::types::{CreateUserRequest, CreateUserResponse, HealthResponse, PredictResponse};

/// Shared handler state (injected at router construction)
#[derive(Clone)]
pub struct AppState {
    pub predictions: Arc<PredictionService>,
    pub users: Arc<UserRegistry>,
}

/// POST /predict
pub async fn predict(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> Response {
    match state.predictions.predict(&payload).await {
        Ok(prediction) => (StatusCode::OK, Json(PredictResponse { prediction })).into_response(),
        Err(e) => to_http_error(e).into_response(),
    }
}

/// POST /createUser
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Response {
    let username = match Username::new(req.username) {
        Ok(username) => username,
        Err(e) => return to_http_error(e.into()).into_response(),
    };

    match state.users.create(username.clone(), req.details).await {
        Ok(()) => (
            StatusCode::CREATED,
            Json(CreateUserResponse {
                username: username.to_string(),
                created: true,
            }),
        )
            .into_response(),
        Err(e) => to_http_error(e).into_response(),
    }
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        service: "adoptml-gateway".to_string(),
        version: adoptml_core::VERSION.to_string(),
    })
}
