//! HTTP Request/Response Types
//!
//! Defines the JSON bodies of the gateway endpoints.

use serde::{Deserialize, Serialize};

/// POST /predict - successful response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub prediction: String,
}

/// POST /createUser - request body
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    #[serde(default)]
    pub details: serde_json::Value,
}

/// POST /createUser - response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserResponse {
    pub username: String,
    pub created: bool,
}

/// GET /health - liveness probe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub service: String,
    pub version: String,
}
