//! Error types for the weather gateway
//!
//! Every failure a request can hit is one of these variants. The HTTP layer
//! turns them into the `{ "error": ... }` envelope with a matching status.

use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Main error type for gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Missing or invalid configuration (credentials, base URLs)
    #[error("{0}")]
    Config(String),

    /// Missing or malformed caller input; raised before any I/O
    #[error("{0}")]
    Input(String),

    /// Network, timeout or protocol failure talking to an upstream service
    #[error("Transport error: {0}")]
    Transport(String),

    /// The weather provider understood the request but rejected the location
    #[error("Upstream rejected location ({status}): {reason}")]
    UpstreamRejected { status: u16, reason: String },

    /// The generative service produced no usable coordinate pair
    #[error("Could not resolve location '{location}': {reason}")]
    Resolution { location: String, reason: String },

    /// Cache backend failure. Never surfaced to callers.
    #[error("Cache error: {0}")]
    Cache(String),
}

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;

impl GatewayError {
    /// HTTP status reported to the caller for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Input(_) => StatusCode::BAD_REQUEST,
            GatewayError::UpstreamRejected { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            GatewayError::Config(_)
            | GatewayError::Transport(_)
            | GatewayError::Resolution { .. }
            | GatewayError::Cache(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        GatewayError::Transport(e.to_string())
    }
}

impl From<QueryRejection> for GatewayError {
    fn from(rejection: QueryRejection) -> Self {
        GatewayError::Input(rejection.body_text())
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
