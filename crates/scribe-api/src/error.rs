//! API error types and JSON error response formatting.
//!
//! Every error leaves as `{"error": code, "message": text}` with a matching
//! HTTP status code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use scribe_router::RouterError;

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable error code (e.g., "invalid_input").
    pub error: String,
    /// Human-readable error message.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[derive(Debug)]
pub enum ApiError {
    /// 400 - empty, oversized or malformed input.
    InvalidInput(String),
    /// 404 - unknown session.
    NotFound(String),
    /// 500 - a backend or the retrieval store failed.
    UpstreamUnavailable {
        message: String,
        backend: Option<String>,
    },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, "invalid_input", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::UpstreamUnavailable { message, backend } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "upstream_unavailable",
                message,
                backend.map(|b| serde_json::json!({ "backend": b })),
            ),
        };

        let body = ErrorBody {
            error: error_code.to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<RouterError> for ApiError {
    fn from(err: RouterError) -> Self {
        if err.is_invalid_input() {
            return ApiError::InvalidInput(err.to_string());
        }
        let backend = match &err {
            RouterError::Upstream(upstream) => Some(upstream.name.clone()),
            _ => None,
        };
        ApiError::UpstreamUnavailable {
            message: err.to_string(),
            backend,
        }
    }
}
