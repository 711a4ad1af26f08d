//! Route handlers.

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use scribe_router::{ResetAck, RouterReply, SessionSnapshot};

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the session id when the body does not.
pub const SESSION_HEADER: &str = "x-session-id";

/// Longest session id accepted from a client, in characters.
pub const MAX_SESSION_ID_CHARS: usize = 128;

/// Request body for POST /process.
#[derive(Debug, Deserialize)]
pub struct ProcessRequest {
    pub text: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Optional request body for POST /reset.
#[derive(Debug, Default, Deserialize)]
pub struct ResetRequest {
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub sessions: usize,
}

/// Pick the session id: body field, then header, then the configured default.
///
/// Ids longer than [`MAX_SESSION_ID_CHARS`] are rejected.
pub fn resolve_session_id(
    from_body: Option<&str>,
    headers: &HeaderMap,
    default: &str,
) -> Result<String, ApiError> {
    let from_header = headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok());

    let id = [from_body, from_header]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|id| !id.is_empty())
        .unwrap_or(default);

    if id.chars().count() > MAX_SESSION_ID_CHARS {
        return Err(ApiError::InvalidInput(format!(
            "session id exceeds maximum length of {} characters",
            MAX_SESSION_ID_CHARS
        )));
    }
    Ok(id.to_string())
}

/// POST /process - route one user message.
pub async fn process(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ProcessRequest>, JsonRejection>,
) -> Result<Json<RouterReply>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::InvalidInput(e.body_text()))?;
    let text = request
        .text
        .ok_or_else(|| ApiError::InvalidInput("No text provided".to_string()))?;

    let session_id = resolve_session_id(
        request.session_id.as_deref(),
        &headers,
        state.router.default_session(),
    )?;
    info!(session_id = %session_id, chars = text.chars().count(), "Processing user request");

    let reply = state.router.process(&session_id, &text).await?;
    Ok(Json(reply))
}

/// POST /reset - return a session to its initial state.
pub async fn reset(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ResetAck>, ApiError> {
    let request: ResetRequest = if body.iter().all(u8::is_ascii_whitespace) {
        ResetRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::InvalidInput(format!("Invalid reset body: {}", e)))?
    };

    let session_id = resolve_session_id(
        request.session_id.as_deref(),
        &headers,
        state.router.default_session(),
    )?;
    Ok(Json(state.router.reset(&session_id).await))
}

/// GET /health - health check.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        sessions: state.router.session_count(),
    })
}

/// GET /sessions/{id} - diagnostic view of one session.
pub async fn session_snapshot(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    state
        .router
        .snapshot(&id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("session not found: {}", id)))
}
