//! Error types for backend calls.

use std::fmt;

use scribe_core::BackendId;

/// Why a backend call failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamCause {
    /// The call did not complete within the configured timeout.
    Timeout,
    /// The backend answered with a non-2xx status code.
    Status(u16),
    /// Connection-level failure (DNS, refused, reset).
    Transport(String),
    /// The body was not a JSON object.
    InvalidBody(String),
}

impl fmt::Display for UpstreamCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamCause::Timeout => f.write_str("timed out"),
            UpstreamCause::Status(code) => write!(f, "returned HTTP status {}", code),
            UpstreamCause::Transport(msg) => write!(f, "transport error: {}", msg),
            UpstreamCause::InvalidBody(msg) => write!(f, "invalid response body: {}", msg),
        }
    }
}

/// A backend could not be reached or answered unusably.
#[derive(Debug, Clone, thiserror::Error)]
#[error("backend {name} ({backend}) unavailable: {cause}")]
pub struct UpstreamError {
    pub backend: BackendId,
    /// Label of the backend, e.g. the model name.
    pub name: String,
    pub cause: UpstreamCause,
}

impl UpstreamError {
    pub fn new(backend: BackendId, name: impl Into<String>, cause: UpstreamCause) -> Self {
        Self {
            backend,
            name: name.into(),
            cause,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self.cause, UpstreamCause::Timeout)
    }
}
