//! Error types for the request router.

use scribe_gateway::UpstreamError;
use scribe_retrieval::RetrievalError;

/// Errors from processing one message.
///
/// When `process` returns one of these the session is left exactly as it
/// was before the message arrived.
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error("context retrieval failed: {0}")]
    Retrieval(#[from] RetrievalError),
}

impl RouterError {
    /// True for errors caused by the user's input rather than a collaborator.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, RouterError::EmptyMessage | RouterError::MessageTooLong(_))
    }
}
