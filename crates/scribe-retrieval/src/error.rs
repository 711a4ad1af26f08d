//! Error types for context retrieval.

/// Errors from embedding or querying the similarity store.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("embedding error: {0}")]
    Embedding(String),
    #[error("store error: {0}")]
    Store(String),
    #[error("retrieval timed out after {0}s")]
    Timeout(u64),
    #[error("top_n must be at least 1, got {0}")]
    InvalidTopN(usize),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retrieval_error_display() {
        let err = RetrievalError::Embedding("service down".to_string());
        assert_eq!(err.to_string(), "embedding error: service down");

        let err = RetrievalError::Store("collection missing".to_string());
        assert_eq!(err.to_string(), "store error: collection missing");

        let err = RetrievalError::Timeout(10);
        assert_eq!(err.to_string(), "retrieval timed out after 10s");

        let err = RetrievalError::InvalidTopN(0);
        assert_eq!(err.to_string(), "top_n must be at least 1, got 0");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "passages.txt");
        let err: RetrievalError = io_err.into();
        assert!(matches!(err, RetrievalError::Io(_)));
        assert!(err.to_string().contains("passages.txt"));
    }
}
