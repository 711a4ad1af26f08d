use thiserror::Error;

/// Top-level error type for the Scribe system.
///
/// Subsystem crates define their own error types for the failures they own;
/// this enum covers the shared concerns (configuration, I/O, serialization).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ScribeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown intent token: {0}")]
    UnknownIntent(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Server error: {0}")]
    Server(String),
}

impl From<toml::de::Error> for ScribeError {
    fn from(err: toml::de::Error) -> Self {
        ScribeError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for ScribeError {
    fn from(err: toml::ser::Error) -> Self {
        ScribeError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for ScribeError {
    fn from(err: serde_json::Error) -> Self {
        ScribeError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Scribe operations.
pub type Result<T> = std::result::Result<T, ScribeError>;
