use thiserror::Error;

/// Top-level error type for the Oncall system.
///
/// Each variant wraps a subsystem-specific error. Subsystem crates define
/// their own error types and implement `From<SubsystemError> for OncallError`
/// so that the `?` operator works seamlessly across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OncallError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Dialogue error: {0}")]
    Dialogue(String),

    #[error("Monitoring error: {0}")]
    Monitor(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for OncallError {
    fn from(err: toml::de::Error) -> Self {
        OncallError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for OncallError {
    fn from(err: toml::ser::Error) -> Self {
        OncallError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for OncallError {
    fn from(err: serde_json::Error) -> Self {
        OncallError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Oncall operations.
pub type Result<T> = std::result::Result<T, OncallError>;
