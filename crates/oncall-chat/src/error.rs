use thiserror::Error;

use oncall_core::OncallError;
use oncall_store::StoreError;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Conversation store error: {0}")]
    Store(#[from] StoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<ChatError> for OncallError {
    fn from(err: ChatError) -> Self {
        OncallError::Api(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_conversion() {
        let err: ChatError = StoreError::LockPoisoned.into();
        assert!(err.to_string().contains("lock poisoned"));
        let top: OncallError = err.into();
        assert!(matches!(top, OncallError::Api(_)));
    }
}
