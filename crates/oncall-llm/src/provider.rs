use std::pin::Pin;

use async_trait::async_trait;
use thiserror::Error;
use tokio_stream::Stream;

use oncall_core::types::Message;
use oncall_core::OncallError;

use crate::types::LlmReply;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM provider error: {0}")]
    Provider(String),

    #[error("LLM provider not configured")]
    NotConfigured,
}

impl From<LlmError> for OncallError {
    fn from(err: LlmError) -> Self {
        OncallError::Llm(err.to_string())
    }
}

/// An ordered sequence of response text fragments.
pub type FragmentStream = Pin<Box<dyn Stream<Item = String> + Send>>;

/// Upstream chat-completions backend.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn name(&self) -> &str;

    fn model(&self) -> &str;

    /// One-shot completion for the prompt plus trailing history window.
    async fn generate(&self, prompt: &str, history: &[Message]) -> Result<LlmReply, LlmError>;
}

/// Deterministic stand-in provider for tests and offline runs.
pub struct MockProvider {
    content: String,
    fail_with: Option<String>,
}

impl MockProvider {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            fail_with: None,
        }
    }

    /// A provider whose every call fails with the given reason.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            content: String::new(),
            fail_with: Some(reason.into()),
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new(
            "Based on the monitoring data, the recent api-gateway deployment correlates \
             with the observed error spike. Recommended next step: roll back v2.1.3 and \
             watch the error rate.",
        )
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn generate(&self, prompt: &str, history: &[Message]) -> Result<LlmReply, LlmError> {
        if let Some(reason) = &self.fail_with {
            return Err(LlmError::Provider(reason.clone()));
        }
        // Rough whitespace token estimate, enough for metadata plumbing.
        let tokens_used = prompt.split_whitespace().count() as u64
            + history
                .iter()
                .map(|m| m.content.split_whitespace().count() as u64)
                .sum::<u64>()
            + self.content.split_whitespace().count() as u64;
        Ok(LlmReply {
            content: self.content.clone(),
            provider: self.name().to_string(),
            model: self.model().to_string(),
            tokens_used,
            processing_time_ms: 0,
            confidence: None,
        })
    }
}
