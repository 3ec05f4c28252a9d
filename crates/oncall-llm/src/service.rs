use std::sync::Arc;

use tracing::{error, info};

use oncall_core::types::Message;

use crate::prompt::build_incident_prompt;
use crate::provider::{FragmentStream, LlmProvider};
use crate::types::{IncidentContext, LlmOutcome};

/// Characters per fragment when chunking a streamed reply.
const STREAM_CHUNK_CHARS: usize = 50;

/// Front door for LLM generation.
///
/// Holds at most one provider; with none configured every call resolves
/// to [`LlmOutcome::Unavailable`] and the caller falls back to the
/// rule-based path.
pub struct LlmService {
    provider: Option<Arc<dyn LlmProvider>>,
    history_turns: usize,
}

impl LlmService {
    pub fn new(provider: Option<Arc<dyn LlmProvider>>, history_turns: usize) -> Self {
        Self {
            provider,
            history_turns,
        }
    }

    /// Service with no provider configured.
    pub fn disabled() -> Self {
        Self::new(None, 10)
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    pub fn available_providers(&self) -> Vec<String> {
        self.provider
            .iter()
            .map(|p| p.name().to_string())
            .collect()
    }

    /// Attempt a generation for the query against the incident context.
    ///
    /// Only the trailing history window is forwarded to the provider.
    pub async fn generate(
        &self,
        user_query: &str,
        context: &IncidentContext,
        history: &[Message],
    ) -> LlmOutcome {
        let provider = match &self.provider {
            Some(provider) => provider,
            None => {
                info!("LLM provider not configured, will use traditional responses only");
                return LlmOutcome::Unavailable;
            }
        };

        let prompt = build_incident_prompt(user_query, context);
        let window = self.history_window(history);
        match provider.generate(&prompt, window).await {
            Ok(reply) => LlmOutcome::Answered(reply),
            Err(e) => {
                error!(
                    "LLM provider '{}' failed, falling back to traditional response: {}",
                    provider.name(),
                    e
                );
                LlmOutcome::Failed(e.to_string())
            }
        }
    }

    /// Streamed variant: the reply is delivered as fixed-size text
    /// fragments. With no provider, a single explanatory fragment is
    /// emitted; a provider failure truncates the stream with an inline
    /// error notice.
    pub async fn stream(
        &self,
        user_query: &str,
        context: &IncidentContext,
        history: &[Message],
    ) -> FragmentStream {
        let fragments: Vec<String> = match self.generate(user_query, context, history).await {
            LlmOutcome::Answered(reply) => chunk_content(&reply.content, STREAM_CHUNK_CHARS),
            LlmOutcome::Unavailable => {
                vec!["LLM provider not configured. Using traditional response mode only."
                    .to_string()]
            }
            LlmOutcome::Failed(reason) => {
                vec![format!("Error generating response: {}", reason)]
            }
        };
        Box::pin(tokio_stream::iter(fragments))
    }

    fn history_window<'a>(&self, history: &'a [Message]) -> &'a [Message] {
        let start = history.len().saturating_sub(self.history_turns);
        &history[start..]
    }
}

fn chunk_content(content: &str, chunk_chars: usize) -> Vec<String> {
    let chars: Vec<char> = content.chars().collect();
    chars
        .chunks(chunk_chars)
        .map(|chunk| chunk.iter().collect())
        .collect()
}
