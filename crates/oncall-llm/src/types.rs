use serde::{Deserialize, Serialize};

/// A completed LLM generation with its accounting metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmReply {
    pub content: String,
    pub provider: String,
    pub model: String,
    pub tokens_used: u64,
    pub processing_time_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// What an attempted LLM call resolved to.
///
/// `Unavailable` means no provider is configured (a routing signal);
/// `Failed` means a configured provider errored. Both send the caller
/// down the rule-based path, but they are logged differently.
#[derive(Debug, Clone)]
pub enum LlmOutcome {
    Answered(LlmReply),
    Unavailable,
    Failed(String),
}

impl LlmOutcome {
    pub fn is_answered(&self) -> bool {
        matches!(self, LlmOutcome::Answered(_))
    }
}

/// Monitoring context handed to the prompt builder. Sections left as
/// `None` are omitted from the prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncidentContext {
    pub recent_changes: Option<serde_json::Value>,
    pub active_alerts: Option<Vec<serde_json::Value>>,
    pub error_patterns: Option<Vec<serde_json::Value>>,
    pub service_health: Option<serde_json::Value>,
    pub correlation_analysis: Option<String>,
}
