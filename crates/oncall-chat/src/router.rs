use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use oncall_core::types::{Message, Role};
use oncall_dialogue::{DialogueEngine, TurnResult};
use oncall_insight::CorrelationAnalyzer;
use oncall_llm::{FragmentStream, IncidentContext, LlmOutcome, LlmService};
use oncall_monitor::MonitorHub;
use oncall_store::ConversationStore;

use crate::error::ChatError;
use crate::rules;

/// Which path produced the reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisType {
    ConversationFlow,
    AiPowered,
    Traditional,
}

/// The assembled reply for one chat turn.
#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub response: String,
    pub data: serde_json::Value,
    pub suggestions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_response: Option<oncall_llm::LlmReply>,
    pub analysis_type: AnalysisType,
}

/// Coordinates one chat turn across the dialogue engine, monitoring hub,
/// correlation analyzer, LLM service, and conversation store.
pub struct ResponseRouter {
    store: Arc<ConversationStore>,
    engine: DialogueEngine,
    hub: MonitorHub,
    analyzer: CorrelationAnalyzer,
    llm: LlmService,
    window_hours: u32,
}

impl ResponseRouter {
    pub fn new(
        store: Arc<ConversationStore>,
        engine: DialogueEngine,
        hub: MonitorHub,
        llm: LlmService,
        window_hours: u32,
    ) -> Self {
        Self {
            store,
            engine,
            hub,
            analyzer: CorrelationAnalyzer::new(),
            llm,
            window_hours,
        }
    }

    pub fn store(&self) -> &Arc<ConversationStore> {
        &self.store
    }

    pub fn llm_configured(&self) -> bool {
        self.llm.is_configured()
    }

    /// Handle one user message end to end.
    ///
    /// The scripted dialogue gets first refusal; if it hands over, the
    /// router gathers monitoring data, optionally attempts the LLM, and
    /// otherwise answers from the rule-based templates. The turn is
    /// recorded in the store on every path.
    pub async fn handle(
        &self,
        conversation_id: &str,
        user_message: &str,
    ) -> Result<ChatReply, ChatError> {
        self.handle_at_step(conversation_id, None, user_message).await
    }

    /// Like [`handle`](Self::handle), but resumes the conversation at a
    /// client-supplied step name. Unknown names reset the session and
    /// answer with the start-over reply rather than erroring.
    pub async fn handle_at_step(
        &self,
        conversation_id: &str,
        step: Option<&str>,
        user_message: &str,
    ) -> Result<ChatReply, ChatError> {
        self.store
            .append_text(conversation_id, Role::User, user_message)?;

        let flow = self
            .store
            .with_session(conversation_id, |session| match step {
                Some(name) => self.engine.process_named(session, name, user_message),
                None => self.engine.process(session, user_message),
            })?;

        if !flow.use_traditional_flow {
            self.store
                .append_text(conversation_id, Role::Assistant, &flow.response)?;
            debug!(conversation_id, "turn handled by dialogue flow");
            return Ok(ChatReply {
                response: flow.response,
                data: serde_json::json!({}),
                suggestions: flow.suggestions,
                llm_response: None,
                analysis_type: AnalysisType::ConversationFlow,
            });
        }

        let query = user_message.to_lowercase();
        let bundle = self.hub.query_recent_changes(self.window_hours).await;
        let correlation = self.analyzer.summarize(&bundle);
        let context = self.build_context(&bundle, &correlation, &flow)?;
        let data = serde_json::to_value(&bundle)?;

        if rules::should_use_llm(&query, flow.use_traditional_flow) && self.llm.is_configured() {
            let history = self.store.history(conversation_id)?;
            match self.llm.generate(user_message, &context, &history).await {
                LlmOutcome::Answered(reply) => {
                    let mut metadata = HashMap::new();
                    metadata.insert(
                        "llm_provider".to_string(),
                        serde_json::json!(reply.provider),
                    );
                    metadata.insert(
                        "tokens_used".to_string(),
                        serde_json::json!(reply.tokens_used),
                    );
                    self.store.append(
                        conversation_id,
                        Message::with_metadata(Role::Assistant, &reply.content, metadata),
                    )?;
                    return Ok(ChatReply {
                        response: reply.content.clone(),
                        data,
                        suggestions: to_strings(rules::AI_SUGGESTIONS),
                        llm_response: Some(reply),
                        analysis_type: AnalysisType::AiPowered,
                    });
                }
                LlmOutcome::Unavailable | LlmOutcome::Failed(_) => {
                    info!("LLM did not answer, falling back to traditional response");
                }
            }
        }

        let (response, suggestions) = self.rule_based_response(&query, &bundle, &correlation);
        self.store
            .append_text(conversation_id, Role::Assistant, &response)?;
        Ok(ChatReply {
            response,
            data,
            suggestions,
            llm_response: None,
            analysis_type: AnalysisType::Traditional,
        })
    }

    /// Streamed analysis for one message: the monitoring context is built
    /// the same way as [`handle`](Self::handle), then the LLM reply is
    /// delivered as text fragments.
    pub async fn stream_analysis(
        &self,
        conversation_id: &str,
        user_message: &str,
    ) -> Result<FragmentStream, ChatError> {
        let bundle = self.hub.query_recent_changes(self.window_hours).await;
        let correlation = self.analyzer.summarize(&bundle);
        let flow = TurnResult {
            response: String::new(),
            suggestions: Vec::new(),
            use_traditional_flow: true,
            focus: None,
        };
        let context = self.build_context(&bundle, &correlation, &flow)?;
        let history = self.store.history(conversation_id)?;
        Ok(self.llm.stream(user_message, &context, &history).await)
    }

    fn build_context(
        &self,
        bundle: &oncall_core::types::MonitoringBundle,
        correlation: &str,
        flow: &TurnResult,
    ) -> Result<IncidentContext, ChatError> {
        let correlation_analysis = match flow.focus.as_deref() {
            Some(focus) if !focus.is_empty() => {
                format!("{}\n\nFOCUS: {}", correlation, focus)
            }
            _ => correlation.to_string(),
        };
        Ok(IncidentContext {
            recent_changes: Some(serde_json::to_value(bundle)?),
            active_alerts: Some(
                bundle
                    .alerts
                    .iter()
                    .map(serde_json::to_value)
                    .collect::<Result<_, _>>()?,
            ),
            error_patterns: Some(
                bundle
                    .errors
                    .iter()
                    .map(serde_json::to_value)
                    .collect::<Result<_, _>>()?,
            ),
            service_health: Some(serde_json::to_value(&bundle.anomalies)?),
            correlation_analysis: Some(correlation_analysis),
        })
    }

    fn rule_based_response(
        &self,
        query: &str,
        bundle: &oncall_core::types::MonitoringBundle,
        correlation: &str,
    ) -> (String, Vec<String>) {
        if query.contains("what changed") || query.contains("recent changes") {
            let hours = rules::extract_hours(query);
            (
                rules::render_recent_changes(bundle, correlation, hours),
                to_strings(rules::RECENT_CHANGES_SUGGESTIONS),
            )
        } else if query.contains("error") && (query.contains("detail") || query.contains("pattern"))
        {
            (
                rules::render_error_details(bundle),
                to_strings(rules::ERROR_DETAIL_SUGGESTIONS),
            )
        } else {
            (
                rules::render_help(self.llm.is_configured()),
                to_strings(rules::HELP_SUGGESTIONS),
            )
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
