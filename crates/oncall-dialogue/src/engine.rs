use serde::Serialize;
use tracing::debug;

use oncall_core::session::{DialogueStep, Region, Session};

use crate::resources::TextResources;
use crate::transitions::{match_rule, Effect};

/// The dialogue engine's answer for one turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnResult {
    pub response: String,
    pub suggestions: Vec<String>,
    /// True means the router should discard this reply and run the
    /// data-driven (rule/LLM) path instead.
    pub use_traditional_flow: bool,
    /// Subject hint for LLM prompt construction, e.g. "customer Acme Corp".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<String>,
}

impl TurnResult {
    fn scripted(response: impl Into<String>, suggestions: &[&str]) -> Self {
        Self {
            response: response.into(),
            suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
            use_traditional_flow: false,
            focus: None,
        }
    }
}

/// Interprets one utterance against the session's current step.
pub struct DialogueEngine {
    resources: TextResources,
}

impl DialogueEngine {
    pub fn new(resources: TextResources) -> Self {
        Self { resources }
    }

    /// Run one turn: apply the first matching transition rule, then
    /// compose the reply for the step the session is now in.
    pub fn process(&self, session: &mut Session, input: &str) -> TurnResult {
        let normalized = input.trim().to_lowercase();
        let step_before = session.step;

        if let Some(rule) = match_rule(step_before, &normalized) {
            if let Some(effect) = rule.effect {
                apply_effect(session, effect, input);
            }
            session.advance(rule.next);
            debug!(
                conversation_id = %session.id,
                from = %step_before,
                to = %session.step,
                "dialogue transition"
            );
        }

        self.compose_reply(session, step_before)
    }

    /// Like [`process`](Self::process) but for a step supplied as a raw
    /// string. Unrecognized step names get the reset reply instead of an
    /// error, and the session is wound back to the start.
    pub fn process_named(&self, session: &mut Session, step: &str, input: &str) -> TurnResult {
        match DialogueStep::parse(step) {
            Some(parsed) => {
                session.step = parsed;
                self.process(session, input)
            }
            None => {
                session.reset();
                Self::reset_reply()
            }
        }
    }

    /// The "let's start over" reply used when the conversation state is
    /// unrecognizable.
    pub fn reset_reply() -> TurnResult {
        TurnResult::scripted(
            "I'm not sure where we are in our conversation. Let's start over! \
             Where are you writing in from today, AMER or EMEA?",
            &["AMER", "EMEA"],
        )
    }

    fn compose_reply(&self, session: &Session, step_before: DialogueStep) -> TurnResult {
        match session.step {
            // No rule matched: repeat the step's own prompt.
            DialogueStep::Welcome => TurnResult::scripted(
                "I didn't catch that! Please let me know - are you writing in from AMER or EMEA?",
                &["AMER", "EMEA"],
            ),
            DialogueStep::AskState => TurnResult::scripted(
                "Great! Which state?",
                &["California", "Texas", "New York", "Florida", "Other"],
            ),
            DialogueStep::AskHelpType => {
                if step_before == DialogueStep::AskHelpType {
                    TurnResult::scripted(
                        "I didn't understand that. Please choose from the options:\n\n\
                         1. A specific customer\n\
                         2. A specific environment\n\
                         3. A generic performance issue\n\
                         4. Lunch",
                        HELP_TYPE_SUGGESTIONS,
                    )
                } else {
                    help_type_question()
                }
            }
            DialogueStep::AskCustomer => TurnResult::scripted("Which customer?", &[]),
            DialogueStep::AskEnvironment => TurnResult::scripted(
                "Which environment?",
                &["Production", "Staging", "Development", "QA"],
            ),
            DialogueStep::AskPerformance => TurnResult::scripted("Tell me more...", &[]),
            DialogueStep::CustomerProcess
            | DialogueStep::EnvProcess
            | DialogueStep::PerformanceProcess => {
                if step_before == session.step {
                    self.detailed_process_reply(session)
                } else {
                    self.initial_response(session)
                }
            }
            DialogueStep::LunchProcess => {
                if step_before == DialogueStep::LunchProcess {
                    TurnResult::scripted(
                        "Hope you find a great place for lunch! Anything else I can help you with?",
                        &["Start new analysis", "Customer issue", "Environment check"],
                    )
                } else {
                    self.start_lunch_process(session)
                }
            }
        }
    }

    /// The canned "we're on it" reply emitted right after the user names
    /// a customer, environment, or performance issue.
    fn initial_response(&self, session: &Session) -> TurnResult {
        let exclamation = self.resources.random_exclamation();
        let joke = self.resources.random_joke();

        let mut response = String::from(
            "My team says 'It's definitely not a database issue... but let me 2x check.'\n\n",
        );
        response.push_str(&format!(
            "{}. Your monitoring guys are good... there is a ton of data to check... \
             it will take a bit. Here is a Dad joke while you wait:\n\n",
            exclamation
        ));
        response.push_str(&format!("{}\n\n", joke));

        match (session.region, session.locality.as_deref()) {
            (Some(Region::Amer), Some(locality)) if !locality.is_empty() => {
                let url = format!(
                    "{}?state={}&top3",
                    self.resources.locations_url(),
                    locality
                );
                response.push_str(&format!(
                    "Staying PRODUCTIVE means you should keep energized with some sustenance. \
                     Try checking out one of these R365 customer locations: {}",
                    url
                ));
            }
            (Some(Region::Emea), _) => {
                response.push_str("Oh. R365 does not have many customer locations in EMEA...yet. :)");
            }
            _ => {}
        }

        TurnResult::scripted(
            response,
            &["Continue with analysis", "Ask more questions", "Start over"],
        )
    }

    fn start_lunch_process(&self, session: &Session) -> TurnResult {
        let response = match session.locality.as_deref() {
            Some(locality) if !locality.is_empty() => {
                let url = format!("{}?state={}", self.resources.locations_url(), locality);
                format!(
                    "I am not fantastic with geography yet, so cannot narrow down a list to \
                     something close by. BUT.. here are all known R365 customer locations in: \
                     [{}]({})",
                    locality, url
                )
            }
            _ => "I am not fantastic with geography yet, so cannot narrow down a list to \
                  something close by. BUT.. here are all known R365 customer locations \
                  (please specify your state for better results)."
                .to_string(),
        };
        TurnResult::scripted(response, &["Show all locations", "Start over"])
    }

    /// Follow-up turns inside a process step hand control to the router:
    /// `use_traditional_flow` is true and the focus names the subject.
    fn detailed_process_reply(&self, session: &Session) -> TurnResult {
        let detailed = match (session.step, session) {
            (DialogueStep::CustomerProcess, s) => s.customer.as_deref().map(|customer| TurnResult {
                response: format!(
                    "Looking for specific information about customer '{}' in our monitoring \
                     data. Let me check recent alerts, performance metrics, and any known \
                     issues for this customer...\n\n\
                     Would you like me to focus on any specific time range or service?",
                    customer
                ),
                suggestions: to_strings(&["Last 24 hours", "Last week", "Specific service", "All data"]),
                use_traditional_flow: true,
                focus: Some(format!("customer {}", customer)),
            }),
            (DialogueStep::EnvProcess, s) => s.environment.as_deref().map(|environment| TurnResult {
                response: format!(
                    "Analyzing environment '{}' in our monitoring data. Checking system \
                     health, recent deployments, and performance metrics...\n\n\
                     What specific aspect would you like me to investigate?",
                    environment
                ),
                suggestions: to_strings(&[
                    "Recent deployments",
                    "Error rates",
                    "Performance metrics",
                    "System health",
                ]),
                use_traditional_flow: true,
                focus: Some(format!("environment {}", environment)),
            }),
            (DialogueStep::PerformanceProcess, s) => {
                s.performance_details.as_deref().map(|details| TurnResult {
                    response: format!(
                        "Investigating performance issue: '{}'. Analyzing metrics, error \
                         patterns, and correlations...\n\n\
                         Would you like me to look at any specific time period or component?",
                        details
                    ),
                    suggestions: to_strings(&[
                        "Last hour",
                        "During business hours",
                        "Specific service",
                        "All components",
                    ]),
                    use_traditional_flow: true,
                    focus: Some(format!("performance {}", details)),
                })
            }
            _ => None,
        };

        detailed.unwrap_or_else(|| TurnResult {
            response: "Let me analyze that further. What specific details would you like me to \
                       investigate?"
                .to_string(),
            suggestions: to_strings(&["Show more details", "Try different approach", "Start over"]),
            use_traditional_flow: true,
            focus: None,
        })
    }
}

const HELP_TYPE_SUGGESTIONS: &[&str] =
    &["1. Customer", "2. Environment", "3. Performance", "4. Lunch"];

fn help_type_question() -> TurnResult {
    TurnResult::scripted(
        "What can I help you with today:\n\n\
         1. A specific customer\n\
         2. A specific environment\n\
         3. A generic performance issue\n\
         4. Lunch",
        HELP_TYPE_SUGGESTIONS,
    )
}

fn apply_effect(session: &mut Session, effect: Effect, raw_input: &str) {
    match effect {
        Effect::SetRegionAmer => session.region = Some(Region::Amer),
        Effect::SetRegionEmea => session.region = Some(Region::Emea),
        Effect::CaptureLocality => session.locality = Some(raw_input.to_string()),
        Effect::SetIssueType(kind) => session.issue_type = kind,
        Effect::CaptureCustomer => session.customer = Some(raw_input.to_string()),
        Effect::CaptureEnvironment => session.environment = Some(raw_input.to_string()),
        Effect::CapturePerformance => session.performance_details = Some(raw_input.to_string()),
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use oncall_core::session::IssueType;

    fn make_engine() -> DialogueEngine {
        // Nonexistent dir: resource loads hit the literal fallbacks, so
        // replies are fully deterministic.
        DialogueEngine::new(TextResources::with_seed(
            "/nonexistent/etc",
            "http://10.10.4.6/dashboards/food/main.html",
            1,
        ))
    }

    fn make_session() -> Session {
        Session::new("test-conv")
    }

    // ---- welcome ----

    #[test]
    fn test_welcome_amer_asks_state() {
        let engine = make_engine();
        let mut session = make_session();
        let result = engine.process(&mut session, "AMER");

        assert_eq!(result.response, "Great! Which state?");
        assert_eq!(
            result.suggestions,
            vec!["California", "Texas", "New York", "Florida", "Other"]
        );
        assert!(!result.use_traditional_flow);
        assert_eq!(session.step, DialogueStep::AskState);
        assert_eq!(session.region, Some(Region::Amer));
    }

    #[test]
    fn test_welcome_emea_skips_to_help_type() {
        let engine = make_engine();
        let mut session = make_session();
        let result = engine.process(&mut session, "EMEA");

        assert!(result.response.starts_with("What can I help you with today:"));
        assert_eq!(session.step, DialogueStep::AskHelpType);
        assert_eq!(session.region, Some(Region::Emea));
    }

    #[test]
    fn test_welcome_unrecognized_repeats_prompt() {
        let engine = make_engine();
        let mut session = make_session();
        let result = engine.process(&mut session, "good morning");

        assert_eq!(
            result.response,
            "I didn't catch that! Please let me know - are you writing in from AMER or EMEA?"
        );
        assert_eq!(result.suggestions, vec!["AMER", "EMEA"]);
        assert_eq!(session.step, DialogueStep::Welcome);
        assert_eq!(session.region, None);
    }

    // ---- ask_state ----

    #[test]
    fn test_ask_state_captures_locality_verbatim() {
        let engine = make_engine();
        let mut session = make_session();
        engine.process(&mut session, "amer");
        let result = engine.process(&mut session, "Texas");

        assert_eq!(session.locality.as_deref(), Some("Texas"));
        assert_eq!(session.step, DialogueStep::AskHelpType);
        assert!(result.response.contains("1. A specific customer"));
        assert!(result.response.contains("4. Lunch"));
    }

    #[test]
    fn test_ask_state_does_not_rematch_region() {
        let engine = make_engine();
        let mut session = make_session();
        engine.process(&mut session, "amer");
        engine.process(&mut session, "amer");
        // Second "amer" is locality text, region unchanged.
        assert_eq!(session.region, Some(Region::Amer));
        assert_eq!(session.locality.as_deref(), Some("amer"));
        assert_eq!(session.step, DialogueStep::AskHelpType);
    }

    // ---- ask_help_type ----

    #[test]
    fn test_help_type_customer() {
        let engine = make_engine();
        let mut session = make_session();
        engine.process(&mut session, "emea");
        let result = engine.process(&mut session, "1");

        assert_eq!(result.response, "Which customer?");
        assert!(result.suggestions.is_empty());
        assert_eq!(session.step, DialogueStep::AskCustomer);
        assert_eq!(session.issue_type, IssueType::Customer);
    }

    #[test]
    fn test_help_type_environment_suggestions() {
        let engine = make_engine();
        let mut session = make_session();
        engine.process(&mut session, "emea");
        let result = engine.process(&mut session, "environment");

        assert_eq!(result.response, "Which environment?");
        assert_eq!(
            result.suggestions,
            vec!["Production", "Staging", "Development", "QA"]
        );
    }

    #[test]
    fn test_help_type_unrecognized_repeats_menu() {
        let engine = make_engine();
        let mut session = make_session();
        engine.process(&mut session, "emea");
        let result = engine.process(&mut session, "something else entirely");

        assert!(result
            .response
            .starts_with("I didn't understand that. Please choose from the options:"));
        assert_eq!(
            result.suggestions,
            vec!["1. Customer", "2. Environment", "3. Performance", "4. Lunch"]
        );
        assert_eq!(session.step, DialogueStep::AskHelpType);
    }

    // ---- capture + initial response ----

    #[test]
    fn test_customer_capture_emits_initial_response() {
        let engine = make_engine();
        let mut session = make_session();
        engine.process(&mut session, "AMER");
        engine.process(&mut session, "Texas");
        engine.process(&mut session, "1");
        let result = engine.process(&mut session, "Acme Corp");

        assert_eq!(session.step, DialogueStep::CustomerProcess);
        assert_eq!(session.customer.as_deref(), Some("Acme Corp"));
        assert!(result
            .response
            .starts_with("My team says 'It's definitely not a database issue..."));
        // Fallback resources are deterministic.
        assert!(result.response.contains("Wow. Your monitoring guys are good..."));
        assert!(result
            .response
            .contains("Why did the developer go broke? Because he used up all his cache!"));
        // AMER with known locality gets the location line.
        assert!(result.response.contains(
            "http://10.10.4.6/dashboards/food/main.html?state=Texas&top3"
        ));
        assert_eq!(
            result.suggestions,
            vec!["Continue with analysis", "Ask more questions", "Start over"]
        );
        assert!(!result.use_traditional_flow);
    }

    #[test]
    fn test_emea_initial_response_no_locations() {
        let engine = make_engine();
        let mut session = make_session();
        engine.process(&mut session, "EMEA");
        engine.process(&mut session, "3");
        let result = engine.process(&mut session, "checkout is slow");

        assert_eq!(session.step, DialogueStep::PerformanceProcess);
        assert!(result
            .response
            .ends_with("Oh. R365 does not have many customer locations in EMEA...yet. :)"));
    }

    // ---- process follow-ups ----

    #[test]
    fn test_customer_process_followup_flags_traditional_flow() {
        let engine = make_engine();
        let mut session = make_session();
        engine.process(&mut session, "AMER");
        engine.process(&mut session, "Texas");
        engine.process(&mut session, "1");
        engine.process(&mut session, "Acme Corp");
        let result = engine.process(&mut session, "what changed recently?");

        assert!(result.use_traditional_flow);
        assert_eq!(result.focus.as_deref(), Some("customer Acme Corp"));
        assert!(result.response.contains("customer 'Acme Corp'"));
        assert_eq!(session.step, DialogueStep::CustomerProcess);
    }

    #[test]
    fn test_environment_process_focus() {
        let engine = make_engine();
        let mut session = make_session();
        engine.process(&mut session, "EMEA");
        engine.process(&mut session, "2");
        engine.process(&mut session, "Production");
        let result = engine.process(&mut session, "tell me about error rates");

        assert!(result.use_traditional_flow);
        assert_eq!(result.focus.as_deref(), Some("environment Production"));
        assert_eq!(
            result.suggestions,
            vec![
                "Recent deployments",
                "Error rates",
                "Performance metrics",
                "System health"
            ]
        );
    }

    #[test]
    fn test_performance_process_focus() {
        let engine = make_engine();
        let mut session = make_session();
        engine.process(&mut session, "EMEA");
        engine.process(&mut session, "3");
        engine.process(&mut session, "p95 latency doubled");
        let result = engine.process(&mut session, "dig in please");

        assert!(result.use_traditional_flow);
        assert_eq!(result.focus.as_deref(), Some("performance p95 latency doubled"));
    }

    #[test]
    fn test_process_followup_without_capture_is_generic() {
        let engine = make_engine();
        let mut session = make_session();
        session.step = DialogueStep::CustomerProcess;
        let result = engine.process(&mut session, "hmm");

        assert!(result.use_traditional_flow);
        assert!(result.focus.is_none());
        assert!(result.response.starts_with("Let me analyze that further."));
    }

    // ---- lunch ----

    #[test]
    fn test_lunch_with_locality() {
        let engine = make_engine();
        let mut session = make_session();
        engine.process(&mut session, "AMER");
        engine.process(&mut session, "California");
        let result = engine.process(&mut session, "4");

        assert_eq!(session.step, DialogueStep::LunchProcess);
        assert_eq!(session.issue_type, IssueType::Lunch);
        assert!(result.response.contains(
            "[California](http://10.10.4.6/dashboards/food/main.html?state=California)"
        ));
        assert_eq!(result.suggestions, vec!["Show all locations", "Start over"]);
    }

    #[test]
    fn test_lunch_without_locality() {
        let engine = make_engine();
        let mut session = make_session();
        engine.process(&mut session, "EMEA");
        let result = engine.process(&mut session, "lunch");

        assert!(result
            .response
            .contains("please specify your state for better results"));
    }

    #[test]
    fn test_lunch_followup_closes() {
        let engine = make_engine();
        let mut session = make_session();
        engine.process(&mut session, "EMEA");
        engine.process(&mut session, "4");
        let result = engine.process(&mut session, "thanks");

        assert_eq!(
            result.response,
            "Hope you find a great place for lunch! Anything else I can help you with?"
        );
        assert_eq!(
            result.suggestions,
            vec!["Start new analysis", "Customer issue", "Environment check"]
        );
        assert_eq!(session.step, DialogueStep::LunchProcess);
    }

    // ---- reset semantics ----

    #[test]
    fn test_unknown_step_name_resets() {
        let engine = make_engine();
        let mut session = make_session();
        session.locality = Some("Texas".to_string());
        let result = engine.process_named(&mut session, "not_a_step", "hello");

        assert!(result.response.starts_with("I'm not sure where we are"));
        assert_eq!(result.suggestions, vec!["AMER", "EMEA"]);
        assert_eq!(session.step, DialogueStep::Welcome);
        assert_eq!(session.locality, None);
    }

    #[test]
    fn test_known_step_name_processes_normally() {
        let engine = make_engine();
        let mut session = make_session();
        let result = engine.process_named(&mut session, "welcome", "amer");
        assert_eq!(result.response, "Great! Which state?");
        assert_eq!(session.step, DialogueStep::AskState);
    }
}
