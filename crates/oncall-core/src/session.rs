use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The closed set of dialogue states.
///
/// Serialized as snake_case strings so stored sessions stay readable.
/// Unknown strings do not parse; callers fall back to reset semantics
/// instead of erroring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogueStep {
    Welcome,
    AskState,
    AskHelpType,
    AskCustomer,
    AskEnvironment,
    AskPerformance,
    CustomerProcess,
    EnvProcess,
    PerformanceProcess,
    LunchProcess,
}

impl DialogueStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            DialogueStep::Welcome => "welcome",
            DialogueStep::AskState => "ask_state",
            DialogueStep::AskHelpType => "ask_help_type",
            DialogueStep::AskCustomer => "ask_customer",
            DialogueStep::AskEnvironment => "ask_environment",
            DialogueStep::AskPerformance => "ask_performance",
            DialogueStep::CustomerProcess => "customer_process",
            DialogueStep::EnvProcess => "env_process",
            DialogueStep::PerformanceProcess => "performance_process",
            DialogueStep::LunchProcess => "lunch_process",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "welcome" => Some(DialogueStep::Welcome),
            "ask_state" => Some(DialogueStep::AskState),
            "ask_help_type" => Some(DialogueStep::AskHelpType),
            "ask_customer" => Some(DialogueStep::AskCustomer),
            "ask_environment" => Some(DialogueStep::AskEnvironment),
            "ask_performance" => Some(DialogueStep::AskPerformance),
            "customer_process" => Some(DialogueStep::CustomerProcess),
            "env_process" => Some(DialogueStep::EnvProcess),
            "performance_process" => Some(DialogueStep::PerformanceProcess),
            "lunch_process" => Some(DialogueStep::LunchProcess),
            _ => None,
        }
    }
}

impl Default for DialogueStep {
    fn default() -> Self {
        DialogueStep::Welcome
    }
}

impl std::fmt::Display for DialogueStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The on-call region the user selected during the welcome step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Region {
    Amer,
    Emea,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Amer => "AMER",
            Region::Emea => "EMEA",
        }
    }
}

/// What kind of issue the user is reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    Customer,
    Environment,
    Performance,
    Lunch,
    Unset,
}

impl IssueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::Customer => "customer",
            IssueType::Environment => "environment",
            IssueType::Performance => "performance",
            IssueType::Lunch => "lunch",
            IssueType::Unset => "unset",
        }
    }
}

impl Default for IssueType {
    fn default() -> Self {
        IssueType::Unset
    }
}

/// Per-conversation dialogue state.
///
/// Created lazily on first reference to an unseen conversation id and
/// mutated only through the dialogue engine's transition effects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub step: DialogueStep,
    pub region: Option<Region>,
    pub locality: Option<String>,
    pub issue_type: IssueType,
    pub customer: Option<String>,
    pub environment: Option<String>,
    pub performance_details: Option<String>,
    /// Steps the session has passed through, oldest first. Bookkeeping only.
    pub completed_steps: Vec<DialogueStep>,
    pub created_at: DateTime<Utc>,
    pub last_active_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            step: DialogueStep::Welcome,
            region: None,
            locality: None,
            issue_type: IssueType::Unset,
            customer: None,
            environment: None,
            performance_details: None,
            completed_steps: Vec::new(),
            created_at: now,
            last_active_at: now,
        }
    }

    /// Record activity for TTL/eviction accounting.
    pub fn touch(&mut self) {
        self.last_active_at = Utc::now();
    }

    /// Move to a new step, recording the one we are leaving.
    pub fn advance(&mut self, next: DialogueStep) {
        if self.step != next {
            self.completed_steps.push(self.step);
        }
        self.step = next;
    }

    /// Reset the session back to its initial state, keeping the id.
    pub fn reset(&mut self) {
        let id = std::mem::take(&mut self.id);
        *self = Session::new(id);
    }
}
