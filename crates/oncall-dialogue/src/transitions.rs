//! Ordered transition table for the dialogue state machine.
//!
//! Each rule pairs a trigger predicate with a target step and a session
//! effect. Rules are checked top to bottom against the lowercased,
//! trimmed utterance; the first match wins. Keeping the table as data
//! lets the matching logic be tested in isolation from reply text.

use oncall_core::session::{DialogueStep, IssueType};

/// What a rule matches against the normalized utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Case-insensitive substring containment of any listed needle.
    AnyOf(&'static [&'static str]),
    /// Matches every utterance.
    Any,
}

impl Trigger {
    pub fn matches(&self, normalized: &str) -> bool {
        match self {
            Trigger::AnyOf(needles) => needles.iter().any(|needle| normalized.contains(needle)),
            Trigger::Any => true,
        }
    }
}

/// Session mutation applied when a rule fires. Capture effects store the
/// raw (unnormalized) utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    SetRegionAmer,
    SetRegionEmea,
    CaptureLocality,
    SetIssueType(IssueType),
    CaptureCustomer,
    CaptureEnvironment,
    CapturePerformance,
}

#[derive(Debug, Clone, Copy)]
pub struct TransitionRule {
    pub step: DialogueStep,
    pub trigger: Trigger,
    pub next: DialogueStep,
    pub effect: Option<Effect>,
}

/// The full transition table. Steps without an entry here repeat their
/// own prompt (welcome, ask_help_type fall-through) or loop in place
/// (the process steps), which the engine handles when no rule matches.
pub const TRANSITIONS: &[TransitionRule] = &[
    TransitionRule {
        step: DialogueStep::Welcome,
        trigger: Trigger::AnyOf(&["amer"]),
        next: DialogueStep::AskState,
        effect: Some(Effect::SetRegionAmer),
    },
    TransitionRule {
        step: DialogueStep::Welcome,
        trigger: Trigger::AnyOf(&["emea"]),
        next: DialogueStep::AskHelpType,
        effect: Some(Effect::SetRegionEmea),
    },
    TransitionRule {
        step: DialogueStep::AskState,
        trigger: Trigger::Any,
        next: DialogueStep::AskHelpType,
        effect: Some(Effect::CaptureLocality),
    },
    TransitionRule {
        step: DialogueStep::AskHelpType,
        trigger: Trigger::AnyOf(&["1", "customer"]),
        next: DialogueStep::AskCustomer,
        effect: Some(Effect::SetIssueType(IssueType::Customer)),
    },
    TransitionRule {
        step: DialogueStep::AskHelpType,
        trigger: Trigger::AnyOf(&["2", "environment"]),
        next: DialogueStep::AskEnvironment,
        effect: Some(Effect::SetIssueType(IssueType::Environment)),
    },
    TransitionRule {
        step: DialogueStep::AskHelpType,
        trigger: Trigger::AnyOf(&["3", "performance"]),
        next: DialogueStep::AskPerformance,
        effect: Some(Effect::SetIssueType(IssueType::Performance)),
    },
    TransitionRule {
        step: DialogueStep::AskHelpType,
        trigger: Trigger::AnyOf(&["4", "lunch"]),
        next: DialogueStep::LunchProcess,
        effect: Some(Effect::SetIssueType(IssueType::Lunch)),
    },
    TransitionRule {
        step: DialogueStep::AskCustomer,
        trigger: Trigger::Any,
        next: DialogueStep::CustomerProcess,
        effect: Some(Effect::CaptureCustomer),
    },
    TransitionRule {
        step: DialogueStep::AskEnvironment,
        trigger: Trigger::Any,
        next: DialogueStep::EnvProcess,
        effect: Some(Effect::CaptureEnvironment),
    },
    TransitionRule {
        step: DialogueStep::AskPerformance,
        trigger: Trigger::Any,
        next: DialogueStep::PerformanceProcess,
        effect: Some(Effect::CapturePerformance),
    },
];

/// First rule whose step matches and whose trigger fires, if any.
pub fn match_rule(step: DialogueStep, normalized: &str) -> Option<&'static TransitionRule> {
    TRANSITIONS
        .iter()
        .find(|rule| rule.step == step && rule.trigger.matches(normalized))
}
