//! LLM-backed incident analysis.
//!
//! The service wraps an optional [`LlmProvider`]; absence of a provider is
//! a routing signal, not an error. Every call resolves to an explicit
//! [`LlmOutcome`] so the caller's fallback is a pattern match.

pub mod prompt;
pub mod provider;
pub mod service;
pub mod types;

pub use provider::{FragmentStream, LlmError, LlmProvider, MockProvider};
pub use service::LlmService;
pub use types::{IncidentContext, LlmOutcome, LlmReply};
