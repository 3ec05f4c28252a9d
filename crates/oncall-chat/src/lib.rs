//! Per-message response routing.
//!
//! The router is the coordinator of one chat turn: scripted dialogue
//! first, then monitoring data plus correlation, then an optional LLM
//! attempt, then the deterministic rule-based fallback. Every turn ends
//! up in the conversation store regardless of which path answered.

pub mod error;
pub mod router;
pub mod rules;

pub use error::ChatError;
pub use router::{AnalysisType, ChatReply, ResponseRouter};
