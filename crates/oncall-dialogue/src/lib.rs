//! Scripted dialogue engine.
//!
//! A finite-state machine over [`oncall_core::DialogueStep`]: each user
//! utterance is matched against an ordered transition table, the matched
//! rule's effect mutates the session, and the engine composes the reply
//! for the step that was reached. Scripted steps answer the user directly;
//! once a concrete subject is captured the engine flags the turn for the
//! router's data-driven path and hands over a focus hint.

pub mod engine;
pub mod resources;
pub mod transitions;

pub use engine::{DialogueEngine, TurnResult};
pub use resources::TextResources;
