//! Oncall core crate - configuration, shared error type, and domain types.
//!
//! Every other crate in the workspace depends on this one. It carries no
//! logic beyond config loading; the interesting behavior lives in the
//! dialogue, monitor, insight, llm, and chat crates.

pub mod config;
pub mod error;
pub mod session;
pub mod types;

pub use config::OncallConfig;
pub use error::{OncallError, Result};
pub use session::{DialogueStep, IssueType, Region, Session};
pub use types::*;
