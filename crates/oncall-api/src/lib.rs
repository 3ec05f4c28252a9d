//! HTTP surface for the assistant.
//!
//! axum router exposing the chat endpoint, an SSE streaming variant, a
//! health probe, and the incident-webhook integration routes.

pub mod error;
pub mod handlers;
pub mod notify;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use notify::{LogNotifier, Notifier};
pub use routes::{create_router, start_server};
pub use state::AppState;
