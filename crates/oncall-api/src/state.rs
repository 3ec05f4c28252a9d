//! Application state shared across all route handlers.

use std::sync::Arc;
use std::time::Instant;

use oncall_chat::ResponseRouter;
use oncall_core::OncallConfig;

use crate::notify::Notifier;

/// Shared application state.
///
/// All fields use `Arc` for cheap cloning across handler tasks.
#[derive(Clone)]
pub struct AppState {
    /// Per-message response router (dialogue, monitoring, LLM, rules).
    pub router: Arc<ResponseRouter>,
    /// Outward incident-notification sink.
    pub notifier: Arc<dyn Notifier>,
    /// Application configuration.
    pub config: Arc<OncallConfig>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        router: ResponseRouter,
        notifier: Arc<dyn Notifier>,
        config: OncallConfig,
    ) -> Self {
        Self {
            router: Arc::new(router),
            notifier,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }
}
