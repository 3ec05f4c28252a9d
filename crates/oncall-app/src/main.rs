//! Oncall application binary - composition root.
//!
//! Ties together all Oncall crates into a single executable:
//! 1. Load configuration from TOML
//! 2. Build the conversation store, dialogue engine, and monitoring hub
//! 3. Wire the optional LLM provider
//! 4. Start the axum REST API server

mod cli;

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;

use oncall_api::{routes, AppState, LogNotifier};
use oncall_chat::ResponseRouter;
use oncall_core::config::OncallConfig;
use oncall_dialogue::{DialogueEngine, TextResources};
use oncall_llm::{LlmProvider, LlmService, MockProvider};
use oncall_monitor::{MockConnector, MonitorHub};
use oncall_store::{ConversationStore, StoreLimits};

use cli::CliArgs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config first so the CLI can fall back to its values.
    let config_file = args.resolve_config_path();
    let config = OncallConfig::load_or_default(&config_file);

    // Tracing.
    let log_level = args
        .resolve_log_level()
        .unwrap_or_else(|| config.general.log_level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    tracing::info!("Starting Oncall v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration resolved");

    // Conversation store with the configured limits.
    let store = Arc::new(ConversationStore::new(StoreLimits::from(&config.chat)));

    // Dialogue engine with its text resources.
    let resource_dir = args
        .resolve_resource_dir()
        .unwrap_or_else(|| config.resources.dir.clone());
    let engine = DialogueEngine::new(TextResources::new(
        resource_dir,
        config.resources.locations_url.clone(),
    ));

    // Monitoring hub. Sources are mocked; the connector seam is where a
    // real Grafana/Prometheus/Elasticsearch/Nagios client plugs in.
    let hub = MonitorHub::new(Arc::new(MockConnector::new()));

    // Optional LLM provider.
    let provider: Option<Arc<dyn LlmProvider>> = match config.llm.provider.as_str() {
        "" => {
            tracing::info!("No LLM provider configured; rule-based responses only");
            None
        }
        "mock" => {
            tracing::info!("Using mock LLM provider");
            Some(Arc::new(MockProvider::default()))
        }
        other => {
            tracing::warn!(provider = %other, "Unknown LLM provider; disabling LLM path");
            None
        }
    };
    let llm = LlmService::new(provider, config.chat.history_turns);

    let router = ResponseRouter::new(store, engine, hub, llm, config.chat.window_hours);

    // === API server ===
    let port = args.resolve_port(config.general.port);
    let state = AppState::new(router, Arc::new(LogNotifier), config);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    routes::start_server(state, addr).await?;
    Ok(())
}
