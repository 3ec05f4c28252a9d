//! Router setup with all API routes and middleware.

use std::net::SocketAddr;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use oncall_core::{OncallError, Result};

use crate::handlers;
use crate::state::AppState;

/// Create the axum Router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS: allow the dashboard dev servers.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(
            ["http://localhost:3000", "http://localhost:5173"]
                .iter()
                .filter_map(|origin| origin.parse::<HeaderValue>().ok()),
        ))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/chat",
            post(handlers::chat).layer(DefaultBodyLimit::max(64 * 1024)),
        )
        .route(
            "/chat/stream",
            post(handlers::chat_stream).layer(DefaultBodyLimit::max(64 * 1024)),
        )
        .route(
            "/power-automate/webhook/incident",
            post(handlers::webhook_incident),
        )
        .route(
            "/power-automate/acknowledge/{service}",
            post(handlers::acknowledge_incident),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve the API until the process is stopped.
pub async fn start_server(state: AppState, addr: SocketAddr) -> Result<()> {
    let router = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| OncallError::Api(format!("Failed to bind {}: {}", addr, e)))?;
    info!("API server listening on {}", addr);
    axum::serve(listener, router)
        .await
        .map_err(|e| OncallError::Api(e.to_string()))
}
