//! Route handlers.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio_stream::StreamExt;
use tracing::{error, info};

use oncall_chat::ChatReply;
use oncall_core::types::{format_ts, IncidentAlert};

use crate::error::ApiError;
use crate::state::AppState;

// ====== Chat ======

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
    /// Client-supplied dialogue step to resume at; unknown names reset
    /// the conversation.
    #[serde(default)]
    pub step: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// POST /chat - run one chat turn through the response router.
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>, ApiError> {
    if request.message.trim().is_empty() {
        return Err(ApiError::BadRequest("message is required".to_string()));
    }
    let conversation_id = request.conversation_id.as_deref().unwrap_or("default");

    match state
        .router
        .handle_at_step(conversation_id, request.step.as_deref(), &request.message)
        .await
    {
        Ok(reply) => Ok(Json(reply)),
        Err(e) => {
            error!("Error processing chat message: {}", e);
            Err(ApiError::Internal("Error processing request".to_string()))
        }
    }
}

/// POST /chat/stream - streamed LLM analysis as SSE text fragments.
pub async fn chat_stream(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>> + Send>, ApiError> {
    if request.message.trim().is_empty() {
        return Err(ApiError::BadRequest("message is required".to_string()));
    }
    let conversation_id = request.conversation_id.as_deref().unwrap_or("default");

    let fragments = state
        .router
        .stream_analysis(conversation_id, &request.message)
        .await
        .map_err(|e| {
            error!("Error starting analysis stream: {}", e);
            ApiError::Internal("Error processing request".to_string())
        })?;

    let stream = fragments.map(|fragment| Ok(Event::default().data(fragment)));
    Ok(Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15))))
}

// ====== Health ======

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub uptime_seconds: u64,
}

/// GET /health - liveness probe.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}

// ====== Incident webhooks ======

#[derive(Debug, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub status: String,
    pub alert_id: String,
    pub message: String,
}

/// POST /power-automate/webhook/incident - accept an incident alert and
/// kick off outward notification in the background.
pub async fn webhook_incident(
    State(state): State<AppState>,
    Json(alert): Json<IncidentAlert>,
) -> Json<WebhookResponse> {
    info!(
        "Received incident alert for {}: {}",
        alert.service, alert.alert_name
    );
    let alert_id = format!("{}_{}", alert.service, format_ts(alert.timestamp));

    let notifier = state.notifier.clone();
    tokio::spawn(async move {
        if !notifier.notify_incident(&alert).await {
            error!("Outward notification failed for {}", alert.service);
        }
    });

    Json(WebhookResponse {
        status: "received".to_string(),
        alert_id,
        message: "Alert processing initiated".to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct AcknowledgeRequest {
    #[serde(default)]
    pub acknowledged_by: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AcknowledgeResponse {
    pub status: String,
    pub service: String,
    pub acknowledged_by: String,
    pub timestamp: String,
}

/// POST /power-automate/acknowledge/{service} - mark an incident as
/// acknowledged (called from the notification card).
pub async fn acknowledge_incident(
    State(_state): State<AppState>,
    Path(service): Path<String>,
    Json(request): Json<AcknowledgeRequest>,
) -> Json<AcknowledgeResponse> {
    let acknowledged_by = request
        .acknowledged_by
        .unwrap_or_else(|| "Unknown".to_string());
    info!("Incident acknowledged for {} by {}", service, acknowledged_by);

    Json(AcknowledgeResponse {
        status: "acknowledged".to_string(),
        service,
        acknowledged_by,
        timestamp: Utc::now().to_rfc3339(),
    })
}
