//! HTTP front end for a chat widget
//!
//! Every request gets its own [`RecordingSink`]; the response body is the
//! list of widget events the request produced.

use crate::error::ParlorError;
use crate::widget::{ChatEvent, ChatWidget, RecordingSink};
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EventsResponse {
    pub events: Vec<ChatEvent>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub bot: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn internal_error(err: ParlorError) -> HandlerError {
    error!(error = %err, "Chat request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

pub fn router(widget: Arc<ChatWidget>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/chat/start", post(start_handler))
        .route("/chat/message", post(message_handler))
        .layer(CorsLayer::permissive())
        .with_state(widget)
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

async fn health_handler(State(widget): State<Arc<ChatWidget>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        bot: widget.bot().kind().to_string(),
    })
}

async fn start_handler(
    State(widget): State<Arc<ChatWidget>>,
) -> Result<Json<EventsResponse>, HandlerError> {
    let sink = RecordingSink::new();
    widget.on_chat_start(&sink).await.map_err(internal_error)?;
    Ok(Json(EventsResponse {
        events: sink.events(),
    }))
}

async fn message_handler(
    State(widget): State<Arc<ChatWidget>>,
    Json(request): Json<MessageRequest>,
) -> Result<Json<EventsResponse>, HandlerError> {
    if request.content.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "content must not be empty".to_string(),
            }),
        ));
    }

    info!(bot = %widget.bot().kind(), len = request.content.len(), "Chat message");
    let sink = RecordingSink::new();
    widget
        .on_message(&sink, &request.content)
        .await
        .map_err(internal_error)?;
    Ok(Json(EventsResponse {
        events: sink.events(),
    }))
}

/// Serve the widget on `0.0.0.0:<port>` until the process ends
pub async fn serve(widget: Arc<ChatWidget>, port: u16) -> std::io::Result<()> {
    let app = router(widget);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!(port, "Server listening");
    axum::serve(listener, app).await
}
