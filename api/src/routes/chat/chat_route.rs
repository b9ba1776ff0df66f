//! POST /api/chat: answers a question through the FAQ agent.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::{info, instrument};

use crate::{
    core::app_state::AppState,
    error_handler::AppResult,
    routes::chat::{chat_request::ChatRequest, chat_response::ChatResponse},
};

/// Handler: POST /api/chat
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8080/api/chat \
///   -H 'content-type: application/json' \
///   -d '{"question":"How long does a report take?"}'
/// ```
#[instrument(name = "chat_route", skip_all)]
pub async fn chat_route(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> AppResult<Json<ChatResponse>> {
    let Json(req) = body?;
    req.validate()?;

    let preview: String = req.question.chars().take(100).collect();
    info!(question = %preview, "processing question");

    let result = state
        .orchestrator
        .answer(&req.question, req.conversation_id)
        .await?;

    Ok(Json(result.into()))
}
