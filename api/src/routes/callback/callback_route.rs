//! POST /callback: the LINE webhook.
//!
//! The signature is checked and the body decoded before acknowledging;
//! answering and replying happen afterwards on a blocking worker.

use std::sync::Arc;

use axum::{Json, body::Bytes, extract::State, http::HeaderMap};
use serde::Serialize;
use tracing::info;

use crate::{core::app_state::AppState, error_handler::AppResult};

pub const SIGNATURE_HEADER: &str = "x-line-signature";

#[derive(Debug, Serialize)]
pub struct CallbackResponse {
    pub status: &'static str,
}

pub async fn callback_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<CallbackResponse>> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());
    let payload = state.bridge.parse_verified(&body, signature)?;

    info!(events = payload.events.len(), "LINE webhook received");

    // Detached; replies go out through the messaging API, not this response.
    let bridge = Arc::clone(&state.bridge);
    tokio::task::spawn_blocking(move || bridge.dispatch(payload));

    Ok(Json(CallbackResponse { status: "ok" }))
}
