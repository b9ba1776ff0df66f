//! Runs orchestration for webhook events from a blocking context.
//!
//! Webhook handling is synchronous: the HTTP route acknowledges the platform
//! right away and hands the payload to a blocking worker, which drives the
//! async orchestrator through a runtime [`Handle`]. Each event gets a
//! deadline; on expiry the worker task is cancelled and aborted and a fixed
//! apology is sent instead. Nothing raised here reaches the platform.

use std::{sync::Arc, time::Duration};

use faq_agent::{ChatResult, Orchestrator};
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

use crate::{
    config::LineConfig,
    errors::{LineError, Result},
    events::{MessageContent, MessageEvent, WebhookEvent, WebhookPayload},
    messaging::{ReplySender, truncate_for_reply},
    signature,
};

/// Reply used whenever answering fails or times out.
pub const FALLBACK_REPLY: &str = "抱歉，處理您的問題時發生錯誤，請稍後再試。";

pub struct WebhookBridge {
    orchestrator: Arc<Orchestrator>,
    sender: Arc<dyn ReplySender>,
    runtime: Handle,
    channel_secret: String,
    reply_timeout: Duration,
}

impl WebhookBridge {
    pub fn new(
        orchestrator: Arc<Orchestrator>,
        sender: Arc<dyn ReplySender>,
        runtime: Handle,
        cfg: &LineConfig,
    ) -> Self {
        Self {
            orchestrator,
            sender,
            runtime,
            channel_secret: cfg.channel_secret.clone(),
            reply_timeout: cfg.reply_timeout,
        }
    }

    /// Checks `X-Line-Signature` and decodes the raw body.
    ///
    /// # Errors
    /// `InvalidSignature` for a missing or wrong signature,
    /// `Payload` for a body that is not a webhook payload.
    pub fn parse_verified(&self, body: &[u8], signature: Option<&str>) -> Result<WebhookPayload> {
        let sig = signature.ok_or(LineError::InvalidSignature)?;
        if !signature::verify(&self.channel_secret, body, sig) {
            return Err(LineError::InvalidSignature);
        }
        Ok(serde_json::from_slice(body)?)
    }

    /// Handles every event of a payload in order. Blocks the calling thread.
    ///
    /// Must not be called from inside an async task; use `spawn_blocking`.
    pub fn dispatch(&self, payload: WebhookPayload) {
        for event in payload.events {
            self.handle_event(event);
        }
    }

    pub fn handle_event(&self, event: WebhookEvent) {
        match event {
            WebhookEvent::Message(MessageEvent {
                reply_token,
                source,
                message: MessageContent::Text { text, .. },
            }) => {
                info!(
                    conversation = %source.conversation_id(),
                    user = source.user_id().unwrap_or("-"),
                    "processing LINE text message"
                );
                self.answer_and_reply(
                    &reply_token,
                    text,
                    source.conversation_id().to_string(),
                );
            }
            WebhookEvent::Message(_) => info!("ignoring non-text message"),
            WebhookEvent::Unsupported => info!("ignoring unsupported webhook event"),
        }
    }

    #[instrument(skip_all, fields(conversation = %conversation_id))]
    fn answer_and_reply(&self, reply_token: &str, question: String, conversation_id: String) {
        let outcome = self
            .runtime
            .block_on(self.answer_with_deadline(question, conversation_id));

        match outcome {
            Ok(result) => {
                let text = truncate_for_reply(&result.answer);
                match self.runtime.block_on(self.sender.reply_text(reply_token, text)) {
                    Ok(()) => info!(category = %result.category, "LINE reply sent"),
                    Err(e) => {
                        error!(error = %e, "LINE reply failed");
                        self.send_fallback(reply_token);
                    }
                }
            }
            Err(e) => {
                error!(error = %e, "error processing LINE message");
                self.send_fallback(reply_token);
            }
        }
    }

    fn send_fallback(&self, reply_token: &str) {
        if let Err(e) = self
            .runtime
            .block_on(self.sender.reply_text(reply_token, FALLBACK_REPLY))
        {
            error!(error = %e, "failed to send fallback reply");
        }
    }

    /// Runs the orchestrator on a runtime task bounded by `reply_timeout`.
    ///
    /// On expiry the task's token is cancelled and the task aborted, so no
    /// worker outlives the call.
    async fn answer_with_deadline(
        &self,
        question: String,
        conversation_id: String,
    ) -> Result<ChatResult> {
        let token = CancellationToken::new();
        let worker_token = token.clone();
        let orchestrator = Arc::clone(&self.orchestrator);

        let mut worker = tokio::spawn(async move {
            tokio::select! {
                _ = worker_token.cancelled() => Err(LineError::Cancelled),
                res = orchestrator.answer(&question, Some(conversation_id)) => res.map_err(LineError::from),
            }
        });

        match tokio::time::timeout(self.reply_timeout, &mut worker).await {
            Ok(Ok(result)) => result,
            Ok(Err(join)) => Err(LineError::Worker(join.to_string())),
            Err(_) => {
                warn!(timeout = ?self.reply_timeout, "orchestration timed out, cancelling");
                token.cancel();
                worker.abort();
                Err(LineError::Timeout(self.reply_timeout))
            }
        }
    }
}
