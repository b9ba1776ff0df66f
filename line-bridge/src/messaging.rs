//! Reply delivery through the LINE Messaging API.
//!
//! - POST {api_base}/v2/bot/message/reply

use async_trait::async_trait;
use ai_llm_service::error_handler::make_snippet;
use reqwest::header;
use serde::Serialize;
use tracing::{debug, error};

use crate::{
    config::LineConfig,
    errors::{LineError, Result},
};

/// Maximum characters of a single text message.
pub const MAX_TEXT_CHARS: usize = 5000;

/// Sends a text reply for a reply token.
#[async_trait]
pub trait ReplySender: Send + Sync {
    async fn reply_text(&self, reply_token: &str, text: &str) -> Result<()>;
}

#[derive(Debug)]
pub struct LineMessagingClient {
    client: reqwest::Client,
    url_reply: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    reply_token: &'a str,
    messages: [TextMessage<'a>; 1],
}

#[derive(Serialize)]
struct TextMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

impl LineMessagingClient {
    /// # Errors
    /// `Config` for a blank token or a non-http base URL,
    /// `HttpTransport` if the client cannot be built.
    pub fn new(cfg: &LineConfig) -> Result<Self> {
        let token = cfg.channel_access_token.trim();
        if token.is_empty() {
            return Err(LineError::Config("channel access token is empty".into()));
        }
        let base = cfg.api_base.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(LineError::Config(format!("invalid LINE API base: {base}")));
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| LineError::Config(format!("invalid access token header: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .timeout(cfg.reply_timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            url_reply: format!("{}/v2/bot/message/reply", base.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl ReplySender for LineMessagingClient {
    async fn reply_text(&self, reply_token: &str, text: &str) -> Result<()> {
        let body = ReplyRequest {
            reply_token,
            messages: [TextMessage { kind: "text", text }],
        };
        debug!(chars = text.chars().count(), "POST {}", self.url_reply);

        let resp = self.client.post(&self.url_reply).json(&body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let raw = resp.text().await.unwrap_or_default();
            error!(status = status.as_u16(), "LINE reply rejected");
            return Err(LineError::HttpStatus {
                status: status.as_u16(),
                url: self.url_reply.clone(),
                snippet: make_snippet(&raw),
            });
        }
        Ok(())
    }
}

/// Cuts `text` to at most [`MAX_TEXT_CHARS`] characters.
pub fn truncate_for_reply(text: &str) -> &str {
    match text.char_indices().nth(MAX_TEXT_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_for_reply("你好"), "你好");
    }

    #[test]
    fn long_text_is_cut_on_char_boundary() {
        let long = "測".repeat(MAX_TEXT_CHARS + 10);
        let cut = truncate_for_reply(&long);
        assert_eq!(cut.chars().count(), MAX_TEXT_CHARS);
    }

    #[test]
    fn reply_body_shape() {
        let body = ReplyRequest {
            reply_token: "tok",
            messages: [TextMessage {
                kind: "text",
                text: "hi",
            }],
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"replyToken": "tok", "messages": [{"type": "text", "text": "hi"}]})
        );
    }

    #[test]
    fn client_rejects_blank_token() {
        let cfg = LineConfig::new(" ", "secret");
        assert!(matches!(
            LineMessagingClient::new(&cfg),
            Err(LineError::Config(_))
        ));
    }
}
