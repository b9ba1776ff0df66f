use std::time::Duration;

use faq_agent::AgentError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LineError>;

#[derive(Debug, Error)]
pub enum LineError {
    #[error("invalid webhook signature")]
    InvalidSignature,

    #[error("malformed webhook payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("http transport error: {0}")]
    HttpTransport(#[from] reqwest::Error),

    #[error("LINE API returned {status} for {url}: {snippet}")]
    HttpStatus {
        status: u16,
        url: String,
        snippet: String,
    },

    #[error("orchestration timed out after {0:?}")]
    Timeout(Duration),

    #[error("orchestration cancelled")]
    Cancelled,

    #[error("orchestration worker failed: {0}")]
    Worker(String),

    #[error(transparent)]
    Agent(#[from] AgentError),
}
