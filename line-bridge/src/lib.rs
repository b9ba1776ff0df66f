//! LINE messaging front end for the FAQ agent.

pub mod bridge;
pub mod config;
pub mod errors;
pub mod events;
pub mod messaging;
pub mod signature;

pub use bridge::{FALLBACK_REPLY, WebhookBridge};
pub use config::{DEFAULT_API_BASE, DEFAULT_REPLY_TIMEOUT, LineConfig};
pub use errors::LineError;
pub use events::{EventSource, MessageContent, MessageEvent, WebhookEvent, WebhookPayload};
pub use messaging::{LineMessagingClient, MAX_TEXT_CHARS, ReplySender};
