use faq_agent::ChatResult;
use serde::Serialize;

/// Response body of POST /api/chat.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub answer: String,
    pub category: String,
    pub conversation_id: String,
    /// Seconds spent answering.
    pub processing_time: f64,
}

impl From<ChatResult> for ChatResponse {
    fn from(r: ChatResult) -> Self {
        Self {
            answer: r.answer,
            category: r.category,
            conversation_id: r.conversation_id,
            processing_time: r.processing_time,
        }
    }
}
