use serde::Deserialize;

use crate::error_handler::AppError;

pub const MAX_QUESTION_CHARS: usize = 2000;

/// Request body for POST /api/chat.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// User question, 1..=2000 characters.
    pub question: String,
    /// Correlation token echoed back; generated when absent.
    #[serde(default)]
    pub conversation_id: Option<String>,
}

impl ChatRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let len = self.question.chars().count();
        if len == 0 || len > MAX_QUESTION_CHARS {
            return Err(AppError::Validation(format!(
                "question must be between 1 and {MAX_QUESTION_CHARS} characters (got {len})"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(q: &str) -> ChatRequest {
        ChatRequest {
            question: q.to_string(),
            conversation_id: None,
        }
    }

    #[test]
    fn length_bounds_count_characters() {
        assert!(req("").validate().is_err());
        assert!(req("?").validate().is_ok());
        assert!(req(&"問".repeat(MAX_QUESTION_CHARS)).validate().is_ok());
        assert!(req(&"a".repeat(MAX_QUESTION_CHARS + 1)).validate().is_err());
    }
}
