use ai_llm_service::AiLlmError;
use axum::{
    Json,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use faq_agent::AgentError;
use faq_knowledge::KnowledgeError;
use line_bridge::LineError;
use organism_db::OrganismDbError;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error("invalid value for {var}: {reason}")]
    InvalidEnv { var: &'static str, reason: String },

    #[error(transparent)]
    Llm(#[from] AiLlmError),

    #[error(transparent)]
    Knowledge(#[from] KnowledgeError),

    #[error(transparent)]
    OrganismDb(#[from] OrganismDbError),

    // --- IO / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request ---
    #[error("{0}")]
    Validation(String),

    #[error("Too many requests, retry in {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("{0}")]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Line(#[from] LineError),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Agent(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            AppError::Agent(AgentError::InvalidQuestion(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Line(LineError::InvalidSignature) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::RateLimited { .. } => "RATE_LIMITED",
            AppError::Agent(e) if e.is_not_found() => "FAQ_NOT_FOUND",
            AppError::Agent(e) if e.is_service() => "OPENAI_SERVICE_ERROR",
            AppError::Agent(AgentError::InvalidQuestion(_)) => "VALIDATION_ERROR",
            AppError::Line(LineError::InvalidSignature) => "INVALID_SIGNATURE",
            _ => "INTERNAL_ERROR",
        }
    }

    fn title(&self) -> &'static str {
        match self.error_code() {
            "VALIDATION_ERROR" => "Validation error",
            "RATE_LIMITED" => "Rate limit exceeded",
            "FAQ_NOT_FOUND" => "FAQ not found",
            "OPENAI_SERVICE_ERROR" => "Service error",
            "INVALID_SIGNATURE" => "Invalid signature",
            _ => "Internal server error",
        }
    }

    /// User-facing detail. Internal failures never leak their cause.
    fn detail(&self) -> String {
        match self.error_code() {
            "INTERNAL_ERROR" => "An unexpected error occurred".to_string(),
            _ => self.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub detail: String,
    pub error_code: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            warn!(error = %self, "request rejected");
        }

        let body = ErrorBody {
            error: self.title(),
            detail: self.detail(),
            error_code: self.error_code(),
        };
        let mut resp = (status, Json(body)).into_response();
        if let AppError::RateLimited { retry_after_secs } = self {
            resp.headers_mut().insert(
                axum::http::header::RETRY_AFTER,
                HeaderValue::from(retry_after_secs),
            );
        }
        resp
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(err: axum::extract::rejection::JsonRejection) -> Self {
        AppError::Validation(err.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_and_status(e: AppError) -> (&'static str, StatusCode) {
        (e.error_code(), e.status_code())
    }

    #[test]
    fn agent_errors_map_to_http_classes() {
        assert_eq!(
            code_and_status(AgentError::FaqNotFound("reports".into()).into()),
            ("FAQ_NOT_FOUND", StatusCode::NOT_FOUND)
        );
        assert_eq!(
            code_and_status(AgentError::EmptyAnswer.into()),
            ("OPENAI_SERVICE_ERROR", StatusCode::INTERNAL_SERVER_ERROR)
        );
        assert_eq!(
            code_and_status(AgentError::InvalidQuestion("blank".into()).into()),
            ("VALIDATION_ERROR", StatusCode::UNPROCESSABLE_ENTITY)
        );
    }

    #[test]
    fn internal_detail_is_generic() {
        let e = AppError::Internal("db password is hunter2".into());
        assert_eq!(e.detail(), "An unexpected error occurred");
        assert_eq!(e.title(), "Internal server error");
    }

    #[test]
    fn webhook_errors() {
        assert_eq!(
            code_and_status(LineError::InvalidSignature.into()),
            ("INVALID_SIGNATURE", StatusCode::BAD_REQUEST)
        );
        assert_eq!(
            code_and_status(LineError::Cancelled.into()),
            ("INTERNAL_ERROR", StatusCode::INTERNAL_SERVER_ERROR)
        );
    }
}
