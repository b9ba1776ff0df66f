//! Orchestration errors.

use ai_llm_service::AiLlmError;
use organism_db::OrganismDbError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AgentError>;

/// Error surfaced to callers of `Orchestrator::answer`.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("invalid question: {0}")]
    InvalidQuestion(String),

    #[error("FAQ content not found for category: {0}")]
    FaqNotFound(String),

    #[error("invalid FAQ category: {category}. Available categories: {available:?}")]
    InvalidCategory {
        category: String,
        available: Vec<String>,
    },

    /// Model call failed during selection or synthesis.
    #[error("failed to process question: {0}")]
    Service(#[from] AiLlmError),

    #[error("failed to process question: model returned an empty answer")]
    EmptyAnswer,
}

impl AgentError {
    /// Content-missing class, reported to users as "not found".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AgentError::FaqNotFound(_) | AgentError::InvalidCategory { .. }
        )
    }

    /// Upstream model failure class.
    pub fn is_service(&self) -> bool {
        matches!(self, AgentError::Service(_) | AgentError::EmptyAnswer)
    }
}

/// Failure of a single function invocation. Recorded, never fatal on its own.
#[derive(Debug, Error)]
pub enum InvocationError {
    #[error("malformed arguments: {0}")]
    MalformedArguments(#[from] serde_json::Error),

    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    #[error("invalid FAQ category: {category}. Available categories: {available:?}")]
    InvalidCategory {
        category: String,
        available: Vec<String>,
    },

    #[error("FAQ content not found for category: {0}")]
    FaqNotFound(String),

    #[error(transparent)]
    Database(#[from] OrganismDbError),
}

impl InvocationError {
    /// Promotes content-missing failures to a caller-facing error.
    pub(crate) fn as_not_found(&self) -> Option<AgentError> {
        match self {
            InvocationError::FaqNotFound(c) => Some(AgentError::FaqNotFound(c.clone())),
            InvocationError::InvalidCategory {
                category,
                available,
            } => Some(AgentError::InvalidCategory {
                category: category.clone(),
                available: available.clone(),
            }),
            _ => None,
        }
    }
}
