use std::sync::Arc;

use ai_llm_service::OpenAiService;
use faq_agent::{FunctionCatalog, Orchestrator};
use faq_knowledge::KnowledgeStore;
use line_bridge::{LineMessagingClient, WebhookBridge};
use organism_db::OrganismTable;
use tokio::runtime::Handle;
use tracing::info;

use crate::{
    core::app_config::AppConfig, error_handler::{AppError, AppResult},
    middleware_layer::rate_limit::RateLimiter,
};

/// Shared state for all HTTP handlers.
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub orchestrator: Arc<Orchestrator>,
    pub bridge: Arc<WebhookBridge>,
    pub rate_limiter: RateLimiter,
}

impl AppState {
    /// Wires every component from `config`.
    ///
    /// Must run inside the Tokio runtime; the webhook bridge keeps its handle.
    ///
    /// # Errors
    /// Fails if the knowledge directory or organism CSV cannot be loaded, or
    /// if either HTTP client cannot be built.
    pub fn build(config: AppConfig) -> AppResult<Self> {
        let knowledge = Arc::new(KnowledgeStore::load(&config.knowledge)?);
        info!(categories = ?knowledge.available_categories(), "knowledge base ready");

        let organisms = Arc::new(OrganismTable::load(&config.organism_db)?);

        let model = Arc::new(OpenAiService::new(config.llm.clone())?);
        let orchestrator = Arc::new(Orchestrator::new(
            model,
            knowledge,
            organisms,
            FunctionCatalog::new(config.catalog),
        ));

        let runtime = Handle::try_current()
            .map_err(|e| AppError::Internal(format!("no Tokio runtime: {e}")))?;
        let sender = Arc::new(LineMessagingClient::new(&config.line)?);
        let bridge = Arc::new(WebhookBridge::new(
            orchestrator.clone(),
            sender,
            runtime,
            &config.line,
        ));

        Ok(Self::new(config, orchestrator, bridge))
    }

    /// Assembles state from prebuilt parts.
    pub fn new(config: AppConfig, orchestrator: Arc<Orchestrator>, bridge: Arc<WebhookBridge>) -> Self {
        let rate_limiter = RateLimiter::new(config.rate_limit);
        Self {
            config: Arc::new(config),
            orchestrator,
            bridge,
            rate_limiter,
        }
    }
}
