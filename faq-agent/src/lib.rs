//! FAQ agent: function catalog and the two-pass orchestration protocol.

pub mod catalog;
pub mod dispatch;
pub mod errors;
pub mod orchestrator;
pub mod prompts;

pub use catalog::{CatalogConfig, FunctionCatalog};
pub use errors::{AgentError, InvocationError};
pub use orchestrator::{
    ChatResult, DATABASE_STATS_CATEGORY, OUT_OF_SCOPE_CATEGORY, Orchestrator, derive_category,
};
pub use prompts::OUT_OF_SCOPE_ANSWER;
