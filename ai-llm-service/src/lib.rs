//! Shared LLM client layer: OpenAI chat completions with function calling,
//! environment-driven model config, unified errors and a tracing layer.

pub mod chat;
pub mod config;
pub mod error_handler;
pub mod services;
pub mod telemetry;

pub use chat::{
    ChatCompletion, ChatMessage, FunctionCall, FunctionDefinition, Role, ToolCall,
    ToolCallingModel, ToolDefinition,
};
pub use config::llm_model_config::LlmModelConfig;
pub use error_handler::AiLlmError;
pub use services::open_ai_service::OpenAiService;
