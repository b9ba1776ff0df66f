//! Default LLM config loaded from environment variables.
//!
//! # Environment variables
//!
//! - `OPENAI_API_KEY`      = API key (mandatory)
//! - `OPENAI_MODEL`        = model id (default `gpt-4o`)
//! - `OPENAI_BASE_URL`     = API base (default `https://api.openai.com`)
//! - `OPENAI_MAX_TOKENS`   = optional max tokens (u32)
//! - `OPENAI_TEMPERATURE`  = optional temperature (f32, `0.0..=2.0`)
//! - `OPENAI_TIMEOUT_SECS` = request timeout (default 60)

use crate::{
    config::llm_model_config::LlmModelConfig,
    error_handler::{
        AiLlmError, ConfigError, env_opt_f32, env_opt_u32, env_opt_u64, env_or, must_env,
        validate_http_endpoint, validate_range_f32,
    },
};

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Constructs the chat model config used for both orchestration passes.
///
/// Sampling knobs stay `None` unless explicitly configured, so requests
/// only carry them on purpose.
///
/// # Errors
/// - [`ConfigError::MissingVar`] if `OPENAI_API_KEY` is absent
/// - [`ConfigError::InvalidNumber`] for unparsable numbers
/// - [`ConfigError::InvalidFormat`] for a non-http base URL
/// - [`ConfigError::OutOfRange`] for a temperature outside `0.0..=2.0`
pub fn config_openai_chat() -> Result<LlmModelConfig, AiLlmError> {
    let api_key = must_env("OPENAI_API_KEY")?;
    let model = env_or("OPENAI_MODEL", DEFAULT_OPENAI_MODEL);
    if model.trim().is_empty() {
        return Err(ConfigError::EmptyModel.into());
    }

    let endpoint = env_or("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL);
    validate_http_endpoint("OPENAI_BASE_URL", &endpoint)?;

    let max_tokens = env_opt_u32("OPENAI_MAX_TOKENS")?;
    let temperature = env_opt_f32("OPENAI_TEMPERATURE")?;
    if let Some(t) = temperature {
        validate_range_f32("temperature", t, 0.0, 2.0)?;
    }
    let timeout_secs = env_opt_u64("OPENAI_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS);

    Ok(LlmModelConfig {
        model,
        endpoint,
        api_key: Some(api_key),
        max_tokens,
        temperature,
        timeout_secs: Some(timeout_secs),
    })
}
