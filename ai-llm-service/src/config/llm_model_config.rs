/// Configuration for a chat-completion model invocation.
///
/// # Fields
///
/// - `model`: The model identifier (e.g., `"gpt-4o"`).
/// - `endpoint`: API base URL without the `/v1/...` suffix.
/// - `api_key`: Optional API key (required by the OpenAI client).
/// - `max_tokens`: Maximum number of tokens to generate; sent only when set.
/// - `temperature`: Sampling temperature; sent only when set.
/// - `timeout_secs`: Optional request timeout in seconds.
///
/// # Examples
///
/// ```
/// use ai_llm_service::config::llm_model_config::LlmModelConfig;
///
/// let cfg = LlmModelConfig {
///     model: "gpt-4o".to_string(),
///     endpoint: "https://api.openai.com".to_string(),
///     api_key: Some("sk-...".to_string()),
///     max_tokens: None,
///     temperature: None,
///     timeout_secs: Some(60),
/// };
/// assert_eq!(cfg.model, "gpt-4o");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// Model identifier string.
    pub model: String,

    /// API base URL (scheme + host, optional path prefix).
    pub endpoint: String,

    /// Optional API key for authentication.
    pub api_key: Option<String>,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature (controls creativity).
    pub temperature: Option<f32>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}
