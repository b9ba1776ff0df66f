use std::{fmt, time::Duration};

pub const DEFAULT_API_BASE: &str = "https://api.line.me";
pub const DEFAULT_REPLY_TIMEOUT: Duration = Duration::from_secs(30);

/// Messaging channel credentials and reply limits.
#[derive(Clone, PartialEq, Eq)]
pub struct LineConfig {
    pub channel_access_token: String,
    pub channel_secret: String,
    pub api_base: String,
    /// Upper bound on one orchestration before the fallback reply is sent.
    pub reply_timeout: Duration,
}

impl LineConfig {
    pub fn new(channel_access_token: impl Into<String>, channel_secret: impl Into<String>) -> Self {
        Self {
            channel_access_token: channel_access_token.into(),
            channel_secret: channel_secret.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            reply_timeout: DEFAULT_REPLY_TIMEOUT,
        }
    }
}

impl fmt::Debug for LineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineConfig")
            .field("channel_access_token", &"***")
            .field("channel_secret", &"***")
            .field("api_base", &self.api_base)
            .field("reply_timeout", &self.reply_timeout)
            .finish()
    }
}
