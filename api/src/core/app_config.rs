//! Immutable service configuration, read once from the environment.
//!
//! # Environment variables
//!
//! - `APP_NAME`, `APP_VERSION`, `LOG_LEVEL`, `HOST`, `PORT`
//! - `OPENAI_*` (see `ai_llm_service::config::default_config`)
//! - `FAQ_DIR`, `FAQ_EXTENSION`, `FAQ_METADATA_FILE`
//! - `DATABASE_CSV_PATH`, `EXPOSE_DATABASE_FUNCTIONS`
//! - `CORS_ORIGINS` (comma separated)
//! - `RATE_LIMIT_REQUESTS`, `RATE_LIMIT_WINDOW` (seconds)
//! - `LINE_CHANNEL_ACCESS_TOKEN`, `LINE_CHANNEL_SECRET` (required),
//!   `LINE_API_BASE`, `LINE_REPLY_TIMEOUT_SECS`

use std::{path::PathBuf, str::FromStr, time::Duration};

use ai_llm_service::{
    LlmModelConfig, config::default_config::config_openai_chat, error_handler::env_or,
};
use colored::Colorize;
use faq_agent::CatalogConfig;
use faq_knowledge::{DEFAULT_EXTENSION, DEFAULT_METADATA_FILE, KnowledgeConfig};
use line_bridge::{DEFAULT_API_BASE, LineConfig};
use organism_db::{DEFAULT_CSV_PATH, OrganismDbConfig};

use crate::error_handler::{AppError, AppResult};

pub const DEFAULT_APP_NAME: &str = "FAQ Chatbot";
pub const DEFAULT_APP_VERSION: &str = "1.0.0";
pub const DEFAULT_CORS_ORIGINS: &str = "http://localhost:8080,http://127.0.0.1:8080";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Sliding window limit per client address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub requests: u32,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests: 60,
            window: Duration::from_secs(60),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub app_name: String,
    pub app_version: String,
    pub server: ServerConfig,
    pub llm: LlmModelConfig,
    pub knowledge: KnowledgeConfig,
    pub organism_db: OrganismDbConfig,
    pub catalog: CatalogConfig,
    pub line: LineConfig,
    pub rate_limit: RateLimitConfig,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    /// # Errors
    /// `Llm` for model settings, `InvalidEnv` for everything else.
    pub fn from_env() -> AppResult<Self> {
        let llm = config_openai_chat()?;

        let server = ServerConfig {
            host: env_or("HOST", "0.0.0.0"),
            port: parse_env("PORT", 8080)?,
        };

        let knowledge = KnowledgeConfig {
            dir: PathBuf::from(env_or("FAQ_DIR", "faqs")),
            extension: env_or("FAQ_EXTENSION", DEFAULT_EXTENSION),
            metadata_file: env_or("FAQ_METADATA_FILE", DEFAULT_METADATA_FILE),
        };

        let organism_db = OrganismDbConfig {
            csv_path: PathBuf::from(env_or("DATABASE_CSV_PATH", DEFAULT_CSV_PATH)),
        };

        let catalog = CatalogConfig {
            expose_database_functions: parse_bool_env("EXPOSE_DATABASE_FUNCTIONS", true)?,
        };

        let line = LineConfig {
            api_base: env_or("LINE_API_BASE", DEFAULT_API_BASE),
            reply_timeout: Duration::from_secs(parse_env("LINE_REPLY_TIMEOUT_SECS", 30u64)?),
            ..LineConfig::new(
                required_env("LINE_CHANNEL_ACCESS_TOKEN")?,
                required_env("LINE_CHANNEL_SECRET")?,
            )
        };

        let rate_limit = RateLimitConfig {
            requests: parse_env("RATE_LIMIT_REQUESTS", 60u32)?,
            window: Duration::from_secs(parse_env("RATE_LIMIT_WINDOW", 60u64)?),
        };
        if rate_limit.requests == 0 || rate_limit.window.is_zero() {
            return Err(AppError::InvalidEnv {
                var: "RATE_LIMIT_REQUESTS",
                reason: "rate limit requests and window must be positive".into(),
            });
        }

        Ok(Self {
            app_name: env_or("APP_NAME", DEFAULT_APP_NAME),
            app_version: env_or("APP_VERSION", DEFAULT_APP_VERSION),
            server,
            llm,
            knowledge,
            organism_db,
            catalog,
            line,
            rate_limit,
            cors_origins: split_origins(&env_or("CORS_ORIGINS", DEFAULT_CORS_ORIGINS)),
        })
    }

    /// Prints the effective settings with secrets masked.
    pub fn print_banner(&self) {
        let row = |k: &str, v: String| println!("  {:<28} {}", k.dimmed(), v);

        println!(
            "{} {}",
            self.app_name.bold().green(),
            format!("v{}", self.app_version).green()
        );
        row("listen", self.server.address());
        row("model", self.llm.model.clone());
        row("model endpoint", self.llm.endpoint.clone());
        row("api key", mask(self.llm.api_key.as_deref().unwrap_or("")));
        row(
            "max tokens / temperature",
            format!("{:?} / {:?}", self.llm.max_tokens, self.llm.temperature),
        );
        row("faq dir", self.knowledge.dir.display().to_string());
        row("organism csv", self.organism_db.csv_path.display().to_string());
        row(
            "database functions",
            self.catalog.expose_database_functions.to_string(),
        );
        row("cors origins", self.cors_origins.join(", "));
        row(
            "rate limit",
            format!(
                "{} req / {}s",
                self.rate_limit.requests,
                self.rate_limit.window.as_secs()
            ),
        );
        row("line api", self.line.api_base.clone());
        row("line access token", mask(&self.line.channel_access_token));
        row("line channel secret", mask(&self.line.channel_secret));
        row(
            "line reply timeout",
            format!("{}s", self.line.reply_timeout.as_secs()),
        );
    }
}

fn required_env(var: &'static str) -> AppResult<String> {
    match std::env::var(var) {
        Ok(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(AppError::InvalidEnv {
            var,
            reason: "must be set".into(),
        }),
    }
}

fn parse_env<T>(var: &'static str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(var) {
        Ok(v) if !v.trim().is_empty() => v.trim().parse().map_err(|e: T::Err| AppError::InvalidEnv {
            var,
            reason: e.to_string(),
        }),
        _ => Ok(default),
    }
}

fn parse_bool_env(var: &'static str, default: bool) -> AppResult<bool> {
    match std::env::var(var) {
        Ok(v) if !v.trim().is_empty() => parse_bool(&v).ok_or_else(|| AppError::InvalidEnv {
            var,
            reason: format!("expected true/false, got `{v}`"),
        }),
        _ => Ok(default),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn mask(secret: &str) -> String {
    let shown: String = secret.chars().take(4).collect();
    if secret.chars().count() <= 8 {
        "***".to_string()
    } else {
        format!("{shown}***")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_blank_dropped() {
        assert_eq!(
            split_origins(" http://a.test , ,http://b.test"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }

    #[test]
    fn bool_values() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" off "), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn secrets_are_masked() {
        assert_eq!(mask("short"), "***");
        assert_eq!(mask("sk-abcdefghijkl"), "sk-a***");
    }
}
