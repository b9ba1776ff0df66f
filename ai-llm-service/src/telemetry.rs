//! Library-scoped tracing output for model calls.
//!
//! The binary owns the global subscriber; this module only contributes a
//! formatting layer restricted to events emitted from this crate, so model
//! latency and status lines get timestamps and source locations without
//! changing how the rest of the service logs.

use std::io::{self, IsTerminal};

use tracing::Level;
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, filter, fmt};

/// Crate target prefix used to filter only library-originated logs.
pub const TARGET_PREFIX: &str = "ai_llm_service";

/// RFC3339 UTC timer, e.g. `2025-09-12T10:20:30Z`.
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        w.write_str(&now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
    }
}

/// Formatting layer that renders ONLY events whose target starts with
/// [`TARGET_PREFIX`]: compact single line, `file:line`, ANSI colors when
/// stdout is a terminal.
pub fn layer<S>() -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let only_this_crate = filter::filter_fn(|meta| meta.target().starts_with(TARGET_PREFIX));

    fmt::layer()
        .with_timer(ChronoRfc3339Utc)
        .with_level(true)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(io::stdout().is_terminal())
        .event_format(fmt::format().compact().with_source_location(true))
        .with_filter(only_this_crate)
}

/// Level directive for this library only, e.g. `ai_llm_service=debug`.
pub fn level_directive(level: Level) -> Directive {
    format!("{TARGET_PREFIX}={}", level.as_str().to_lowercase())
        .parse()
        .unwrap_or_else(|_| LevelFilter::from_level(level).into())
}

/// `EnvFilter` from `RUST_LOG`, else `default`, plus a per-crate level for
/// model-call logs.
pub fn env_filter_with_level(default: &str, level: Level) -> EnvFilter {
    let base = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    base.add_directive(level_directive(level))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_targets_this_crate() {
        assert_eq!(level_directive(Level::DEBUG).to_string(), "ai_llm_service=debug");
    }
}
