use ai_llm_service::telemetry;
use tracing::Level;
use tracing_subscriber::{Layer, filter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file.
    // A missing .env is fine: the process environment alone may be complete.
    if let Err(e) = dotenvy::dotenv() {
        eprintln!(".env not loaded ({e}); using process environment only");
    }

    let default_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into());
    let filter = telemetry::env_filter_with_level(&default_level.to_lowercase(), Level::DEBUG);

    // Library events are rendered by the ai-llm-service layer; everything else here.
    let app_layer = fmt::layer().with_target(false).with_filter(filter::filter_fn(|meta| {
        !meta.target().starts_with(telemetry::TARGET_PREFIX)
    }));

    tracing_subscriber::registry()
        .with(filter)
        .with(app_layer)
        .with(telemetry::layer())
        .init();

    api::start().await?;

    Ok(())
}
