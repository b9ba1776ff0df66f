pub mod core;
pub mod error_handler;
pub mod middleware_layer;
mod routes;

use std::{net::SocketAddr, sync::Arc};

use axum::{
    Router,
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post},
};
use tokio::signal;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use crate::{
    core::{app_config::AppConfig, app_state::AppState},
    error_handler::{AppError, AppResult},
    middleware_layer::{process_time::process_time, rate_limit::rate_limit},
    routes::{
        callback::callback_route::callback_route, chat::chat_route::chat_route,
        health::health_route::health_route,
    },
};

/// Reads config, wires components and serves until Ctrl+C.
pub async fn start() -> AppResult<()> {
    let config = AppConfig::from_env()?;
    config.print_banner();
    let addr = config.server.address();

    info!(app = %config.app_name, version = %config.app_version, "starting");
    let state = Arc::new(AppState::build(config)?);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(AppError::Bind)?;
    info!(%addr, "listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(AppError::Server)?;

    info!("shutting down");
    Ok(())
}

/// HTTP surface: chat (rate limited), health and the LINE webhook.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    let chat = Router::new()
        .route("/api/chat", post(chat_route))
        .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit));

    Router::new()
        .merge(chat)
        .route("/api/health", get(health_route))
        .route("/callback", post(callback_route))
        .layer(middleware::from_fn(process_time))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::mirror_request()
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!(origin = %o, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
