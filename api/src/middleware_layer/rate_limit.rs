//! Per-client sliding-window rate limiting.

use std::{
    collections::{HashMap, VecDeque},
    net::SocketAddr,
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::{core::app_config::RateLimitConfig, core::app_state::AppState, error_handler::AppError};

/// Prune idle clients once the table grows past this many entries.
const PRUNE_THRESHOLD: usize = 1024;

#[derive(Clone)]
pub struct RateLimiter {
    config: RateLimitConfig,
    clients: Arc<Mutex<HashMap<String, VecDeque<Instant>>>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            clients: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Records a request from `client`.
    ///
    /// Returns `Err(retry_after)` when the client already made
    /// `config.requests` requests inside the current window.
    pub async fn check(&self, client: &str) -> Result<(), Duration> {
        self.check_at(client, Instant::now()).await
    }

    async fn check_at(&self, client: &str, now: Instant) -> Result<(), Duration> {
        let window = self.config.window;
        let mut clients = self.clients.lock().await;

        let hits = clients.entry(client.to_string()).or_default();
        while hits
            .front()
            .is_some_and(|&t| now.duration_since(t) >= window)
        {
            hits.pop_front();
        }

        if hits.len() >= self.config.requests as usize {
            let retry_after = hits
                .front()
                .map(|&t| window.saturating_sub(now.duration_since(t)))
                .unwrap_or(window);
            return Err(retry_after);
        }
        hits.push_back(now);

        if clients.len() > PRUNE_THRESHOLD {
            clients.retain(|_, hits| hits.back().is_some_and(|&t| now.duration_since(t) < window));
            debug!(active = clients.len(), "rate limiter pruned idle clients");
        }
        Ok(())
    }
}

/// Rejects requests over the configured limit with 429.
pub async fn rate_limit(State(state): State<Arc<AppState>>, request: Request, next: Next) -> Response {
    let client = client_key(&request);
    match state.rate_limiter.check(&client).await {
        Ok(()) => next.run(request).await,
        Err(retry_after) => {
            warn!(%client, "rate limit exceeded");
            AppError::RateLimited {
                retry_after_secs: retry_after.as_secs().max(1),
            }
            .into_response()
        }
    }
}

/// Peer IP from the connection, else the first `X-Forwarded-For` entry.
fn client_key(request: &Request) -> String {
    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(requests: u32, secs: u64) -> RateLimiter {
        RateLimiter::new(RateLimitConfig {
            requests,
            window: Duration::from_secs(secs),
        })
    }

    #[tokio::test]
    async fn allows_up_to_limit_then_rejects() {
        let rl = limiter(2, 60);
        let t0 = Instant::now();
        assert!(rl.check_at("1.1.1.1", t0).await.is_ok());
        assert!(rl.check_at("1.1.1.1", t0).await.is_ok());
        let retry = rl.check_at("1.1.1.1", t0).await.unwrap_err();
        assert_eq!(retry, Duration::from_secs(60));
        assert!(rl.check_at("2.2.2.2", t0).await.is_ok());
    }

    #[tokio::test]
    async fn window_slides() {
        let rl = limiter(1, 10);
        let t0 = Instant::now();
        assert!(rl.check_at("c", t0).await.is_ok());
        assert!(rl.check_at("c", t0 + Duration::from_secs(5)).await.is_err());
        assert!(rl.check_at("c", t0 + Duration::from_secs(10)).await.is_ok());
    }
}
