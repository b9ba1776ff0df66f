use std::time::Instant;

use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");
pub const X_PROCESS_TIME: HeaderName = HeaderName::from_static("x-process-time");

/// Reuses a caller-supplied request id or mints a new one.
fn request_id(req: &Request<Body>) -> String {
    req.headers()
        .get(X_REQUEST_ID)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .unwrap_or_else(|| format!("req-{}", Uuid::new_v4()))
}

/// Stamps every response with `X-Process-Time` (seconds) and `X-Request-Id`.
pub async fn process_time(req: Request<Body>, next: Next) -> Response {
    let started = Instant::now();
    let id = request_id(&req);

    let mut res = next.run(req).await;

    let elapsed = started.elapsed().as_secs_f64();
    let headers = res.headers_mut();
    if let Ok(v) = HeaderValue::from_str(&format!("{elapsed:.6}")) {
        headers.insert(X_PROCESS_TIME, v);
    }
    if let Ok(v) = HeaderValue::from_str(&id) {
        headers.insert(X_REQUEST_ID, v);
    }
    res
}
