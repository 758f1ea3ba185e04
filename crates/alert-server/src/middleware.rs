use std::time::Instant;

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderValue, Method, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::state::{AppState, ANY_ORIGIN};

// ── CORS ──────────────────────────────────────────────────────────────────────

/// Answers preflight requests and stamps allowed origins on responses.
pub async fn cors_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let origin = req
        .headers()
        .get("origin")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let allowed = state.allowed_origin(origin.as_deref());

    let mut resp = if req.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(req).await
    };

    if let Some(value) = allowed.and_then(|o| HeaderValue::from_str(&o).ok()) {
        let wildcard = value == ANY_ORIGIN;
        let headers = resp.headers_mut();
        headers.insert("access-control-allow-origin", value);
        headers.insert(
            "access-control-allow-methods",
            HeaderValue::from_static("*"),
        );
        headers.insert(
            "access-control-allow-headers",
            HeaderValue::from_static("*"),
        );
        if !wildcard {
            headers.insert("vary", HeaderValue::from_static("Origin"));
        }
    }
    resp
}

// ── Request tracing ───────────────────────────────────────────────────────────

/// Logs method, path, status and latency of every request.
pub async fn request_tracing_middleware(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let resp = next.run(req).await;

    tracing::debug!(
        method = %method,
        path = %path,
        status = resp.status().as_u16(),
        latency_ms = started.elapsed().as_millis() as u64,
        "request served"
    );
    resp
}
