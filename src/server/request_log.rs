//! Access log middleware.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request};
use axum::middleware::Next;
use axum::response::Response;

/// Log remote address, method and full URI before the request is handled.
pub async fn log_request(request: Request, next: Next) -> Response {
    let remote = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "-".to_string());

    crate::log_event!(
        "http",
        "request",
        "{remote} {} {}",
        request.method(),
        request.uri()
    );

    next.run(request).await
}
