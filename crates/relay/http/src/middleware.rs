//! HTTP middleware.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

/// Log each request and the status it finished with.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    tracing::info!(method = %method, uri = %uri, "incoming request");

    let response = next.run(request).await;

    if response.status().is_server_error() {
        tracing::warn!(method = %method, uri = %uri, status = %response.status(), "request failed");
    } else {
        tracing::info!(
            method = %method,
            uri = %uri,
            status = %response.status(),
            "request completed"
        );
    }

    response
}
