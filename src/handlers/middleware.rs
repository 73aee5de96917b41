use std::any::Any;

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use tracing::error;

use super::response::{respond_error, MSG_NOT_FOUND, MSG_UNKNOWN};

/// Converts a caught panic into a 500 response.
///
/// Registered with `CatchPanicLayer::custom` as the outermost layer, so a
/// panicking handler takes down the request, never the connection or the
/// process. The panic payload is logged server-side only; clients see a
/// generic message.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        MSG_UNKNOWN.to_string()
    };

    error!(error = %message, "application panicked");

    respond_error(StatusCode::INTERNAL_SERVER_ERROR, MSG_UNKNOWN)
}

/// Rewrites axum's bare 405 responses into the standard error envelope,
/// naming the rejected method.
pub async fn method_not_allowed(request: Request, next: Next) -> Response {
    let method = request.method().clone();

    let response = next.run(request).await;

    if response.status() == StatusCode::METHOD_NOT_ALLOWED {
        return respond_error(
            StatusCode::METHOD_NOT_ALLOWED,
            format!("method {method} is not allowed"),
        );
    }

    response
}

/// Fallback handler for paths no route matches.
pub async fn not_found() -> Response {
    respond_error(StatusCode::NOT_FOUND, MSG_NOT_FOUND)
}
