use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use serde::Serialize;

use super::response::respond;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Liveness endpoint. Always reports healthy while the process serves.
pub async fn health_check() -> Response {
    respond(StatusCode::OK, HealthResponse { status: "ok" })
}

pub fn routes() -> Router {
    Router::new().route("/health", get(health_check))
}
