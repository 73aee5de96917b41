use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use tracing::{error, warn};

use crate::models::ValidationErrors;

/// Returned to clients when the request failed validation.
pub const MSG_INVALID_FIELDS: &str = "request contains invalid fields";

/// Returned for requests to paths the router does not know.
pub const MSG_NOT_FOUND: &str = "resource not found";

/// Returned when the server hit a fault it cannot attribute.
pub const MSG_UNKNOWN: &str = "unknown error";

/// The envelope every error response is wrapped in. Clients always find
/// a human readable string at `error.message`, and field-level details at
/// `error.validation_errors` when the request was rejected by validation.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<ValidationErrors>,
}

/// Serializes `body` as JSON with the given status.
pub fn respond<T: Serialize>(status: StatusCode, body: T) -> Response {
    (status, Json(body)).into_response()
}

/// An error response with just a message. Logs the status and message
/// before the body is written, so errors built by middleware and fallback
/// handlers are visible without each call site logging on its own.
pub fn respond_error(status: StatusCode, message: impl Into<String>) -> Response {
    let message = message.into();

    if status.is_server_error() {
        error!(status = %status, error = %message, "request failed");
    } else {
        warn!(status = %status, error = %message, "request rejected");
    }

    respond(
        status,
        ErrorBody {
            error: ErrorDetail {
                message,
                validation_errors: None,
            },
        },
    )
}

/// A 400 carrying the per-field validation messages.
pub fn respond_validation_failed(errors: ValidationErrors) -> Response {
    respond(
        StatusCode::BAD_REQUEST,
        ErrorBody {
            error: ErrorDetail {
                message: MSG_INVALID_FIELDS.to_string(),
                validation_errors: Some(errors),
            },
        },
    )
}
