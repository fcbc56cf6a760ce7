use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use tracing::error;

use service::errors::ServiceError;

/// JSON error response carrying the status to answer with. Every failure is
/// logged here, at the single point where it becomes a response.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub body: Value,
}

impl JsonApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, body: json!({ "error": message.into() }) }
    }

    /// A dependent service rejected an existence lookup: answer with the
    /// upstream's own status code and its body as the message, verbatim.
    pub fn upstream(code: u16, body: String) -> Self {
        let status = StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_GATEWAY);
        Self { status, body: json!({ "message": body }) }
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(msg) => Self::new(StatusCode::BAD_REQUEST, msg),
            ServiceError::NotFound(msg) => Self::new(StatusCode::NOT_FOUND, msg),
            ServiceError::Db(msg) => Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg),
            ServiceError::Dependency { code, body } => Self::upstream(code, body),
            ServiceError::Unavailable(msg) => Self::new(StatusCode::SERVICE_UNAVAILABLE, msg),
        }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        error!(status = %self.status, body = %self.body, "request failed");
        (self.status, Json(self.body)).into_response()
    }
}
