use crate::models::ErrorBody;
use crate::Error;
use axum::{
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

/// Failures as reported to studio clients.
///
/// Provider details never reach the response body except on the
/// provisioning route, which reports the provider message.
#[derive(Debug)]
pub enum ApiError {
    /// Server misconfiguration detected before any provider call.
    Config(String),
    /// Any failure talking to the provider, collapsed to a fixed message.
    Upstream(String),
    /// Request body missing, malformed, or lacking a required field.
    InvalidInput,
    MethodNotAllowed { method: Method, allow: &'static str },
}

impl ApiError {
    /// Log `err` in full and map it to a client-safe error whose upstream
    /// message is `public_message`.
    pub fn from_error(err: Error, public_message: &str) -> Self {
        match err {
            Error::Config(message) => {
                tracing::error!("Configuration error: {}", message);
                ApiError::Config(message)
            }
            Error::InvalidInput(message) => {
                tracing::warn!("Rejected request: {}", message);
                ApiError::InvalidInput
            }
            other => {
                tracing::error!("{}: {}", public_message, other);
                ApiError::Upstream(public_message.to_string())
            }
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Config(_) | ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InvalidInput => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            ApiError::Config(message) | ApiError::Upstream(message) => message,
            ApiError::InvalidInput => "Invalid request body".to_string(),
            ApiError::MethodNotAllowed { method, allow } => {
                return (
                    status,
                    [(header::ALLOW, allow)],
                    format!("Method {} Not Allowed", method),
                )
                    .into_response();
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
