use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::config::Environment;
use crate::mail::DeliveryError;
use crate::validation::ValidationError;

pub const RATE_LIMIT_MESSAGE: &str =
    "Too many contact form submissions from this IP, please try again later.";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Delivery failed: {0}")]
    Delivery(#[from] DeliveryError),

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Route not found")]
    NotFound,

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Delivery(_) | AppError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message shown to the caller. Never carries backend diagnostics.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation(err) => err.to_string(),
            AppError::BadRequest(_) => "Invalid request body".to_string(),
            AppError::Delivery(_) => "Failed to send message. Please try again later.".to_string(),
            AppError::RateLimited => RATE_LIMIT_MESSAGE.to_string(),
            AppError::NotFound => "Route not found".to_string(),
            AppError::InternalError(_) => "Something went wrong!".to_string(),
        }
    }

    /// Diagnostic text for server-side failures.
    pub fn detail(&self) -> Option<String> {
        match self {
            AppError::Delivery(err) => Some(err.to_string()),
            AppError::InternalError(msg) => Some(msg.clone()),
            _ => None,
        }
    }

    /// Render with error detail when running in development.
    pub fn with_environment(self, environment: Environment) -> ErrorResponse {
        ErrorResponse {
            error: self,
            environment,
        }
    }
}

/// An [`AppError`] that knows whether diagnostics may be exposed
#[derive(Debug)]
pub struct ErrorResponse {
    error: AppError,
    environment: Environment,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        error.with_environment(Environment::Production)
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status = self.error.status();
        if status.is_server_error() {
            tracing::error!(error = %self.error, "Request failed");
        }

        let mut body = json!({
            "success": false,
            "message": self.error.public_message(),
        });
        if self.environment.is_development() {
            if let Some(detail) = self.error.detail() {
                body["error"] = json!(detail);
            }
        }

        (status, Json(body)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        ErrorResponse::from(self).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
