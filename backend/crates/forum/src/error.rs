//! Forum Error Types
//!
//! Forum-specific error variants that integrate with the unified
//! `kernel::error::app_error::AppError` system.

use auth::AuthError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::image_host::ImageHostError;
use platform::password::PasswordPolicyError;
use thiserror::Error;

/// Forum-specific result type alias
pub type ForumResult<T> = Result<T, ForumError>;

#[derive(Debug, Error)]
pub enum ForumError {
    /// Malformed body, bad path parameter or failed field validation
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// Caller does not own the resource
    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Image upload is not configured")]
    ImageHostUnavailable,

    #[error("Image host error: {0}")]
    ImageHost(#[from] ImageHostError),

    /// Already classified by the kernel's sqlx mapping
    #[error("Database error: {0}")]
    Database(AppError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ForumError {
    pub fn validation(message: impl Into<String>) -> Self {
        ForumError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ForumError::NotFound(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ForumError::Forbidden(message.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ForumError::Validation(_) => ErrorKind::BadRequest,
            ForumError::NotFound(_) => ErrorKind::NotFound,
            ForumError::Forbidden(_) => ErrorKind::Forbidden,
            ForumError::Conflict(_) => ErrorKind::Conflict,
            ForumError::ImageHostUnavailable => ErrorKind::ServiceUnavailable,
            ForumError::ImageHost(_) => ErrorKind::BadGateway,
            ForumError::Database(e) => e.kind(),
            ForumError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    ///
    /// Upstream and internal details stay in the logs.
    pub fn to_app_error(&self) -> AppError {
        match self {
            ForumError::ImageHost(_) => AppError::bad_gateway("Image host request failed"),
            ForumError::Database(e) => AppError::new(e.kind(), e.message().to_string()),
            ForumError::Internal(_) => AppError::internal("Internal server error"),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    fn log(&self) {
        match self {
            ForumError::Database(e) if e.is_server_error() => {
                tracing::error!(error = ?e, "Forum database error");
            }
            ForumError::Database(e) => {
                tracing::info!(error = %e, "Forum constraint violation");
            }
            ForumError::ImageHost(e) => {
                tracing::error!(error = %e, "Image host failure");
            }
            ForumError::Internal(msg) => {
                tracing::error!(message = %msg, "Forum internal error");
            }
            ForumError::Forbidden(msg) => {
                tracing::warn!(message = %msg, "Forbidden forum operation");
            }
            _ => {
                tracing::debug!(error = %self, "Forum error");
            }
        }
    }
}

impl IntoResponse for ForumError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<sqlx::Error> for ForumError {
    fn from(err: sqlx::Error) -> Self {
        ForumError::Database(AppError::from(err))
    }
}

impl From<AppError> for ForumError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest => ForumError::Validation(err.message().to_string()),
            ErrorKind::NotFound => ForumError::NotFound(err.message().to_string()),
            _ => ForumError::Internal(err.to_string()),
        }
    }
}

impl From<PasswordPolicyError> for ForumError {
    fn from(err: PasswordPolicyError) -> Self {
        ForumError::Validation(err.to_string())
    }
}

impl From<AuthError> for ForumError {
    fn from(err: AuthError) -> Self {
        ForumError::Internal(err.to_string())
    }
}
