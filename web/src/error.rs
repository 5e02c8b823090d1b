//! Error types for web handlers.
//!
//! [`AppError`] bridges the domain taxonomy (`CoreError`) and HTTP
//! responses, implementing Axum's `IntoResponse`. User errors surface
//! their message; system errors surface a generic message while the
//! detail is logged server-side.

use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cinebook_core::CoreError;
use serde::Serialize;

/// Application error type for web handlers.
///
/// # Examples
///
/// ```ignore
/// async fn handler() -> Result<Json<Data>, AppError> {
///     let movie = state.movies.by_id(id).await?; // CoreError -> AppError
///     Ok(Json(movie))
/// }
/// ```
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Error code (for client error handling)
    code: String,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub const fn new(status: StatusCode, message: String, code: String) -> Self {
        Self {
            status,
            message,
            code,
            source: None,
        }
    }

    /// Attach the underlying error for server-side logging.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// The HTTP status this error maps to.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Create a 400 Bad Request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            message.into(),
            "BAD_REQUEST".to_string(),
        )
    }

    /// Create a 401 Unauthorized error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            message.into(),
            "UNAUTHORIZED".to_string(),
        )
    }

    /// Create a 403 Forbidden error.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::FORBIDDEN,
            message.into(),
            "FORBIDDEN".to_string(),
        )
    }

    /// Create a 404 Not Found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            message.into(),
            "NOT_FOUND".to_string(),
        )
    }

    /// Create a 409 Conflict error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message.into(), "CONFLICT".to_string())
    }

    /// Create a 408 Request Timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::REQUEST_TIMEOUT,
            message.into(),
            "TIMEOUT".to_string(),
        )
    }

    /// Create a 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            message.into(),
            "INTERNAL_SERVER_ERROR".to_string(),
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    /// Error code (for client error handling).
    code: String,
    /// Human-readable error message.
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log internal errors
        if self.status.is_server_error() {
            if let Some(source) = &self.source {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    error = %source,
                    "Internal server error"
                );
            } else {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    "Internal server error"
                );
            }
        }

        let body = ErrorResponse {
            code: self.code,
            message: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}

/// Convert `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal("An internal error occurred").with_source(err)
    }
}

/// Maps the domain taxonomy to HTTP statuses. User errors carry their own
/// message; system errors get a generic message and the detail is logged.
impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match &err {
            CoreError::Validation(message) => Self::bad_request(message.clone()),
            CoreError::InvalidLimit { .. } | CoreError::OtpInvalid => {
                Self::bad_request(err.to_string())
            }
            CoreError::UsernameTaken
            | CoreError::EmailTaken
            | CoreError::EmailAlreadyVerified
            | CoreError::SeatsUnavailable
            | CoreError::BookingAlreadyPaid
            | CoreError::BookingCancelled => Self::conflict(err.to_string()),
            CoreError::InvalidCredentials | CoreError::SessionInvalid => {
                Self::unauthorized(err.to_string())
            }
            CoreError::EmailNotVerified | CoreError::BookingNotOwned => {
                Self::forbidden(err.to_string())
            }
            CoreError::NotFound { .. } => Self::not_found(err.to_string()),
            CoreError::DeadlineExceeded => {
                Self::timeout("The request did not complete in time")
                    .with_source(anyhow::Error::new(err.clone()))
            }
            CoreError::SubQuery { .. }
            | CoreError::Database(_)
            | CoreError::EmailDelivery(_)
            | CoreError::Internal => Self::internal("An internal error occurred")
                .with_source(anyhow::Error::new(err.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::bad_request("Invalid input");
        assert_eq!(err.to_string(), "[BAD_REQUEST] Invalid input");
    }

    #[test]
    fn user_errors_keep_their_message() {
        let err = AppError::from(CoreError::SeatsUnavailable);
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.message, "One or more seats are not available");

        let err = AppError::from(CoreError::InvalidLimit { limit: 0 });
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn auth_errors_map_to_401_and_403() {
        assert_eq!(
            AppError::from(CoreError::InvalidCredentials).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::from(CoreError::SessionInvalid).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::from(CoreError::BookingNotOwned).status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn system_errors_hide_the_detail() {
        let err = AppError::from(CoreError::Database("password in dsn".to_string()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "An internal error occurred");
        assert!(err.source.is_some());
    }

    #[test]
    fn deadline_maps_to_timeout() {
        let err = AppError::from(CoreError::DeadlineExceeded);
        assert_eq!(err.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(err.code, "TIMEOUT");
    }
}
