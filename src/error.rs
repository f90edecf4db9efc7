//! Application error type and its HTTP rendering.
//!
//! Every failure that reaches the HTTP boundary is an [`AppError`]. The body
//! shape is stable across variants:
//!
//! ```json
//! { "error": { "code": "token_expired", "message": "Token has expired", "details": {} } }
//! ```

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug)]
pub enum AppError {
    Validation { message: String, details: Value },
    MissingCredential { message: String, details: Value },
    MalformedCredential { message: String, details: Value },
    ExpiredToken { message: String, details: Value },
    InvalidToken { message: String, details: Value },
    InvalidCredentials { message: String, details: Value },
    NotFound { message: String, details: Value },
    Conflict { message: String, details: Value },
    RequestTimedOut { message: String, details: Value },
    BodyTooLarge { message: String, details: Value },
    RateLimited { message: String, details: Value },
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn missing_credential(message: impl Into<String>) -> Self {
        Self::MissingCredential {
            message: message.into(),
            details: json!({}),
        }
    }
    pub fn malformed_credential(message: impl Into<String>) -> Self {
        Self::MalformedCredential {
            message: message.into(),
            details: json!({}),
        }
    }
    pub fn expired_token() -> Self {
        Self::ExpiredToken {
            message: "Token has expired".to_string(),
            details: json!({}),
        }
    }
    pub fn invalid_token() -> Self {
        Self::InvalidToken {
            message: "Invalid token".to_string(),
            details: json!({}),
        }
    }
    pub fn invalid_credentials() -> Self {
        Self::InvalidCredentials {
            message: "Invalid credentials".to_string(),
            details: json!({}),
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }
    pub fn timed_out() -> Self {
        Self::RequestTimedOut {
            message: "Request timed out".to_string(),
            details: json!({}),
        }
    }
    pub fn body_too_large(limit: usize) -> Self {
        Self::BodyTooLarge {
            message: "Request body too large".to_string(),
            details: json!({ "limit_bytes": limit }),
        }
    }
    pub fn rate_limited() -> Self {
        Self::RateLimited {
            message: "Rate limit exceeded".to_string(),
            details: json!({}),
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// HTTP status this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::MissingCredential { .. }
            | AppError::MalformedCredential { .. }
            | AppError::ExpiredToken { .. }
            | AppError::InvalidToken { .. }
            | AppError::InvalidCredentials { .. } => StatusCode::UNAUTHORIZED,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::RequestTimedOut { .. } => StatusCode::REQUEST_TIMEOUT,
            AppError::BodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Splits the error into its machine-readable code and payload.
    pub fn to_error_info(self) -> ErrorInfo {
        let (code, message, details) = match self {
            AppError::Validation { message, details } => ("validation_error", message, details),
            AppError::MissingCredential { message, details } => {
                ("missing_credential", message, details)
            }
            AppError::MalformedCredential { message, details } => {
                ("malformed_credential", message, details)
            }
            AppError::ExpiredToken { message, details } => ("token_expired", message, details),
            AppError::InvalidToken { message, details } => ("invalid_token", message, details),
            AppError::InvalidCredentials { message, details } => {
                ("invalid_credentials", message, details)
            }
            AppError::NotFound { message, details } => ("not_found", message, details),
            AppError::Conflict { message, details } => ("conflict", message, details),
            AppError::RequestTimedOut { message, details } => {
                ("request_timeout", message, details)
            }
            AppError::BodyTooLarge { message, details } => {
                ("payload_too_large", message, details)
            }
            AppError::RateLimited { message, details } => ("rate_limited", message, details),
            AppError::Internal { message, details } => ("internal_error", message, details),
        };

        ErrorInfo {
            code,
            message,
            details,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            AppError::Validation { message, .. }
            | AppError::MissingCredential { message, .. }
            | AppError::MalformedCredential { message, .. }
            | AppError::ExpiredToken { message, .. }
            | AppError::InvalidToken { message, .. }
            | AppError::InvalidCredentials { message, .. }
            | AppError::NotFound { message, .. }
            | AppError::Conflict { message, .. }
            | AppError::RequestTimedOut { message, .. }
            | AppError::BodyTooLarge { message, .. }
            | AppError::RateLimited { message, .. }
            | AppError::Internal { message, .. } => message,
        };
        write!(f, "{} ({})", message, self.status())
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        let mut response = (status, Json(body)).into_response();

        // RFC 6750
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Bearer"),
            );
        }

        response
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        map_sqlx_error(e)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).unwrap_or_else(|_| json!({}));
        AppError::bad_request("Validation failed", details)
    }
}

pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    if let Some(db) = e.as_database_error() {
        if db.is_unique_violation() {
            return AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": db.constraint() }),
            );
        }
        if db.is_foreign_key_violation() {
            return AppError::bad_request(
                "Referenced record does not exist",
                json!({ "constraint": db.constraint() }),
            );
        }
    }

    tracing::error!(error = %e, "database error");
    AppError::internal("Database error", json!({}))
}
