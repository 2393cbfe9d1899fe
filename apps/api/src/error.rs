//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Revenda                                │
//! │                                                                         │
//! │  Handler ─► Service ─► Repository                                      │
//! │                             │                                           │
//! │                             ▼                                           │
//! │  DbError::NotFound ─────────────────────────► 404 NOT_FOUND            │
//! │  DbError::UniqueViolation (login handle) ───► 409 DUPLICATE_HANDLE     │
//! │  ValidationError / bad JSON ────────────────► 400 VALIDATION_ERROR     │
//! │  DbError::QueryFailed / Internal ... ───────► 500 INTERNAL (logged)    │
//! │                                                                         │
//! │  Auth gate                                                             │
//! │  no Authorization header ───────────────────► 403 MISSING_TOKEN        │
//! │  bad signature / expired ───────────────────► 401 INVALID_TOKEN        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Response Body
//! ```json
//! { "code": "NOT_FOUND", "message": "Stock unit not found: 5f0c..." }
//! ```

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use revenda_core::{CoreError, ValidationError};
use revenda_db::DbError;

/// Error returned by every handler.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Missing or malformed input (400)
    ValidationError,

    /// Login handle already registered (409)
    DuplicateHandle,

    /// Unknown handle or wrong password, indistinguishable (401)
    InvalidCredentials,

    /// No Authorization header (403)
    MissingToken,

    /// Bad signature or expired token (401)
    InvalidToken,

    /// Acting on something the caller does not own (403)
    Forbidden,

    /// Resource not found, or not the caller's (404)
    NotFound,

    /// Anything else (500)
    Internal,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::DuplicateHandle => StatusCode::CONFLICT,
            ErrorCode::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ErrorCode::MissingToken => StatusCode::FORBIDDEN,
            ErrorCode::InvalidToken => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Login failure. The message is the same whatever went wrong.
    pub fn invalid_credentials() -> Self {
        ApiError::new(ErrorCode::InvalidCredentials, "Invalid login handle or password")
    }

    pub fn missing_token() -> Self {
        ApiError::new(ErrorCode::MissingToken, "Authentication token not provided")
    }

    pub fn invalid_token() -> Self {
        ApiError::new(ErrorCode::InvalidToken, "Invalid or expired token")
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Forbidden, message)
    }

    /// Creates an internal error. Callers log the cause first.
    pub fn internal() -> Self {
        ApiError::new(ErrorCode::Internal, "Internal server error")
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::DuplicateHandle,
                format!("{} '{}' is already registered", field, value),
            ),
            DbError::ForeignKeyViolation { message } => {
                error!("Foreign key violation: {}", message);
                ApiError::internal()
            }
            DbError::ConnectionFailed(e) => {
                error!("Database connection failed: {}", e);
                ApiError::internal()
            }
            DbError::MigrationFailed(e) => {
                error!("Database migration failed: {}", e);
                ApiError::internal()
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                error!("Database query failed: {}", e);
                ApiError::internal()
            }
            DbError::TransactionFailed(e) => {
                error!("Transaction failed: {}", e);
                ApiError::internal()
            }
            DbError::PoolExhausted => {
                error!("Database pool exhausted");
                ApiError::internal()
            }
            DbError::Internal(e) => {
                error!("Internal database error: {}", e);
                ApiError::internal()
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnknownReferenceKind(kind) => ApiError::not_found("Reference kind", &kind),
            CoreError::UnknownWindow(_) | CoreError::AmountOutOfRange(_) => {
                ApiError::validation(err.to_string())
            }
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

/// `Json` extractor whose rejections come back as `VALIDATION_ERROR` bodies
/// instead of axum's plain-text responses.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

/// Query-string counterpart of [`AppJson`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct AppQuery<T>(pub T);

/// Result type for handlers and services.
pub type ApiResult<T> = Result<T, ApiError>;
