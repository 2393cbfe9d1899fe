//! # Client Error Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Session        │  │   Transport     │  │     Server              │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  NotAuthenticated│ │  Http           │  │  Api { status, code,    │ │
//! │  │  SessionExpired │  │  InvalidUrl     │  │        message }        │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// No session; log in first.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// The local session passed its expiry and was dropped.
    #[error("Session expired, log in again")]
    SessionExpired,

    /// The server answered with an error body.
    #[error("{code} ({status}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// Network or decoding failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Base URL or path could not be joined.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ClientError {
    /// Server error code, when the server sent one.
    pub fn code(&self) -> Option<&str> {
        match self {
            ClientError::Api { code, .. } => Some(code),
            _ => None,
        }
    }

    /// True when the server rejected the token.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ClientError::Api { status: 401, .. } | ClientError::Api { status: 403, .. })
            || matches!(self, ClientError::NotAuthenticated | ClientError::SessionExpired)
    }
}
