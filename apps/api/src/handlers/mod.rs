//! HTTP handlers.
//!
//! Each handler extracts, delegates to a service and wraps the result.
//! Authenticated handlers receive the caller as `Extension<AuthUser>`.

pub mod analytics;
pub mod auth;
pub mod products;
pub mod reference;
pub mod status;
pub mod stock;

use serde::{Deserialize, Serialize};

/// Body of responses that carry no resource, e.g. deletions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            message: message.into(),
        }
    }
}
