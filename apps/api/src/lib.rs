//! # Revenda API
//!
//! HTTP server for the multi-tenant inventory and resale tracker.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         API Services                                    │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  AuthService   │  │ ProductService │  │  StockService              ││
//! │  │                │  │                │  │                            ││
//! │  │ • register     │  │ • list         │  │ • list / get               ││
//! │  │ • login        │  │ • create       │  │ • intake_batch             ││
//! │  │ • session      │  │ • update       │  │ • sell                     ││
//! │  │                │  │ • delete       │  │ • delete                   ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐                                │
//! │  │ReferenceService│  │AnalyticsService│                                │
//! │  │ (3 kinds)      │  │ • sales history│                                │
//! │  │ • list/create  │  │ • kpis         │                                │
//! │  │ • delete       │  │ • recent sales │                                │
//! │  │                │  │ • stock summary│                                │
//! │  └────────────────┘  └────────────────┘                                │
//! │                                                                         │
//! │  Every route except /status and /auth/{register,login} sits behind     │
//! │  the require_auth gate.                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`config::ApiConfig`]. Environment variables:
//! - `REVENDA_HTTP_PORT` - HTTP port (default: 3000)
//! - `REVENDA_DATABASE_PATH` - SQLite file (default: revenda.db)
//! - `REVENDA_JWT_SECRET` - Secret for token signing
//! - `REVENDA_PASSWORD_HASH_COST` - Argon2 iterations (default: 2)
//! - `REVENDA_FRONTEND_URL` - Allowed CORS origin (default: any)

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod password;
pub mod routes;
pub mod services;

use std::sync::Arc;

use revenda_core::TOKEN_LIFETIME_SECS;
use revenda_db::Database;

use crate::auth::JwtManager;
use crate::password::PasswordHasherConfig;
use crate::services::{
    AnalyticsService, AuthService, ProductService, ReferenceService, StockService,
};

// Re-exports
pub use config::ApiConfig;
pub use error::{ApiError, ErrorCode};
pub use routes::build_router;

/// Shared application state.
///
/// Cheap to clone; handed to every handler by axum.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: JwtManager,
    pub passwords: PasswordHasherConfig,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    /// Sessions always last [`TOKEN_LIFETIME_SECS`]; only the signing
    /// secret comes from config.
    pub fn new(db: Database, config: ApiConfig) -> Self {
        AppState {
            jwt: JwtManager::new(&config.jwt_secret, TOKEN_LIFETIME_SECS),
            passwords: PasswordHasherConfig::new(config.password_hash_cost),
            db,
            config: Arc::new(config),
        }
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.db.clone(), self.jwt.clone(), self.passwords.clone())
    }

    pub fn reference(&self) -> ReferenceService {
        ReferenceService::new(self.db.clone())
    }

    pub fn products(&self) -> ProductService {
        ProductService::new(self.db.clone())
    }

    pub fn stock(&self) -> StockService {
        StockService::new(self.db.clone())
    }

    pub fn analytics(&self) -> AnalyticsService {
        AnalyticsService::new(self.db.clone())
    }
}
