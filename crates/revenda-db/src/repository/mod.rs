//! # Repository Module
//!
//! Database repository implementations for Revenda.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Owner-Scoped Repositories                            │
//! │                                                                         │
//! │  Service call                                                          │
//! │       │                                                                 │
//! │       │  db.products().update(&user_id, &id, fields)                   │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  └── UPDATE produtos ... WHERE id = ? AND usuario_id = ?               │
//! │       │                                                                 │
//! │       ├── 1 row  → Ok(product)                                         │
//! │       └── 0 rows → Err(NotFound)  (missing OR someone else's)          │
//! │                                                                         │
//! │  StockRepository                                                       │
//! │  └── ownership::ensure_owned(...) first, then the statement            │
//! │       (units are owned through produtos.usuario_id)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`user::UserRepository`] - Credential store
//! - [`reference::ReferenceRepository`] - Categories / sale channels / purchase channels
//! - [`product::ProductRepository`] - Product catalog
//! - [`stock::StockRepository`] - Stock ledger

pub mod ownership;
pub mod product;
pub mod reference;
pub mod stock;
pub mod user;

use uuid::Uuid;

/// Generates a new primary key (UUID v4).
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}
