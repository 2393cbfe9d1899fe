//! # revenda-core: Pure Business Logic for Revenda
//!
//! This crate is the **heart** of Revenda, a small multi-tenant inventory and
//! resale tracker. It contains the domain types and every derived view as
//! pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Revenda Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              revenda-client (session + local mirror)            │   │
//! │  │    login ──► refresh_all ──► mutate ──► patch / refetch         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP + bearer token                    │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    revenda-api (axum)                           │   │
//! │  │    auth gate ──► services ──► owner-scoped repositories        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ revenda-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ analytics │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │  history  │  │   rules   │  │   │
//! │  │   │ StockUnit │  │  cents    │  │   KPIs    │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  revenda-db (Database Layer)                    │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (User, Product, StockUnit, ReferenceItem, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`analytics`] - Sales history, KPIs, recent sales and stock summary
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use revenda_core::money::Money;
//!
//! let cost = Money::from_cents(1000); // 10.00
//! let price = Money::from_cents(3000); // 30.00
//!
//! assert_eq!((price - cost).cents(), 2000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod analytics;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use revenda_core::Money` instead of
// `use revenda_core::money::Money`

pub use analytics::{KpiWindow, Kpis, ProductStock, RecentSale, SaleRecord};
pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Lifetime of an issued session token, in seconds (one day).
pub const TOKEN_LIFETIME_SECS: i64 = 86_400;

/// Maximum number of units a single intake batch may create.
///
/// ## Business Reason
/// A batch expands into one row per unit. Typing 100000 instead of 10 would
/// flood the ledger, so the bound sits well above any real shipment.
pub const MAX_INTAKE_QUANTITY: i64 = 10_000;

/// Largest price or cost a request may carry, in cents (one billion in
/// major units). Sums over any realistic ledger stay inside i64.
pub const MAX_AMOUNT_CENTS: i64 = 100_000_000_000;

/// Length of the trailing KPI window, in days.
pub const TRAILING_WINDOW_DAYS: i64 = 30;

/// Number of sales shown in the dashboard's "recent sales" list.
pub const RECENT_SALES_LIMIT: usize = 5;

/// Shown in the sales history when a sold unit's product has been deleted.
pub const DELETED_PRODUCT: &str = "Deleted product";

/// Shown in the recent-sales list when a sold unit's product is gone.
pub const UNKNOWN_PRODUCT: &str = "Unknown product";

/// Shown in the sales history when the product has no category.
pub const NO_CATEGORY: &str = "No category";

/// Shown in the sales history when the sale channel cannot be resolved.
pub const NOT_INFORMED: &str = "Not informed";
