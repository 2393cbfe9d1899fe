//! Service layer.
//!
//! Services own the rules between HTTP and the repositories: validation,
//! error mapping and logging. Handlers stay thin.

pub mod analytics;
pub mod auth;
pub mod product;
pub mod reference;
pub mod stock;

pub use analytics::AnalyticsService;
pub use auth::AuthService;
pub use product::ProductService;
pub use reference::ReferenceService;
pub use stock::StockService;
