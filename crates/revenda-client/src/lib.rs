//! # Revenda Client
//!
//! Typed access to the Revenda API plus a local mirror of the logged-in
//! user's data.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                           Store                                 │
//! │                                                                 │
//! │   ┌───────────────────┐            ┌────────────────────────┐  │
//! │   │    ApiClient      │  outcome   │        Mirror          │  │
//! │   │  reqwest + Session│ ─────────► │ products, stock,       │  │
//! │   │                   │            │ 3 reference sets       │  │
//! │   └───────────────────┘ ◄───────── │ derived analytics      │  │
//! │                          refetch   └────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use revenda_client::{ApiClient, Store};
//!
//! # async fn run() -> revenda_client::ClientResult<()> {
//! let store = Store::new(ApiClient::new("http://localhost:3000")?);
//! store.login("ana", "secret1").await?;
//! for row in store.stock_summary().await {
//!     println!("{:?}: {} available", row.product_name, row.available_count);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod error;
pub mod mirror;
pub mod session;
pub mod store;

pub use api::{ApiClient, ServerStatus};
pub use error::{ClientError, ClientResult};
pub use mirror::{Collection, Invalidation, Mirror, Mutation, Outcome, Reconcile};
pub use session::Session;
pub use store::Store;
