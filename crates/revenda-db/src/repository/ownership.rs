//! # Ownership Checks
//!
//! The one place that decides whether a user may touch a product or a stock
//! unit. Every stock ledger operation calls [`ensure_owned`] before it reads
//! or writes anything else.
//!
//! ## Transitive Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  estoque (no owner column)                                             │
//! │    id ─── produto_id ──► produtos                                      │
//! │                            id ─── usuario_id ──► usuarios              │
//! │                                                                         │
//! │  unit U is owned by user X  ⇔  ∃ produtos P: P.id = U.produto_id       │
//! │                                          AND P.usuario_id = X          │
//! │                                                                         │
//! │  A unit whose product was deleted is owned by nobody.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! "Missing" and "someone else's" produce the same `NotFound`, so callers
//! cannot probe for other tenants' ids.

use sqlx::{Executor, Sqlite};
use tracing::debug;

use crate::error::{DbError, DbResult};

/// What is being checked.
#[derive(Debug, Clone, Copy)]
pub enum Owned<'a> {
    /// A product id, owned directly.
    Product(&'a str),
    /// A stock unit id, owned through its product.
    Unit(&'a str),
}

impl Owned<'_> {
    fn entity(&self) -> &'static str {
        match self {
            Owned::Product(_) => "Product",
            Owned::Unit(_) => "Stock unit",
        }
    }

    fn id(&self) -> &str {
        match self {
            Owned::Product(id) | Owned::Unit(id) => id,
        }
    }

    fn sql(&self) -> &'static str {
        match self {
            Owned::Product(_) => "SELECT 1 FROM produtos WHERE id = ?1 AND usuario_id = ?2",
            Owned::Unit(_) => {
                r#"
                SELECT 1
                FROM estoque e
                INNER JOIN produtos p ON p.id = e.produto_id
                WHERE e.id = ?1 AND p.usuario_id = ?2
                "#
            }
        }
    }
}

/// Fails with `NotFound` unless `user_id` owns `target`.
///
/// Accepts any executor so it can run inside the caller's transaction,
/// keeping the check and the write atomic.
pub async fn ensure_owned<'c, E>(executor: E, user_id: &str, target: Owned<'_>) -> DbResult<()>
where
    E: Executor<'c, Database = Sqlite>,
{
    let found: Option<i64> = sqlx::query_scalar(target.sql())
        .bind(target.id())
        .bind(user_id)
        .fetch_optional(executor)
        .await?;

    if found.is_none() {
        debug!(
            entity = target.entity(),
            id = %target.id(),
            user_id = %user_id,
            "Ownership check failed"
        );
        return Err(DbError::not_found(target.entity(), target.id()));
    }

    Ok(())
}
