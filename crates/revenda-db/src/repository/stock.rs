//! # Stock Ledger Repository
//!
//! Individually tracked units, their intake in batches and their sale.
//!
//! ## Unit Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  intake_batch(qty = N)                                                 │
//! │       │   one transaction, multi-row INSERTs of up to 500 rows         │
//! │       ▼                                                                 │
//! │  N × ┌────────────┐   sell(price, channel, date?)   ┌────────────┐     │
//! │      │ disponivel │ ──────────────────────────────► │  vendido   │     │
//! │      └────────────┘                                 └────────────┘     │
//! │            │                                              │            │
//! │            └──────────────── delete ──────────────────────┘            │
//! │                                                                         │
//! │  There is no transition back to disponivel.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every operation opens with [`ensure_owned`] on the same connection that
//! performs the write.

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::generate_id;
use crate::repository::ownership::{ensure_owned, Owned};
use revenda_core::{IntakeBatch, SaleInput, StockStatus, StockUnit};

/// Rows per INSERT statement. 7 binds per row keeps a chunk well under
/// SQLite's bound-parameter limit.
const INTAKE_CHUNK_SIZE: usize = 500;

const SELECT_UNIT: &str = r#"
    SELECT
        e.id,
        e.produto_id AS product_id,
        e.preco_custo AS cost_price,
        e.canal_compra_id AS purchase_channel_id,
        e.origem AS origin,
        e.status,
        e.data_entrada AS intake_date,
        e.preco_venda AS sale_price,
        e.canal_venda_id AS sale_channel_id,
        e.data_venda AS sale_date
    FROM estoque e
    INNER JOIN produtos p ON p.id = e.produto_id
"#;

/// Repository for the stock ledger.
///
/// ## Usage
/// ```rust,ignore
/// let repo = StockRepository::new(pool);
///
/// let created = repo.intake_batch(&user_id, &batch).await?;
/// let sold = repo.sell(&user_id, &unit_id, &sale).await?;
/// ```
#[derive(Debug, Clone)]
pub struct StockRepository {
    pool: SqlitePool,
}

impl StockRepository {
    /// Creates a new StockRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StockRepository { pool }
    }

    /// Lists every unit whose product belongs to `user_id`.
    ///
    /// Units of a deleted product have no owner and are not returned.
    pub async fn list_for_owner(&self, user_id: &str) -> DbResult<Vec<StockUnit>> {
        let units = sqlx::query_as::<_, StockUnit>(&format!(
            "{SELECT_UNIT} WHERE p.usuario_id = ?1 ORDER BY e.data_entrada, e.rowid"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = units.len(), "Listed stock units");
        Ok(units)
    }

    /// Gets one unit under the ownership rule.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - missing, or owned by someone else
    pub async fn get(&self, user_id: &str, unit_id: &str) -> DbResult<StockUnit> {
        let mut conn = self.pool.acquire().await?;
        ensure_owned(&mut *conn, user_id, Owned::Unit(unit_id)).await?;
        fetch_unit(&mut conn, unit_id).await
    }

    /// Inserts `batch.quantity` new available units, all or nothing.
    ///
    /// The batch must already be validated (quantity in range, cost not
    /// negative).
    ///
    /// ## Returns
    /// * `Ok(count)` - number of units created
    /// * `Err(DbError::NotFound)` - the product is missing or not the caller's
    pub async fn intake_batch(&self, user_id: &str, batch: &IntakeBatch) -> DbResult<u64> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        ensure_owned(&mut *tx, user_id, Owned::Product(&batch.product_id)).await?;

        let quantity = usize::try_from(batch.quantity).unwrap_or(0);
        let intake_date = Utc::now();
        let ids: Vec<String> = (0..quantity).map(|_| generate_id()).collect();

        let mut created = 0u64;
        for chunk in ids.chunks(INTAKE_CHUNK_SIZE) {
            let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
                "INSERT INTO estoque (id, produto_id, preco_custo, canal_compra_id, origem, status, data_entrada) ",
            );

            builder.push_values(chunk, |mut row, id| {
                row.push_bind(id.clone())
                    .push_bind(batch.product_id.clone())
                    .push_bind(batch.unit_cost)
                    .push_bind(batch.purchase_channel_id.clone())
                    .push_bind(batch.origin)
                    .push_bind(StockStatus::Available)
                    .push_bind(intake_date);
            });

            let result = builder.build().execute(&mut *tx).await?;
            created += result.rows_affected();
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            product_id = %batch.product_id,
            count = created,
            "Stock intake recorded"
        );
        Ok(created)
    }

    /// Marks a unit sold and stamps its sale fields.
    ///
    /// The sale date defaults to now. A unit that is already sold is sold
    /// again with the new values.
    pub async fn sell(&self, user_id: &str, unit_id: &str, sale: &SaleInput) -> DbResult<StockUnit> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        ensure_owned(&mut *tx, user_id, Owned::Unit(unit_id)).await?;

        let sale_date = sale.sale_date.unwrap_or_else(Utc::now);

        sqlx::query(
            r#"
            UPDATE estoque SET
                status = ?2,
                preco_venda = ?3,
                canal_venda_id = ?4,
                data_venda = ?5
            WHERE id = ?1
            "#,
        )
        .bind(unit_id)
        .bind(StockStatus::Sold)
        .bind(sale.sale_price)
        .bind(&sale.sale_channel_id)
        .bind(sale_date)
        .execute(&mut *tx)
        .await?;

        let unit = fetch_unit(&mut tx, unit_id).await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(unit_id = %unit_id, sale_price = %sale.sale_price, "Stock unit sold");
        Ok(unit)
    }

    /// Deletes one unit, available or sold.
    pub async fn delete(&self, user_id: &str, unit_id: &str) -> DbResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        ensure_owned(&mut *tx, user_id, Owned::Unit(unit_id)).await?;

        sqlx::query("DELETE FROM estoque WHERE id = ?1")
            .bind(unit_id)
            .execute(&mut *tx)
            .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(unit_id = %unit_id, "Stock unit deleted");
        Ok(())
    }

    /// Counts the ledger rows referencing a product, owned or not.
    pub async fn count_for_product(&self, product_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM estoque WHERE produto_id = ?1")
            .bind(product_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Counts every ledger row.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM estoque")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Reads a unit by id on an already checked connection.
async fn fetch_unit(conn: &mut SqliteConnection, unit_id: &str) -> DbResult<StockUnit> {
    sqlx::query_as::<_, StockUnit>(&format!("{SELECT_UNIT} WHERE e.id = ?1"))
        .bind(unit_id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| DbError::not_found("Stock unit", unit_id))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use chrono::TimeZone;
    use revenda_core::{Money, Origin, Product, ProductFields, User};
    use std::collections::HashSet;

    struct Fixture {
        db: Database,
        ana: String,
        bia: String,
        product: String,
    }

    async fn setup() -> Fixture {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut ids = Vec::new();
        for handle in ["ana", "bia"] {
            let user = User {
                id: generate_id(),
                name: handle.to_string(),
                login_handle: handle.to_string(),
                password_hash: "x".to_string(),
            };
            db.users().insert(&user).await.unwrap();
            ids.push(user.id);
        }

        let product = Product::from_fields(
            generate_id(),
            ids[0].clone(),
            ProductFields {
                name: Some("Tenis".to_string()),
                ..Default::default()
            },
        );
        db.products().insert(&product).await.unwrap();

        Fixture {
            db,
            bia: ids.pop().unwrap(),
            ana: ids.pop().unwrap(),
            product: product.id,
        }
    }

    fn batch(product_id: &str, quantity: i64) -> IntakeBatch {
        IntakeBatch {
            product_id: product_id.to_string(),
            quantity,
            unit_cost: Money::from_cents(1000),
            purchase_channel_id: Some("shein".to_string()),
            origin: Origin::Imported,
        }
    }

    fn sale(cents: i64) -> SaleInput {
        SaleInput {
            sale_price: Money::from_cents(cents),
            sale_channel_id: Some("shopee".to_string()),
            sale_date: None,
        }
    }

    #[tokio::test]
    async fn test_intake_creates_distinct_available_units() {
        let f = setup().await;

        let count = f.db.stock().intake_batch(&f.ana, &batch(&f.product, 5)).await.unwrap();
        assert_eq!(count, 5);

        let units = f.db.stock().list_for_owner(&f.ana).await.unwrap();
        assert_eq!(units.len(), 5);

        let ids: HashSet<_> = units.iter().map(|u| u.id.clone()).collect();
        assert_eq!(ids.len(), 5);

        for unit in &units {
            assert!(unit.is_available());
            assert_eq!(unit.cost_price, Money::from_cents(1000));
            assert_eq!(unit.origin, Origin::Imported);
            assert_eq!(unit.purchase_channel_id.as_deref(), Some("shein"));
            assert!(unit.sale_price.is_none());
            assert!(unit.sale_date.is_none());
        }
    }

    #[tokio::test]
    async fn test_intake_into_someone_elses_product_fails() {
        let f = setup().await;

        let err = f
            .db
            .stock()
            .intake_batch(&f.bia, &batch(&f.product, 3))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(f.db.stock().count_for_product(&f.product).await.unwrap(), 0);

        let err = f
            .db
            .stock()
            .intake_batch(&f.ana, &batch("no-such-product", 3))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_large_batch_spans_several_statements() {
        let f = setup().await;

        let count = f
            .db
            .stock()
            .intake_batch(&f.ana, &batch(&f.product, 1200))
            .await
            .unwrap();

        assert_eq!(count, 1200);
        assert_eq!(f.db.stock().count().await.unwrap(), 1200);
    }

    #[tokio::test]
    async fn test_sell_changes_only_that_unit() {
        let f = setup().await;
        f.db.stock().intake_batch(&f.ana, &batch(&f.product, 3)).await.unwrap();
        let units = f.db.stock().list_for_owner(&f.ana).await.unwrap();
        let target = &units[1];

        let sold = f.db.stock().sell(&f.ana, &target.id, &sale(3000)).await.unwrap();
        assert!(sold.is_sold());
        assert_eq!(sold.sale_price, Some(Money::from_cents(3000)));
        assert_eq!(sold.sale_channel_id.as_deref(), Some("shopee"));
        assert!(sold.sale_date.is_some());
        assert_eq!(sold.cost_price, target.cost_price);
        assert_eq!(sold.intake_date, target.intake_date);

        let after = f.db.stock().list_for_owner(&f.ana).await.unwrap();
        assert_eq!(after.iter().filter(|u| u.is_sold()).count(), 1);
        assert_eq!(after.iter().filter(|u| u.is_available()).count(), 2);
    }

    #[tokio::test]
    async fn test_sell_keeps_given_date() {
        let f = setup().await;
        f.db.stock().intake_batch(&f.ana, &batch(&f.product, 1)).await.unwrap();
        let unit = f.db.stock().list_for_owner(&f.ana).await.unwrap().remove(0);

        let when = Utc.with_ymd_and_hms(2024, 5, 10, 15, 30, 0).unwrap();
        let input = SaleInput {
            sale_date: Some(when),
            sale_channel_id: None,
            ..sale(2500)
        };
        let sold = f.db.stock().sell(&f.ana, &unit.id, &input).await.unwrap();

        assert_eq!(sold.sale_date, Some(when));
        assert!(sold.sale_channel_id.is_none());
    }

    #[tokio::test]
    async fn test_cross_tenant_unit_access_is_not_found() {
        let f = setup().await;
        f.db.stock().intake_batch(&f.ana, &batch(&f.product, 1)).await.unwrap();
        let unit = f.db.stock().list_for_owner(&f.ana).await.unwrap().remove(0);

        assert!(f.db.stock().list_for_owner(&f.bia).await.unwrap().is_empty());
        assert!(f.db.stock().get(&f.bia, &unit.id).await.unwrap_err().is_not_found());
        assert!(f
            .db
            .stock()
            .sell(&f.bia, &unit.id, &sale(3000))
            .await
            .unwrap_err()
            .is_not_found());
        assert!(f.db.stock().delete(&f.bia, &unit.id).await.unwrap_err().is_not_found());

        let untouched = f.db.stock().get(&f.ana, &unit.id).await.unwrap();
        assert!(untouched.is_available());
    }

    #[tokio::test]
    async fn test_selling_twice_overwrites_sale_fields() {
        let f = setup().await;
        f.db.stock().intake_batch(&f.ana, &batch(&f.product, 1)).await.unwrap();
        let unit = f.db.stock().list_for_owner(&f.ana).await.unwrap().remove(0);

        f.db.stock().sell(&f.ana, &unit.id, &sale(3000)).await.unwrap();
        let again = f.db.stock().sell(&f.ana, &unit.id, &sale(4500)).await.unwrap();

        assert!(again.is_sold());
        assert_eq!(again.sale_price, Some(Money::from_cents(4500)));
    }

    #[tokio::test]
    async fn test_delete_sold_unit() {
        let f = setup().await;
        f.db.stock().intake_batch(&f.ana, &batch(&f.product, 2)).await.unwrap();
        let unit = f.db.stock().list_for_owner(&f.ana).await.unwrap().remove(0);
        f.db.stock().sell(&f.ana, &unit.id, &sale(3000)).await.unwrap();

        f.db.stock().delete(&f.ana, &unit.id).await.unwrap();

        assert_eq!(f.db.stock().count().await.unwrap(), 1);
        assert!(f.db.stock().get(&f.ana, &unit.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_deleting_product_leaves_units_behind() {
        let f = setup().await;
        f.db.stock().intake_batch(&f.ana, &batch(&f.product, 4)).await.unwrap();

        f.db.products().delete(&f.ana, &f.product).await.unwrap();

        assert_eq!(f.db.stock().count_for_product(&f.product).await.unwrap(), 4);
        // Orphaned units have no owner any more
        assert!(f.db.stock().list_for_owner(&f.ana).await.unwrap().is_empty());
    }
}
