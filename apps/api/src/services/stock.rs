//! Stock ledger.
//!
//! ```text
//! intake into a product that is missing or not yours  ─► 403 FORBIDDEN
//! sell / delete / get a unit that is missing or not yours ─► 404 NOT_FOUND
//! ```

use revenda_core::validation::{validate_intake, validate_sale};
use revenda_core::{IntakeBatch, IntakeReceipt, SaleInput, StockUnit};
use revenda_db::{Database, DbError};

use crate::error::{ApiError, ApiResult};

pub struct StockService {
    db: Database,
}

impl StockService {
    pub fn new(db: Database) -> Self {
        StockService { db }
    }

    pub async fn list(&self, user_id: &str) -> ApiResult<Vec<StockUnit>> {
        Ok(self.db.stock().list_for_owner(user_id).await?)
    }

    pub async fn get(&self, user_id: &str, unit_id: &str) -> ApiResult<StockUnit> {
        Ok(self.db.stock().get(user_id, unit_id).await?)
    }

    /// Creates `batch.quantity` units of one product.
    pub async fn intake_batch(&self, user_id: &str, batch: IntakeBatch) -> ApiResult<IntakeReceipt> {
        validate_intake(&batch)?;

        let count = self
            .db
            .stock()
            .intake_batch(user_id, &batch)
            .await
            .map_err(|e| match e {
                DbError::NotFound { .. } => ApiError::forbidden("Invalid product"),
                other => other.into(),
            })?;

        Ok(IntakeReceipt { count })
    }

    /// Records a sale and returns the unit as now stored.
    pub async fn sell(&self, user_id: &str, unit_id: &str, sale: SaleInput) -> ApiResult<StockUnit> {
        validate_sale(&sale)?;
        Ok(self.db.stock().sell(user_id, unit_id, &sale).await?)
    }

    pub async fn delete(&self, user_id: &str, unit_id: &str) -> ApiResult<()> {
        Ok(self.db.stock().delete(user_id, unit_id).await?)
    }
}
