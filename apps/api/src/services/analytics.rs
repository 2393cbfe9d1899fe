//! Derived views over the caller's own data.
//!
//! Nothing here is stored: each call loads products, units and sale
//! channels through the owner-scoped repositories and folds them with
//! `revenda_core::analytics`.

use chrono::Utc;

use revenda_core::analytics::{self, KpiWindow, Kpis, ProductStock, RecentSale, SaleRecord};
use revenda_core::{Product, ReferenceKind, StockUnit};
use revenda_db::Database;

use crate::error::ApiResult;

pub struct AnalyticsService {
    db: Database,
}

impl AnalyticsService {
    pub fn new(db: Database) -> Self {
        AnalyticsService { db }
    }

    async fn products_and_units(&self, user_id: &str) -> ApiResult<(Vec<Product>, Vec<StockUnit>)> {
        let products = self.db.products();
        let stock = self.db.stock();
        let (products, units) = tokio::try_join!(products.list(user_id), stock.list_for_owner(user_id))?;
        Ok((products, units))
    }

    pub async fn sales_history(&self, user_id: &str) -> ApiResult<Vec<SaleRecord>> {
        let (products, units) = self.products_and_units(user_id).await?;
        let channels = self
            .db
            .reference(ReferenceKind::SaleChannel)
            .list(user_id)
            .await?;

        Ok(analytics::sales_history(&units, &products, &channels))
    }

    pub async fn kpis(&self, user_id: &str, window: KpiWindow) -> ApiResult<Kpis> {
        let units = self.db.stock().list_for_owner(user_id).await?;
        Ok(analytics::kpis(&units, window, Utc::now()))
    }

    pub async fn recent_sales(
        &self,
        user_id: &str,
        window: KpiWindow,
        limit: usize,
    ) -> ApiResult<Vec<RecentSale>> {
        let (products, units) = self.products_and_units(user_id).await?;
        Ok(analytics::recent_sales(&units, &products, window, Utc::now(), limit))
    }

    pub async fn stock_summary(&self, user_id: &str) -> ApiResult<Vec<ProductStock>> {
        let (products, units) = self.products_and_units(user_id).await?;
        Ok(analytics::stock_summary(&products, &units))
    }
}
