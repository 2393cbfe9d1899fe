//! # Store
//!
//! Couples [`ApiClient`] and [`Mirror`]. Every write goes to the server
//! first; only a successful response touches the mirror, and then exactly as
//! the write's [`Mutation::invalidation`](crate::Mutation::invalidation)
//! prescribes.
//!
//! ```text
//!  write ──► ApiClient ──► server
//!                │ Ok(body)
//!                ▼
//!          Mirror::apply(Outcome) ──► [collections to refetch] ──► refetch
//! ```

use chrono::Utc;
use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::{debug, info};

use revenda_core::{
    IntakeBatch, IntakeReceipt, KpiWindow, Kpis, Product, ProductFields, ProductStock,
    PublicUser, ReferenceItem, ReferenceKind, SaleInput, SaleRecord, StockUnit,
};

use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::mirror::{Collection, Mirror, Outcome};

pub struct Store {
    api: ApiClient,
    mirror: RwLock<Mirror>,
}

impl Store {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            mirror: RwLock::new(Mirror::new()),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Read access to the mirror.
    pub async fn mirror(&self) -> RwLockReadGuard<'_, Mirror> {
        self.mirror.read().await
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Logs in and loads every collection.
    pub async fn login(&self, login_handle: &str, password: &str) -> ClientResult<PublicUser> {
        let user = self.api.login(login_handle, password).await?;
        self.refresh_all().await?;
        Ok(user)
    }

    /// Clears the session and the mirror.
    pub async fn logout(&self) {
        self.api.logout().await;
        self.mirror.write().await.clear();
    }

    /// Reloads all five collections concurrently.
    pub async fn refresh_all(&self) -> ClientResult<()> {
        let (products, stock, categories, sale_channels, purchase_channels) = tokio::try_join!(
            self.api.list_products(),
            self.api.list_stock(),
            self.api.list_reference(ReferenceKind::Category),
            self.api.list_reference(ReferenceKind::SaleChannel),
            self.api.list_reference(ReferenceKind::PurchaseChannel),
        )?;

        let mut mirror = self.mirror.write().await;
        mirror.load_products(products);
        mirror.load_stock(stock);
        mirror.load_reference(ReferenceKind::Category, categories);
        mirror.load_reference(ReferenceKind::SaleChannel, sale_channels);
        mirror.load_reference(ReferenceKind::PurchaseChannel, purchase_channels);

        info!(
            products = mirror.products().len(),
            units = mirror.stock().len(),
            "Mirror refreshed"
        );
        Ok(())
    }

    /// Reloads one collection from the server.
    pub async fn refetch(&self, collection: Collection) -> ClientResult<()> {
        debug!(?collection, "Refetching");
        match collection {
            Collection::Products => {
                let products = self.api.list_products().await?;
                self.mirror.write().await.load_products(products);
            }
            Collection::Stock => {
                let stock = self.api.list_stock().await?;
                self.mirror.write().await.load_stock(stock);
            }
            Collection::Reference(kind) => {
                let items = self.api.list_reference(kind).await?;
                self.mirror.write().await.load_reference(kind, items);
            }
        }
        Ok(())
    }

    /// Applies a server-confirmed outcome, then refetches whatever it left
    /// stale.
    async fn reconcile(&self, outcome: Outcome) -> ClientResult<()> {
        let refetch = self.mirror.write().await.apply(outcome);
        for collection in refetch {
            self.refetch(collection).await?;
        }
        Ok(())
    }

    // =========================================================================
    // Writes
    // =========================================================================

    pub async fn create_product(&self, fields: &ProductFields) -> ClientResult<Product> {
        let product = self.api.create_product(fields).await?;
        self.reconcile(Outcome::ProductCreated(product.clone())).await?;
        Ok(product)
    }

    pub async fn update_product(&self, id: &str, fields: &ProductFields) -> ClientResult<Product> {
        let product = self.api.update_product(id, fields).await?;
        self.reconcile(Outcome::ProductUpdated(product.clone())).await?;
        Ok(product)
    }

    pub async fn delete_product(&self, id: &str) -> ClientResult<()> {
        self.api.delete_product(id).await?;
        self.reconcile(Outcome::ProductDeleted(id.to_string())).await
    }

    pub async fn intake_batch(&self, batch: &IntakeBatch) -> ClientResult<IntakeReceipt> {
        let receipt = self.api.intake_batch(batch).await?;
        self.reconcile(Outcome::IntakeRecorded(receipt)).await?;
        Ok(receipt)
    }

    pub async fn sell_unit(&self, id: &str, sale: &SaleInput) -> ClientResult<StockUnit> {
        let unit = self.api.sell_unit(id, sale).await?;
        self.reconcile(Outcome::UnitSold(unit.clone())).await?;
        Ok(unit)
    }

    pub async fn delete_unit(&self, id: &str) -> ClientResult<()> {
        self.api.delete_unit(id).await?;
        self.reconcile(Outcome::UnitDeleted(id.to_string())).await
    }

    pub async fn create_reference(
        &self,
        kind: ReferenceKind,
        name: &str,
    ) -> ClientResult<ReferenceItem> {
        let item = self.api.create_reference(kind, name).await?;
        self.reconcile(Outcome::ReferenceCreated(kind, item.clone()))
            .await?;
        Ok(item)
    }

    pub async fn delete_reference(&self, kind: ReferenceKind, id: &str) -> ClientResult<()> {
        self.api.delete_reference(kind, id).await?;
        self.reconcile(Outcome::ReferenceDeleted(kind, id.to_string()))
            .await
    }

    // =========================================================================
    // Derived views
    // =========================================================================

    pub async fn sales_history(&self) -> Vec<SaleRecord> {
        self.mirror.read().await.sales_history()
    }

    pub async fn kpis(&self, window: KpiWindow) -> Kpis {
        self.mirror.read().await.kpis(window, Utc::now())
    }

    pub async fn stock_summary(&self) -> Vec<ProductStock> {
        self.mirror.read().await.stock_summary()
    }
}
