//! # Local Mirror
//!
//! Client-side copies of the server collections, kept in step with the
//! server by an explicit invalidation contract.
//!
//! ## Contract
//! ```text
//! ┌───────────────────┬─────────────────┬──────────────────────────────┐
//! │ Mutation          │ Collection      │ Reconcile                    │
//! ├───────────────────┼─────────────────┼──────────────────────────────┤
//! │ CreateProduct     │ products        │ append server body           │
//! │ UpdateProduct     │ products        │ replace by id (server body)  │
//! │ DeleteProduct     │ products        │ remove id                    │
//! │ IntakeBatch       │ stock           │ refetch                      │
//! │ SellUnit          │ stock           │ replace by id (server body)  │
//! │ DeleteUnit        │ stock           │ remove id                    │
//! │ CreateReference k │ reference k     │ append server body           │
//! │ DeleteReference k │ reference k     │ remove id                    │
//! └───────────────────┴─────────────────┴──────────────────────────────┘
//! ```
//!
//! An intake creates many units whose ids only the server knows, so the
//! stock collection is refetched. Every other write is patched in place from
//! the server response. Deleting a product leaves its units in the mirror,
//! matching the server, which does not cascade.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::debug;

use revenda_core::analytics::{self, KpiWindow, Kpis, ProductStock, RecentSale, SaleRecord};
use revenda_core::{IntakeReceipt, Product, ReferenceItem, ReferenceKind, StockUnit};

// =============================================================================
// Contract
// =============================================================================

/// A locally mirrored collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Products,
    Stock,
    Reference(ReferenceKind),
}

impl Collection {
    /// All five collections.
    pub const ALL: [Collection; 5] = [
        Collection::Products,
        Collection::Stock,
        Collection::Reference(ReferenceKind::Category),
        Collection::Reference(ReferenceKind::SaleChannel),
        Collection::Reference(ReferenceKind::PurchaseChannel),
    ];
}

/// How a stale collection is brought back in step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconcile {
    /// Push the server body onto the collection.
    Append,
    /// Swap the entry with the server body's id for the server body.
    ReplaceById,
    /// Drop the entry with the mutated id.
    RemoveById,
    /// Reload the collection from the server.
    Refetch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invalidation {
    pub collection: Collection,
    pub reconcile: Reconcile,
}

/// Every write the client can make.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    CreateProduct,
    UpdateProduct,
    DeleteProduct,
    IntakeBatch,
    SellUnit,
    DeleteUnit,
    CreateReference(ReferenceKind),
    DeleteReference(ReferenceKind),
}

impl Mutation {
    /// The collections this mutation makes stale, and how each is
    /// reconciled.
    pub fn invalidation(&self) -> Vec<Invalidation> {
        let (collection, reconcile) = match *self {
            Mutation::CreateProduct => (Collection::Products, Reconcile::Append),
            Mutation::UpdateProduct => (Collection::Products, Reconcile::ReplaceById),
            Mutation::DeleteProduct => (Collection::Products, Reconcile::RemoveById),
            Mutation::IntakeBatch => (Collection::Stock, Reconcile::Refetch),
            Mutation::SellUnit => (Collection::Stock, Reconcile::ReplaceById),
            Mutation::DeleteUnit => (Collection::Stock, Reconcile::RemoveById),
            Mutation::CreateReference(kind) => (Collection::Reference(kind), Reconcile::Append),
            Mutation::DeleteReference(kind) => {
                (Collection::Reference(kind), Reconcile::RemoveById)
            }
        };

        vec![Invalidation {
            collection,
            reconcile,
        }]
    }
}

/// A completed write together with what the server returned for it.
#[derive(Debug, Clone)]
pub enum Outcome {
    ProductCreated(Product),
    ProductUpdated(Product),
    ProductDeleted(String),
    IntakeRecorded(IntakeReceipt),
    UnitSold(StockUnit),
    UnitDeleted(String),
    ReferenceCreated(ReferenceKind, ReferenceItem),
    ReferenceDeleted(ReferenceKind, String),
}

impl Outcome {
    pub fn mutation(&self) -> Mutation {
        match self {
            Outcome::ProductCreated(_) => Mutation::CreateProduct,
            Outcome::ProductUpdated(_) => Mutation::UpdateProduct,
            Outcome::ProductDeleted(_) => Mutation::DeleteProduct,
            Outcome::IntakeRecorded(_) => Mutation::IntakeBatch,
            Outcome::UnitSold(_) => Mutation::SellUnit,
            Outcome::UnitDeleted(_) => Mutation::DeleteUnit,
            Outcome::ReferenceCreated(kind, _) => Mutation::CreateReference(*kind),
            Outcome::ReferenceDeleted(kind, _) => Mutation::DeleteReference(*kind),
        }
    }
}

// =============================================================================
// Mirror
// =============================================================================

/// Local copies of one user's collections.
#[derive(Debug, Clone, Default)]
pub struct Mirror {
    products: Vec<Product>,
    stock: Vec<StockUnit>,
    categories: Vec<ReferenceItem>,
    sale_channels: Vec<ReferenceItem>,
    purchase_channels: Vec<ReferenceItem>,
    stale: HashSet<Collection>,
}

impl Mirror {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn stock(&self) -> &[StockUnit] {
        &self.stock
    }

    pub fn reference(&self, kind: ReferenceKind) -> &[ReferenceItem] {
        match kind {
            ReferenceKind::Category => &self.categories,
            ReferenceKind::SaleChannel => &self.sale_channels,
            ReferenceKind::PurchaseChannel => &self.purchase_channels,
        }
    }

    fn reference_mut(&mut self, kind: ReferenceKind) -> &mut Vec<ReferenceItem> {
        match kind {
            ReferenceKind::Category => &mut self.categories,
            ReferenceKind::SaleChannel => &mut self.sale_channels,
            ReferenceKind::PurchaseChannel => &mut self.purchase_channels,
        }
    }

    /// Collections waiting for a refetch.
    pub fn stale(&self) -> impl Iterator<Item = Collection> + '_ {
        self.stale.iter().copied()
    }

    pub fn is_stale(&self, collection: Collection) -> bool {
        self.stale.contains(&collection)
    }

    /// Drops everything, e.g. on logout.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    // -------------------------------------------------------------------------
    // Loading
    // -------------------------------------------------------------------------

    pub fn load_products(&mut self, products: Vec<Product>) {
        self.products = products;
        self.stale.remove(&Collection::Products);
    }

    pub fn load_stock(&mut self, stock: Vec<StockUnit>) {
        self.stock = stock;
        self.stale.remove(&Collection::Stock);
    }

    pub fn load_reference(&mut self, kind: ReferenceKind, items: Vec<ReferenceItem>) {
        *self.reference_mut(kind) = items;
        self.stale.remove(&Collection::Reference(kind));
    }

    // -------------------------------------------------------------------------
    // Reconciliation
    // -------------------------------------------------------------------------

    /// Applies a completed write as its contract prescribes.
    ///
    /// ## Returns
    /// Collections that must now be refetched from the server.
    pub fn apply(&mut self, outcome: Outcome) -> Vec<Collection> {
        let mut refetch = Vec::new();

        for invalidation in outcome.mutation().invalidation() {
            debug!(?invalidation, "Reconciling mirror");
            match invalidation.reconcile {
                Reconcile::Refetch => {
                    self.stale.insert(invalidation.collection);
                    refetch.push(invalidation.collection);
                }
                Reconcile::Append | Reconcile::ReplaceById | Reconcile::RemoveById => {
                    self.patch(&outcome, invalidation.reconcile);
                }
            }
        }

        refetch
    }

    fn patch(&mut self, outcome: &Outcome, reconcile: Reconcile) {
        match (outcome, reconcile) {
            (Outcome::ProductCreated(p), Reconcile::Append) => self.products.push(p.clone()),
            (Outcome::ProductUpdated(p), Reconcile::ReplaceById) => {
                replace_by_id(&mut self.products, p.clone(), |x| &x.id)
            }
            (Outcome::ProductDeleted(id), Reconcile::RemoveById) => {
                self.products.retain(|p| &p.id != id)
            }
            (Outcome::UnitSold(u), Reconcile::ReplaceById) => {
                replace_by_id(&mut self.stock, u.clone(), |x| &x.id)
            }
            (Outcome::UnitDeleted(id), Reconcile::RemoveById) => {
                self.stock.retain(|u| &u.id != id)
            }
            (Outcome::ReferenceCreated(kind, item), Reconcile::Append) => {
                self.reference_mut(*kind).push(item.clone())
            }
            (Outcome::ReferenceDeleted(kind, id), Reconcile::RemoveById) => {
                self.reference_mut(*kind).retain(|r| &r.id != id)
            }
            _ => {}
        }
    }

    // -------------------------------------------------------------------------
    // Derived views
    // -------------------------------------------------------------------------

    pub fn sales_history(&self) -> Vec<SaleRecord> {
        analytics::sales_history(&self.stock, &self.products, &self.sale_channels)
    }

    pub fn kpis(&self, window: KpiWindow, now: DateTime<Utc>) -> Kpis {
        analytics::kpis(&self.stock, window, now)
    }

    pub fn recent_sales(
        &self,
        window: KpiWindow,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Vec<RecentSale> {
        analytics::recent_sales(&self.stock, &self.products, window, now, limit)
    }

    pub fn stock_summary(&self) -> Vec<ProductStock> {
        analytics::stock_summary(&self.products, &self.stock)
    }
}

/// Replaces the entry sharing `item`'s id, or appends when none does.
fn replace_by_id<T>(items: &mut Vec<T>, item: T, id: impl Fn(&T) -> &String) {
    match items.iter().position(|x| id(x) == id(&item)) {
        Some(pos) => items[pos] = item,
        None => items.push(item),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use revenda_core::{Money, Origin, StockStatus, DELETED_PRODUCT};

    fn product(id: &str, name: &str) -> Product {
        Product {
            id: id.to_string(),
            user_id: "u1".to_string(),
            name: Some(name.to_string()),
            brand: None,
            category: None,
            product_type: None,
            photo: None,
        }
    }

    fn unit(id: &str, product_id: &str) -> StockUnit {
        StockUnit {
            id: id.to_string(),
            product_id: product_id.to_string(),
            cost_price: Money::from_cents(1_000),
            purchase_channel_id: None,
            origin: Origin::Domestic,
            status: StockStatus::Available,
            intake_date: Utc::now(),
            sale_price: None,
            sale_channel_id: None,
            sale_date: None,
        }
    }

    fn item(id: &str, name: &str) -> ReferenceItem {
        ReferenceItem {
            id: id.to_string(),
            user_id: "u1".to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_contract_table() {
        use Collection::*;
        use Reconcile::*;

        let cases = [
            (Mutation::CreateProduct, Products, Append),
            (Mutation::UpdateProduct, Products, ReplaceById),
            (Mutation::DeleteProduct, Products, RemoveById),
            (Mutation::IntakeBatch, Stock, Refetch),
            (Mutation::SellUnit, Stock, ReplaceById),
            (Mutation::DeleteUnit, Stock, RemoveById),
            (
                Mutation::CreateReference(ReferenceKind::Category),
                Reference(ReferenceKind::Category),
                Append,
            ),
            (
                Mutation::DeleteReference(ReferenceKind::SaleChannel),
                Reference(ReferenceKind::SaleChannel),
                RemoveById,
            ),
        ];

        for (mutation, collection, reconcile) in cases {
            assert_eq!(
                mutation.invalidation(),
                vec![Invalidation {
                    collection,
                    reconcile
                }],
                "{mutation:?}"
            );
        }
    }

    #[test]
    fn test_only_intake_refetches() {
        let refetching: Vec<Mutation> = [
            Mutation::CreateProduct,
            Mutation::UpdateProduct,
            Mutation::DeleteProduct,
            Mutation::IntakeBatch,
            Mutation::SellUnit,
            Mutation::DeleteUnit,
            Mutation::CreateReference(ReferenceKind::PurchaseChannel),
            Mutation::DeleteReference(ReferenceKind::PurchaseChannel),
        ]
        .into_iter()
        .filter(|m| m.invalidation().iter().any(|i| i.reconcile == Reconcile::Refetch))
        .collect();

        assert_eq!(refetching, vec![Mutation::IntakeBatch]);
    }

    #[test]
    fn test_product_patches() {
        let mut mirror = Mirror::new();
        mirror.load_products(vec![product("p1", "Hoodie")]);

        assert!(mirror.apply(Outcome::ProductCreated(product("p2", "Cap"))).is_empty());
        assert_eq!(mirror.products().len(), 2);

        mirror.apply(Outcome::ProductUpdated(product("p1", "Zip Hoodie")));
        assert_eq!(mirror.products()[0].name.as_deref(), Some("Zip Hoodie"));
        assert_eq!(mirror.products().len(), 2);

        mirror.apply(Outcome::ProductDeleted("p2".to_string()));
        assert_eq!(mirror.products().len(), 1);
        assert_eq!(mirror.products()[0].id, "p1");
    }

    #[test]
    fn test_deleting_product_keeps_its_units() {
        let mut mirror = Mirror::new();
        mirror.load_products(vec![product("p1", "Hoodie")]);
        mirror.load_stock(vec![unit("s1", "p1"), unit("s2", "p1")]);

        mirror.apply(Outcome::ProductDeleted("p1".to_string()));

        assert!(mirror.products().is_empty());
        assert_eq!(mirror.stock().len(), 2);
        assert!(!mirror.is_stale(Collection::Stock));
    }

    #[test]
    fn test_intake_marks_stock_stale() {
        let mut mirror = Mirror::new();
        mirror.load_stock(vec![unit("s1", "p1")]);

        let refetch = mirror.apply(Outcome::IntakeRecorded(IntakeReceipt { count: 3 }));
        assert_eq!(refetch, vec![Collection::Stock]);
        assert!(mirror.is_stale(Collection::Stock));
        // Nothing is guessed locally
        assert_eq!(mirror.stock().len(), 1);

        mirror.load_stock(vec![unit("s1", "p1"), unit("s2", "p1")]);
        assert!(!mirror.is_stale(Collection::Stock));
    }

    #[test]
    fn test_sell_replaces_only_that_unit() {
        let mut mirror = Mirror::new();
        mirror.load_stock(vec![unit("s1", "p1"), unit("s2", "p1")]);

        let mut sold = unit("s2", "p1");
        sold.status = StockStatus::Sold;
        sold.sale_price = Some(Money::from_cents(2_500));
        sold.sale_date = Some(Utc::now());
        mirror.apply(Outcome::UnitSold(sold));

        assert!(mirror.stock()[0].is_available());
        assert!(mirror.stock()[1].is_sold());

        mirror.apply(Outcome::UnitDeleted("s1".to_string()));
        assert_eq!(mirror.stock().len(), 1);
    }

    #[test]
    fn test_reference_patches_stay_in_their_kind() {
        let mut mirror = Mirror::new();
        mirror.apply(Outcome::ReferenceCreated(
            ReferenceKind::SaleChannel,
            item("c1", "Instagram"),
        ));

        assert_eq!(mirror.reference(ReferenceKind::SaleChannel).len(), 1);
        assert!(mirror.reference(ReferenceKind::Category).is_empty());

        mirror.apply(Outcome::ReferenceDeleted(
            ReferenceKind::SaleChannel,
            "c1".to_string(),
        ));
        assert!(mirror.reference(ReferenceKind::SaleChannel).is_empty());
    }

    #[test]
    fn test_history_survives_deleted_product() {
        let mut mirror = Mirror::new();
        mirror.load_products(vec![product("p1", "Hoodie")]);
        let mut sold = unit("s1", "p1");
        sold.status = StockStatus::Sold;
        sold.sale_price = Some(Money::from_cents(3_000));
        sold.sale_date = Some(Utc::now());
        mirror.load_stock(vec![sold]);

        mirror.apply(Outcome::ProductDeleted("p1".to_string()));

        let history = mirror.sales_history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].product_name, DELETED_PRODUCT);

        let kpis = mirror.kpis(KpiWindow::AllTime, Utc::now());
        assert_eq!(kpis.revenue, Money::from_cents(3_000));
        assert_eq!(kpis.profit, Money::from_cents(2_000));
    }

    #[test]
    fn test_clear() {
        let mut mirror = Mirror::new();
        mirror.load_products(vec![product("p1", "Hoodie")]);
        mirror.apply(Outcome::IntakeRecorded(IntakeReceipt { count: 1 }));

        mirror.clear();

        assert!(mirror.products().is_empty());
        assert_eq!(mirror.stale().count(), 0);
    }
}
