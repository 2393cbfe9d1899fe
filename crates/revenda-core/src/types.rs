//! # Domain Types
//!
//! Core domain types used throughout Revenda.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      User       │   │    Product      │   │   StockUnit     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │◄──│  user_id        │◄──│  product_id     │       │
//! │  │  login_handle   │   │  name, brand    │   │  cost_price     │       │
//! │  │  password_hash  │   │  category, type │   │  status, origin │       │
//! │  └─────────────────┘   └─────────────────┘   │  sale_* fields  │       │
//! │          ▲                                    └─────────────────┘       │
//! │          │                                                              │
//! │  ┌───────┴─────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ ReferenceItem   │   │  StockStatus    │   │     Origin      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  user_id, name  │   │  Available      │   │  Domestic       │       │
//! │  │  (3 kinds)      │   │  Sold (final)   │   │  Imported       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership
//! A stock unit has no owner column. It belongs to whoever owns its product,
//! and every stock read or write is scoped through that join.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;
use crate::money::Money;

// =============================================================================
// Users & Sessions
// =============================================================================

/// A registered account, as stored.
///
/// Never serialized: the password hash must not leave the server.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: String,
    pub name: String,
    pub login_handle: String,
    pub password_hash: String,
}

impl User {
    /// Public view of the account (id, name, handle).
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            name: self.name.clone(),
            login_handle: self.login_handle.clone(),
        }
    }
}

/// What callers may see about an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PublicUser {
    pub id: String,
    pub name: String,
    pub login_handle: String,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct RegisterRequest {
    pub name: String,
    pub login_handle: String,
    pub password: String,
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct LoginRequest {
    pub login_handle: String,
    pub password: String,
}

/// Successful login: a signed token plus the public user view.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LoginResponse {
    pub token: String,
    pub user: PublicUser,
}

/// Identity recovered from a verified token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SessionInfo {
    pub user_id: String,
    pub user_name: String,
}

// =============================================================================
// Reference Data
// =============================================================================

/// The three owned lookup sets. They share one contract and differ only in
/// their backing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum ReferenceKind {
    Category,
    SaleChannel,
    PurchaseChannel,
}

impl ReferenceKind {
    /// Every kind, in display order.
    pub const ALL: [ReferenceKind; 3] = [
        ReferenceKind::Category,
        ReferenceKind::SaleChannel,
        ReferenceKind::PurchaseChannel,
    ];

    /// Backing table name.
    pub const fn table(&self) -> &'static str {
        match self {
            ReferenceKind::Category => "categorias",
            ReferenceKind::SaleChannel => "canais_venda",
            ReferenceKind::PurchaseChannel => "canais_compra",
        }
    }

    /// URL path segment under `/reference/`.
    pub const fn path_segment(&self) -> &'static str {
        match self {
            ReferenceKind::Category => "categories",
            ReferenceKind::SaleChannel => "sale-channels",
            ReferenceKind::PurchaseChannel => "purchase-channels",
        }
    }

    /// Singular label for logs and error messages.
    pub const fn label(&self) -> &'static str {
        match self {
            ReferenceKind::Category => "Category",
            ReferenceKind::SaleChannel => "Sale channel",
            ReferenceKind::PurchaseChannel => "Purchase channel",
        }
    }
}

impl FromStr for ReferenceKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReferenceKind::ALL
            .into_iter()
            .find(|kind| kind.path_segment() == s)
            .ok_or_else(|| CoreError::UnknownReferenceKind(s.to_string()))
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

/// A category, sale channel or purchase channel.
///
/// Created and deleted by its owner, never updated. Names are not unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ReferenceItem {
    pub id: String,
    pub user_id: String,
    pub name: String,
}

/// Body of `POST /reference/{kind}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct NewReferenceItem {
    pub name: String,
}

// =============================================================================
// Product
// =============================================================================

/// A catalogued product.
///
/// Every descriptive field is optional: products are stored exactly as
/// submitted. `category` is free text, not a key into the category table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    pub id: String,
    pub user_id: String,
    pub name: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub product_type: Option<String>,
    /// Encoded image (data URL or base64).
    pub photo: Option<String>,
}

impl Product {
    /// Builds a product from submitted fields.
    pub fn from_fields(id: String, user_id: String, fields: ProductFields) -> Self {
        Product {
            id,
            user_id,
            name: fields.name,
            brand: fields.brand,
            category: fields.category,
            product_type: fields.product_type,
            photo: fields.photo,
        }
    }

    /// Display name, empty when none was given.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

/// Body of `POST /products` and `PUT /products/{id}`.
///
/// An update replaces every field; an omitted field becomes empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct ProductFields {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub product_type: Option<String>,
    pub photo: Option<String>,
}

// =============================================================================
// Stock Status
// =============================================================================

/// Lifecycle of a stock unit.
///
/// ```text
/// available ──sell──► sold   (terminal, no undo)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum StockStatus {
    #[cfg_attr(feature = "sqlx", sqlx(rename = "disponivel"))]
    Available,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "vendido"))]
    Sold,
}

impl Default for StockStatus {
    fn default() -> Self {
        StockStatus::Available
    }
}

// =============================================================================
// Origin
// =============================================================================

/// Where a unit was sourced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Origin {
    #[cfg_attr(feature = "sqlx", sqlx(rename = "nacional"))]
    Domestic,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "importado"))]
    Imported,
}

// =============================================================================
// Stock Unit
// =============================================================================

/// One individually tracked inventory item.
///
/// ## Invariant
/// `sale_price`, `sale_channel_id` and `sale_date` are populated exactly when
/// `status` is [`StockStatus::Sold`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StockUnit {
    pub id: String,
    /// May point at a deleted product; the unit outlives it.
    pub product_id: String,
    pub cost_price: Money,
    pub purchase_channel_id: Option<String>,
    pub origin: Origin,
    pub status: StockStatus,
    #[ts(as = "String")]
    pub intake_date: DateTime<Utc>,
    pub sale_price: Option<Money>,
    pub sale_channel_id: Option<String>,
    #[ts(as = "Option<String>")]
    pub sale_date: Option<DateTime<Utc>>,
}

impl StockUnit {
    #[inline]
    pub fn is_sold(&self) -> bool {
        self.status == StockStatus::Sold
    }

    #[inline]
    pub fn is_available(&self) -> bool {
        self.status == StockStatus::Available
    }

    /// Applies a sale to the in-memory copy, mirroring the ledger update.
    pub fn apply_sale(&mut self, sale: &SaleInput, sold_at: DateTime<Utc>) {
        self.status = StockStatus::Sold;
        self.sale_price = Some(sale.sale_price);
        self.sale_channel_id = sale.sale_channel_id.clone();
        self.sale_date = Some(sale.sale_date.unwrap_or(sold_at));
    }
}

/// Body of `POST /stock/intake`: one cost/channel/origin shared by
/// `quantity` new units.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct IntakeBatch {
    pub product_id: String,
    pub quantity: i64,
    pub unit_cost: Money,
    #[serde(default)]
    pub purchase_channel_id: Option<String>,
    pub origin: Origin,
}

/// Response of a successful intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct IntakeReceipt {
    pub count: u64,
}

/// Body of `POST /stock/{id}/sell`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleInput {
    pub sale_price: Money,
    #[serde(default)]
    pub sale_channel_id: Option<String>,
    /// Defaults to the time the sale is recorded.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub sale_date: Option<DateTime<Utc>>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn unit() -> StockUnit {
        StockUnit {
            id: "u1".to_string(),
            product_id: "p1".to_string(),
            cost_price: Money::from_cents(1000),
            purchase_channel_id: None,
            origin: Origin::Domestic,
            status: StockStatus::Available,
            intake_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            sale_price: None,
            sale_channel_id: None,
            sale_date: None,
        }
    }

    #[test]
    fn test_reference_kind_paths() {
        for kind in ReferenceKind::ALL {
            assert_eq!(kind.path_segment().parse::<ReferenceKind>().unwrap(), kind);
        }
        assert!("channels".parse::<ReferenceKind>().is_err());
        assert_eq!(ReferenceKind::SaleChannel.table(), "canais_venda");
    }

    #[test]
    fn test_apply_sale_defaults_date() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let mut u = unit();
        u.apply_sale(
            &SaleInput {
                sale_price: Money::from_cents(3000),
                sale_channel_id: Some("c1".to_string()),
                sale_date: None,
            },
            now,
        );

        assert!(u.is_sold());
        assert_eq!(u.sale_price, Some(Money::from_cents(3000)));
        assert_eq!(u.sale_channel_id.as_deref(), Some("c1"));
        assert_eq!(u.sale_date, Some(now));
    }

    #[test]
    fn test_product_wire_names() {
        let product = Product::from_fields(
            "p1".to_string(),
            "u1".to_string(),
            ProductFields {
                name: Some("Tenis".to_string()),
                product_type: Some("calcado".to_string()),
                ..Default::default()
            },
        );
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["type"], "calcado");
        assert_eq!(json["userId"], "u1");
        assert!(json["brand"].is_null());
    }

    #[test]
    fn test_status_and_origin_wire_names() {
        assert_eq!(
            serde_json::to_value(StockStatus::Available).unwrap(),
            "available"
        );
        assert_eq!(serde_json::to_value(Origin::Imported).unwrap(), "imported");
        assert_eq!(StockStatus::default(), StockStatus::Available);
    }
}
