//! # Analytics Module
//!
//! Derived views over already-fetched collections. Nothing here touches a
//! store: the server folds repository results through these functions and
//! the client folds its local mirror through the same ones.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Derived Analytics                                  │
//! │                                                                         │
//! │  StockUnit[] ──┬──► filter(status = sold) ──┬──► sales_history()       │
//! │  Product[]   ──┤                            │     (join + sentinels)    │
//! │  SaleChannel[]─┘                            │                           │
//! │                                             ├──► kpis(window)           │
//! │                                             │     revenue, cost, profit │
//! │                                             │     margin, markup, count │
//! │                                             │                           │
//! │                                             └──► recent_sales(window)   │
//! │                                                                         │
//! │  StockUnit[] + Product[] ──► filter(status = available)                 │
//! │                          ──► stock_summary() (count + cost per product) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Formulas
//! - profit = revenue − cost
//! - margin = profit ÷ revenue × 100 (0 when revenue is 0)
//! - markup = profit ÷ cost × 100 (0 when cost is 0)

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;
use crate::money::Money;
use crate::types::{Product, ReferenceItem, StockUnit};
use crate::{DELETED_PRODUCT, NOT_INFORMED, NO_CATEGORY, TRAILING_WINDOW_DAYS, UNKNOWN_PRODUCT};

// =============================================================================
// KPI Window
// =============================================================================

/// Time filter applied to sold units before aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum KpiWindow {
    /// Every sale ever recorded.
    #[default]
    #[serde(rename = "all")]
    AllTime,
    /// Sales within the last 30 days of "now".
    #[serde(rename = "30d")]
    Trailing30Days,
}

impl KpiWindow {
    /// Whether a sale made at `sold_at` falls inside this window.
    pub fn includes(&self, sold_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            KpiWindow::AllTime => true,
            KpiWindow::Trailing30Days => sold_at >= now - Duration::days(TRAILING_WINDOW_DAYS),
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            KpiWindow::AllTime => "all",
            KpiWindow::Trailing30Days => "30d",
        }
    }
}

impl FromStr for KpiWindow {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(KpiWindow::AllTime),
            "30d" => Ok(KpiWindow::Trailing30Days),
            other => Err(CoreError::UnknownWindow(other.to_string())),
        }
    }
}

impl fmt::Display for KpiWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Output Types
// =============================================================================

/// One row of the sales history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleRecord {
    /// Stock unit id.
    pub id: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub product_name: String,
    pub category: String,
    pub channel_name: String,
    pub cost: Money,
    pub price: Money,
}

/// Aggregate dashboard figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Kpis {
    pub revenue: Money,
    pub cost: Money,
    pub profit: Money,
    /// Percentage, two decimal places.
    #[ts(type = "number")]
    pub margin: Decimal,
    /// Percentage, two decimal places.
    #[ts(type = "number")]
    pub markup: Decimal,
    pub sale_count: u64,
}

/// A sold unit plus the name of its product, for the dashboard list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RecentSale {
    #[serde(flatten)]
    pub unit: StockUnit,
    pub product_name: String,
}

/// Available stock grouped per product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductStock {
    pub product_id: String,
    pub product_name: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub available_count: u64,
    pub available_cost: Money,
    pub available_unit_ids: Vec<String>,
}

// =============================================================================
// Folds
// =============================================================================

/// Builds the sales history: sold units joined with their product and sale
/// channel, most recent sale first.
///
/// A unit whose product was deleted still appears, under the
/// [`DELETED_PRODUCT`] sentinel, so history never fails on dangling ids.
pub fn sales_history(
    units: &[StockUnit],
    products: &[Product],
    sale_channels: &[ReferenceItem],
) -> Vec<SaleRecord> {
    let products: HashMap<&str, &Product> =
        products.iter().map(|p| (p.id.as_str(), p)).collect();
    let channels: HashMap<&str, &str> = sale_channels
        .iter()
        .map(|c| (c.id.as_str(), c.name.as_str()))
        .collect();

    let mut history: Vec<SaleRecord> = units
        .iter()
        .filter(|unit| unit.is_sold())
        .map(|unit| {
            let product = products.get(unit.product_id.as_str());
            let (product_name, category) = match product {
                Some(p) => (
                    p.display_name().to_string(),
                    p.category
                        .clone()
                        .filter(|c| !c.is_empty())
                        .unwrap_or_else(|| NO_CATEGORY.to_string()),
                ),
                None => (DELETED_PRODUCT.to_string(), NO_CATEGORY.to_string()),
            };
            let channel_name = unit
                .sale_channel_id
                .as_deref()
                .and_then(|id| channels.get(id))
                .map(|name| name.to_string())
                .unwrap_or_else(|| NOT_INFORMED.to_string());

            SaleRecord {
                id: unit.id.clone(),
                date: unit.sale_date.unwrap_or(unit.intake_date),
                product_name,
                category,
                channel_name,
                cost: unit.cost_price,
                price: unit.sale_price.unwrap_or_default(),
            }
        })
        .collect();

    history.sort_by(|a, b| b.date.cmp(&a.date));
    history
}

/// Sold units whose sale date falls inside `window`.
fn sold_in_window<'a>(
    units: &'a [StockUnit],
    window: KpiWindow,
    now: DateTime<Utc>,
) -> impl Iterator<Item = &'a StockUnit> {
    units.iter().filter(move |unit| {
        unit.is_sold()
            && unit
                .sale_date
                .map_or(false, |sold_at| window.includes(sold_at, now))
    })
}

/// `part ÷ whole × 100`, rounded to two places, or 0 when `whole` is 0.
fn percentage(part: Money, whole: Money) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    (part.to_decimal() / whole.to_decimal() * Decimal::ONE_HUNDRED).round_dp(2)
}

/// Computes revenue, cost, profit, margin, markup and sale count over the
/// sold units inside `window`.
///
/// ## Example
/// ```rust
/// use chrono::Utc;
/// use revenda_core::analytics::{kpis, KpiWindow};
///
/// let figures = kpis(&[], KpiWindow::AllTime, Utc::now());
/// assert_eq!(figures.sale_count, 0);
/// assert!(figures.margin.is_zero());
/// ```
pub fn kpis(units: &[StockUnit], window: KpiWindow, now: DateTime<Utc>) -> Kpis {
    let mut revenue = Money::zero();
    let mut cost = Money::zero();
    let mut sale_count = 0u64;

    for unit in sold_in_window(units, window, now) {
        revenue += unit.sale_price.unwrap_or_default();
        cost += unit.cost_price;
        sale_count += 1;
    }

    let profit = revenue - cost;

    Kpis {
        revenue,
        cost,
        profit,
        margin: percentage(profit, revenue),
        markup: percentage(profit, cost),
        sale_count,
    }
}

/// The `limit` most recent sales inside `window`, newest first.
pub fn recent_sales(
    units: &[StockUnit],
    products: &[Product],
    window: KpiWindow,
    now: DateTime<Utc>,
    limit: usize,
) -> Vec<RecentSale> {
    let mut sold: Vec<&StockUnit> = sold_in_window(units, window, now).collect();
    sold.sort_by(|a, b| b.sale_date.cmp(&a.sale_date));

    sold.into_iter()
        .take(limit)
        .map(|unit| RecentSale {
            unit: unit.clone(),
            product_name: products
                .iter()
                .find(|p| p.id == unit.product_id)
                .map(|p| p.display_name().to_string())
                .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string()),
        })
        .collect()
}

/// Groups available units per product, largest stock first.
///
/// Every product appears, including those with nothing available. Ties keep
/// the order of `products`.
pub fn stock_summary(products: &[Product], units: &[StockUnit]) -> Vec<ProductStock> {
    let mut summary: Vec<ProductStock> = products
        .iter()
        .map(|product| {
            let available: Vec<&StockUnit> = units
                .iter()
                .filter(|u| u.product_id == product.id && u.is_available())
                .collect();

            ProductStock {
                product_id: product.id.clone(),
                product_name: product.name.clone(),
                brand: product.brand.clone(),
                category: product.category.clone(),
                available_count: available.len() as u64,
                available_cost: available.iter().map(|u| u.cost_price).sum(),
                available_unit_ids: available.iter().map(|u| u.id.clone()).collect(),
            }
        })
        .collect();

    // sort_by is stable, so equal counts keep catalog order
    summary.sort_by(|a, b| b.available_count.cmp(&a.available_count));
    summary
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Origin, StockStatus};
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
    }

    fn product(id: &str, name: &str, category: Option<&str>) -> Product {
        Product {
            id: id.to_string(),
            user_id: "user-1".to_string(),
            name: Some(name.to_string()),
            brand: None,
            category: category.map(str::to_string),
            product_type: None,
            photo: None,
        }
    }

    fn available(id: &str, product_id: &str, cost: i64) -> StockUnit {
        StockUnit {
            id: id.to_string(),
            product_id: product_id.to_string(),
            cost_price: Money::from_cents(cost),
            purchase_channel_id: None,
            origin: Origin::Domestic,
            status: StockStatus::Available,
            intake_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            sale_price: None,
            sale_channel_id: None,
            sale_date: None,
        }
    }

    fn sold(
        id: &str,
        product_id: &str,
        cost: i64,
        price: i64,
        channel: Option<&str>,
        days_ago: i64,
    ) -> StockUnit {
        StockUnit {
            status: StockStatus::Sold,
            sale_price: Some(Money::from_cents(price)),
            sale_channel_id: channel.map(str::to_string),
            sale_date: Some(now() - Duration::days(days_ago)),
            ..available(id, product_id, cost)
        }
    }

    fn channel(id: &str, name: &str) -> ReferenceItem {
        ReferenceItem {
            id: id.to_string(),
            user_id: "user-1".to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_kpis_reference_figures() {
        let units = vec![
            sold("a", "p1", 1000, 3000, None, 1),
            sold("b", "p1", 2000, 2000, None, 2),
            available("c", "p1", 9999),
        ];

        let k = kpis(&units, KpiWindow::AllTime, now());
        assert_eq!(k.revenue, Money::from_cents(5000));
        assert_eq!(k.cost, Money::from_cents(3000));
        assert_eq!(k.profit, Money::from_cents(2000));
        assert_eq!(k.margin, dec!(40));
        assert_eq!(k.markup, dec!(66.67));
        assert_eq!(k.sale_count, 2);
    }

    #[test]
    fn test_kpis_zero_denominators() {
        let k = kpis(&[], KpiWindow::AllTime, now());
        assert_eq!(k.margin, Decimal::ZERO);
        assert_eq!(k.markup, Decimal::ZERO);

        // Free stock sold at a price: markup has no cost base
        let units = vec![sold("a", "p1", 0, 1500, None, 0)];
        let k = kpis(&units, KpiWindow::AllTime, now());
        assert_eq!(k.margin, dec!(100));
        assert_eq!(k.markup, Decimal::ZERO);
    }

    #[test]
    fn test_kpis_trailing_window() {
        let units = vec![
            sold("recent", "p1", 1000, 2000, None, 10),
            sold("edge", "p1", 1000, 2000, None, 30),
            sold("old", "p1", 1000, 2000, None, 31),
        ];

        let all = kpis(&units, KpiWindow::AllTime, now());
        assert_eq!(all.sale_count, 3);

        let month = kpis(&units, KpiWindow::Trailing30Days, now());
        assert_eq!(month.sale_count, 2);
        assert_eq!(month.revenue, Money::from_cents(4000));
    }

    #[test]
    fn test_sales_history_sentinels_and_order() {
        let products = vec![product("p1", "Tenis", None), product("p2", "Bolsa", Some("Acessorios"))];
        let channels = vec![channel("ml", "Mercado Livre")];
        let units = vec![
            sold("old", "p2", 1000, 2500, Some("ml"), 5),
            sold("new", "gone", 1000, 2000, Some("deleted-channel"), 1),
            sold("mid", "p1", 500, 900, None, 3),
            available("stock", "p1", 500),
        ];

        let history = sales_history(&units, &products, &channels);
        let ids: Vec<&str> = history.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);

        assert_eq!(history[0].product_name, DELETED_PRODUCT);
        assert_eq!(history[0].category, NO_CATEGORY);
        assert_eq!(history[0].channel_name, NOT_INFORMED);

        assert_eq!(history[1].product_name, "Tenis");
        assert_eq!(history[1].category, NO_CATEGORY);
        assert_eq!(history[1].channel_name, NOT_INFORMED);

        assert_eq!(history[2].category, "Acessorios");
        assert_eq!(history[2].channel_name, "Mercado Livre");
        assert_eq!(history[2].price, Money::from_cents(2500));
    }

    #[test]
    fn test_recent_sales_limit_and_unknown_product() {
        let products = vec![product("p1", "Tenis", None)];
        let units: Vec<StockUnit> = (0..8)
            .map(|i| sold(&format!("u{i}"), if i == 0 { "gone" } else { "p1" }, 100, 200, None, i))
            .collect();

        let recent = recent_sales(&units, &products, KpiWindow::AllTime, now(), 5);
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].unit.id, "u0");
        assert_eq!(recent[0].product_name, UNKNOWN_PRODUCT);
        assert_eq!(recent[1].product_name, "Tenis");
    }

    #[test]
    fn test_stock_summary_groups_available_units() {
        let products = vec![
            product("p1", "Bolsa", None),
            product("p2", "Tenis", None),
            product("p3", "Vazio", None),
        ];
        let units = vec![
            available("a", "p2", 1000),
            available("b", "p2", 1500),
            available("c", "p1", 700),
            sold("d", "p1", 700, 1400, None, 1),
        ];

        let summary = stock_summary(&products, &units);
        let order: Vec<&str> = summary.iter().map(|s| s.product_id.as_str()).collect();
        assert_eq!(order, vec!["p2", "p1", "p3"]);

        assert_eq!(summary[0].available_count, 2);
        assert_eq!(summary[0].available_cost, Money::from_cents(2500));
        assert_eq!(summary[1].available_count, 1);
        assert_eq!(summary[1].available_unit_ids, vec!["c".to_string()]);
        assert_eq!(summary[2].available_count, 0);
        assert!(summary[2].available_cost.is_zero());
    }

    #[test]
    fn test_window_parsing() {
        assert_eq!("all".parse::<KpiWindow>().unwrap(), KpiWindow::AllTime);
        assert_eq!("30d".parse::<KpiWindow>().unwrap(), KpiWindow::Trailing30Days);
        assert!("7d".parse::<KpiWindow>().is_err());
        assert_eq!(KpiWindow::default(), KpiWindow::AllTime);
    }
}
