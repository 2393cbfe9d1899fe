//! Populates a database with a demo account and a few weeks of activity.
//!
//! ```bash
//! REVENDA_DATABASE_PATH=demo.db cargo run -p revenda-api --bin seed
//! ```
//!
//! Refuses to run when the demo account already exists.

use anyhow::{bail, Context};
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use revenda_api::{ApiConfig, AppState};
use revenda_core::{
    IntakeBatch, Money, Origin, ProductFields, ReferenceKind, RegisterRequest, SaleInput,
};
use revenda_db::{Database, DbConfig};

const DEMO_HANDLE: &str = "demo";
const DEMO_PASSWORD: &str = "demo123";

/// (name, brand, category, type, units, unit cost, origin)
const PRODUCTS: &[(&str, &str, &str, &str, i64, i64, Origin)] = &[
    ("Air Max 90", "Nike", "Sneakers", "Footwear", 6, 32_000, Origin::Imported),
    ("Classic Hoodie", "Adidas", "Apparel", "Clothing", 10, 8_500, Origin::Domestic),
    ("Backpack 20L", "Herschel", "Accessories", "Bags", 4, 15_900, Origin::Imported),
    ("Cap Trucker", "New Era", "Accessories", "Headwear", 12, 4_000, Origin::Domestic),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ApiConfig::load().context("loading configuration")?;
    let db = Database::new(DbConfig::new(&config.database_path))
        .await
        .context("opening database")?;

    if db.users().find_by_handle(DEMO_HANDLE).await?.is_some() {
        bail!("database {} is already seeded", config.database_path);
    }

    let state = AppState::new(db.clone(), config);

    let user = state
        .auth()
        .register(RegisterRequest {
            name: "Demo Reseller".to_string(),
            login_handle: DEMO_HANDLE.to_string(),
            password: DEMO_PASSWORD.to_string(),
        })
        .await?;
    info!(user_id = %user.id, "Demo account created");

    let reference = state.reference();
    for name in ["Sneakers", "Apparel", "Accessories"] {
        reference.create(&user.id, ReferenceKind::Category, name).await?;
    }
    let mut sale_channels = Vec::new();
    for name in ["Instagram", "Marketplace", "In person"] {
        sale_channels.push(reference.create(&user.id, ReferenceKind::SaleChannel, name).await?);
    }
    let supplier = reference
        .create(&user.id, ReferenceKind::PurchaseChannel, "Wholesaler")
        .await?;

    for (name, brand, category, kind, units, cost_cents, origin) in PRODUCTS {
        let product = state
            .products()
            .create(
                &user.id,
                ProductFields {
                    name: Some(name.to_string()),
                    brand: Some(brand.to_string()),
                    category: Some(category.to_string()),
                    product_type: Some(kind.to_string()),
                    photo: None,
                },
            )
            .await?;

        state
            .stock()
            .intake_batch(
                &user.id,
                IntakeBatch {
                    product_id: product.id,
                    quantity: *units,
                    unit_cost: Money::from_cents(*cost_cents),
                    purchase_channel_id: Some(supplier.id.clone()),
                    origin: *origin,
                },
            )
            .await?;
    }

    // Sell every third unit at a 60% markup, spread over the last 45 days
    let units = state.stock().list(&user.id).await?;
    let markup = Decimal::new(16, 1);
    let mut sold = 0usize;
    for (i, unit) in units.iter().enumerate().filter(|(i, _)| i % 3 == 0) {
        let price = Money::from_decimal(unit.cost_price.to_decimal() * markup)?;
        let channel = &sale_channels[i % sale_channels.len()];
        let days_ago = i64::try_from(i).unwrap_or(0) % 45;

        state
            .stock()
            .sell(
                &user.id,
                &unit.id,
                SaleInput {
                    sale_price: price,
                    sale_channel_id: Some(channel.id.clone()),
                    sale_date: Some(Utc::now() - Duration::days(days_ago)),
                },
            )
            .await?;
        sold += 1;
    }

    info!(
        units = units.len(),
        sold,
        login = DEMO_HANDLE,
        password = DEMO_PASSWORD,
        "Seed complete"
    );

    db.close().await;
    Ok(())
}
