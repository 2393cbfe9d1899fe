//! Product catalog.
//!
//! Fields are stored exactly as submitted; none is required.

use tracing::info;

use revenda_core::{Product, ProductFields};
use revenda_db::repository::generate_id;
use revenda_db::Database;

use crate::error::ApiResult;

pub struct ProductService {
    db: Database,
}

impl ProductService {
    pub fn new(db: Database) -> Self {
        ProductService { db }
    }

    pub async fn list(&self, user_id: &str) -> ApiResult<Vec<Product>> {
        Ok(self.db.products().list(user_id).await?)
    }

    pub async fn create(&self, user_id: &str, fields: ProductFields) -> ApiResult<Product> {
        let product = Product::from_fields(generate_id(), user_id.to_string(), fields);
        let product = self.db.products().insert(&product).await?;

        info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    /// Full replacement of the product's fields.
    pub async fn update(&self, user_id: &str, id: &str, fields: ProductFields) -> ApiResult<Product> {
        let product = self.db.products().update(user_id, id, &fields).await?;

        info!(product_id = %id, "Product updated");
        Ok(product)
    }

    /// Deletes the product. Its stock units stay in the ledger.
    pub async fn delete(&self, user_id: &str, id: &str) -> ApiResult<()> {
        self.db.products().delete(user_id, id).await?;

        info!(product_id = %id, "Product deleted");
        Ok(())
    }
}
