//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! ## Key Operations
//! - Owner-scoped listing, ordered by name
//! - Create / full-replacement update / delete
//!
//! ## Deletion Does Not Cascade
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DELETE FROM produtos WHERE id = 'p1'                                   │
//! │                                                                         │
//! │  estoque rows with produto_id = 'p1' stay exactly where they are.       │
//! │  They now point at nothing; analytics shows them as a deleted product.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use revenda_core::{Product, ProductFields};

const SELECT_PRODUCT: &str = r#"
    SELECT
        id,
        usuario_id AS user_id,
        nome AS name,
        marca AS brand,
        categoria AS category,
        tipo AS product_type,
        foto AS photo
    FROM produtos
"#;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let mine = repo.list(&user_id).await?;
/// let one = repo.get_owned(&user_id, &product_id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists the user's products ordered by name ascending.
    pub async fn list(&self, user_id: &str) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "{SELECT_PRODUCT} WHERE usuario_id = ?1 ORDER BY nome"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Gets one of the user's products.
    ///
    /// ## Returns
    /// * `Ok(None)` - no such product, or it belongs to someone else
    pub async fn get_owned(&self, user_id: &str, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "{SELECT_PRODUCT} WHERE id = ?1 AND usuario_id = ?2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product (id generated beforehand).
    pub async fn insert(&self, product: &Product) -> DbResult<Product> {
        debug!(id = %product.id, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO produtos (id, usuario_id, nome, marca, categoria, tipo, foto)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&product.id)
        .bind(&product.user_id)
        .bind(&product.name)
        .bind(&product.brand)
        .bind(&product.category)
        .bind(&product.product_type)
        .bind(&product.photo)
        .execute(&self.pool)
        .await?;

        Ok(product.clone())
    }

    /// Replaces every descriptive field of one of the user's products.
    ///
    /// Fields omitted from `fields` are cleared, not kept.
    ///
    /// ## Returns
    /// * `Ok(Product)` - the product as now stored
    /// * `Err(DbError::NotFound)` - id and owner don't match a row
    pub async fn update(&self, user_id: &str, id: &str, fields: &ProductFields) -> DbResult<Product> {
        debug!(id = %id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE produtos SET
                nome = ?3,
                marca = ?4,
                categoria = ?5,
                tipo = ?6,
                foto = ?7
            WHERE id = ?1 AND usuario_id = ?2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(&fields.name)
        .bind(&fields.brand)
        .bind(&fields.category)
        .bind(&fields.product_type)
        .bind(&fields.photo)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(Product::from_fields(
            id.to_string(),
            user_id.to_string(),
            fields.clone(),
        ))
    }

    /// Deletes one of the user's products. Its stock units are left alone.
    pub async fn delete(&self, user_id: &str, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM produtos WHERE id = ?1 AND usuario_id = ?2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts a user's products (diagnostics and seeding).
    pub async fn count(&self, user_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM produtos WHERE usuario_id = ?1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::generate_id;
    use crate::{Database, DbConfig};
    use revenda_core::User;

    async fn setup() -> (Database, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let user = User {
            id: generate_id(),
            name: "Ana".to_string(),
            login_handle: "ana".to_string(),
            password_hash: "x".to_string(),
        };
        db.users().insert(&user).await.unwrap();
        (db, user.id)
    }

    fn named(name: &str) -> ProductFields {
        ProductFields {
            name: Some(name.to_string()),
            brand: Some("Nike".to_string()),
            category: Some("Tenis".to_string()),
            product_type: Some("Calcado".to_string()),
            photo: None,
        }
    }

    #[tokio::test]
    async fn test_list_orders_by_name() {
        let (db, user) = setup().await;
        for name in ["Zapato", "Agasalho", "Mochila"] {
            let p = Product::from_fields(generate_id(), user.clone(), named(name));
            db.products().insert(&p).await.unwrap();
        }

        let names: Vec<String> = db
            .products()
            .list(&user)
            .await
            .unwrap()
            .into_iter()
            .filter_map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Agasalho", "Mochila", "Zapato"]);
    }

    #[tokio::test]
    async fn test_missing_fields_are_stored_as_is() {
        let (db, user) = setup().await;
        let p = Product::from_fields(generate_id(), user.clone(), ProductFields::default());
        db.products().insert(&p).await.unwrap();

        let stored = db.products().get_owned(&user, &p.id).await.unwrap().unwrap();
        assert_eq!(stored, p);
        assert!(stored.name.is_none());
    }

    #[tokio::test]
    async fn test_update_replaces_all_fields() {
        let (db, user) = setup().await;
        let p = Product::from_fields(generate_id(), user.clone(), named("Tenis"));
        db.products().insert(&p).await.unwrap();

        let replacement = ProductFields {
            name: Some("Tenis Air".to_string()),
            ..Default::default()
        };
        let updated = db.products().update(&user, &p.id, &replacement).await.unwrap();
        assert_eq!(updated.brand, None);

        let stored = db.products().get_owned(&user, &p.id).await.unwrap().unwrap();
        assert_eq!(stored, updated);
    }

    #[tokio::test]
    async fn test_update_and_delete_are_owner_scoped() {
        let (db, user) = setup().await;
        let p = Product::from_fields(generate_id(), user.clone(), named("Tenis"));
        db.products().insert(&p).await.unwrap();

        let err = db.products().update("someone-else", &p.id, &named("X")).await.unwrap_err();
        assert!(err.is_not_found());

        let err = db.products().delete("someone-else", &p.id).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(db.products().count(&user).await.unwrap(), 1);

        db.products().delete(&user, &p.id).await.unwrap();
        assert_eq!(db.products().count(&user).await.unwrap(), 0);
        assert!(db.products().get_owned(&user, &p.id).await.unwrap().is_none());
    }
}
