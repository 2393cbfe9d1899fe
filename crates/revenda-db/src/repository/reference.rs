//! # Reference Data Repository
//!
//! One repository, three tables. Categories, sale channels and purchase
//! channels share the shape `(id, usuario_id, nome)` and the same contract,
//! so a single implementation is parameterized by [`ReferenceKind`].
//!
//! ```text
//! ReferenceKind::Category        ──► categorias
//! ReferenceKind::SaleChannel     ──► canais_venda
//! ReferenceKind::PurchaseChannel ──► canais_compra
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::generate_id;
use revenda_core::{ReferenceItem, ReferenceKind};

/// Repository for one kind of reference data.
#[derive(Debug, Clone)]
pub struct ReferenceRepository {
    pool: SqlitePool,
    kind: ReferenceKind,
}

impl ReferenceRepository {
    /// Creates a repository bound to `kind`'s table.
    pub fn new(pool: SqlitePool, kind: ReferenceKind) -> Self {
        ReferenceRepository { pool, kind }
    }

    pub fn kind(&self) -> ReferenceKind {
        self.kind
    }

    /// Lists the user's items in insertion order.
    pub async fn list(&self, user_id: &str) -> DbResult<Vec<ReferenceItem>> {
        // Table names come from a closed enum, never from input
        let sql = format!(
            "SELECT id, usuario_id AS user_id, nome AS name FROM {} WHERE usuario_id = ?1 ORDER BY rowid",
            self.kind.table()
        );

        let items = sqlx::query_as::<_, ReferenceItem>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        debug!(kind = %self.kind, count = items.len(), "Listed reference items");
        Ok(items)
    }

    /// Creates an item. The name must already be validated; duplicates are
    /// allowed.
    pub async fn create(&self, user_id: &str, name: &str) -> DbResult<ReferenceItem> {
        let item = ReferenceItem {
            id: generate_id(),
            user_id: user_id.to_string(),
            name: name.trim().to_string(),
        };

        let sql = format!(
            "INSERT INTO {} (id, usuario_id, nome) VALUES (?1, ?2, ?3)",
            self.kind.table()
        );

        sqlx::query(&sql)
            .bind(&item.id)
            .bind(&item.user_id)
            .bind(&item.name)
            .execute(&self.pool)
            .await?;

        debug!(kind = %self.kind, id = %item.id, "Created reference item");
        Ok(item)
    }

    /// Deletes one of the user's items.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - no row matches both id and owner
    pub async fn delete(&self, user_id: &str, id: &str) -> DbResult<()> {
        let sql = format!(
            "DELETE FROM {} WHERE id = ?1 AND usuario_id = ?2",
            self.kind.table()
        );

        let result = sqlx::query(&sql)
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(self.kind.label(), id));
        }

        debug!(kind = %self.kind, id = %id, "Deleted reference item");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use revenda_core::User;

    async fn setup() -> (Database, String, String) {
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
        let bia = ids.pop().unwrap();
        let ana = ids.pop().unwrap();
        (db, ana, bia)
    }

    #[tokio::test]
    async fn test_list_is_scoped_and_in_insertion_order() {
        let (db, ana, bia) = setup().await;
        let repo = db.reference(ReferenceKind::SaleChannel);

        for name in ["Shopee", "Mercado Livre", "Enjoei"] {
            repo.create(&ana, name).await.unwrap();
        }
        repo.create(&bia, "Instagram").await.unwrap();

        let names: Vec<String> = repo.list(&ana).await.unwrap().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["Shopee", "Mercado Livre", "Enjoei"]);
        assert_eq!(repo.list(&bia).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_names_are_allowed() {
        let (db, ana, _) = setup().await;
        let repo = db.reference(ReferenceKind::Category);

        let first = repo.create(&ana, "Tenis").await.unwrap();
        let second = repo.create(&ana, "Tenis").await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(repo.list(&ana).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_requires_owner() {
        let (db, ana, bia) = setup().await;
        let repo = db.reference(ReferenceKind::PurchaseChannel);
        let item = repo.create(&ana, "AliExpress").await.unwrap();

        let err = repo.delete(&bia, &item.id).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(repo.list(&ana).await.unwrap().len(), 1);

        repo.delete(&ana, &item.id).await.unwrap();
        assert!(repo.list(&ana).await.unwrap().is_empty());

        let err = repo.delete(&ana, &item.id).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_kinds_are_separate_tables() {
        let (db, ana, _) = setup().await;
        db.reference(ReferenceKind::Category)
            .create(&ana, "Roupas")
            .await
            .unwrap();

        assert!(db
            .reference(ReferenceKind::SaleChannel)
            .list(&ana)
            .await
            .unwrap()
            .is_empty());
    }
}
