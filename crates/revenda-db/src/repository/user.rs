//! # User Repository
//!
//! The credential store: account rows keyed by a unique login handle.
//! Accounts are inserted once and never updated or deleted.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use revenda_core::User;

const SELECT_USER: &str = r#"
    SELECT id, nome AS name, usuario AS login_handle, senha AS password_hash
    FROM usuarios
"#;

/// Repository for account rows.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Looks up an account by login handle.
    pub async fn find_by_handle(&self, login_handle: &str) -> DbResult<Option<User>> {
        debug!(login_handle = %login_handle, "Looking up user by handle");

        let user = sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE usuario = ?1"))
            .bind(login_handle)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Looks up an account by id.
    pub async fn find_by_id(&self, id: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Inserts a new account. `password_hash` must already be hashed.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - the login handle is taken
    pub async fn insert(&self, user: &User) -> DbResult<()> {
        debug!(login_handle = %user.login_handle, "Inserting user");

        sqlx::query("INSERT INTO usuarios (id, nome, usuario, senha) VALUES (?1, ?2, ?3, ?4)")
            .bind(&user.id)
            .bind(&user.name)
            .bind(&user.login_handle)
            .bind(&user.password_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::UniqueViolation { .. } => {
                    DbError::duplicate("login handle", &user.login_handle)
                }
                other => other,
            })?;

        Ok(())
    }

    /// Counts accounts (diagnostics and tests).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM usuarios")
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
    use crate::repository::generate_id;
    use crate::{Database, DbConfig, DbError};
    use revenda_core::User;

    fn user(handle: &str) -> User {
        User {
            id: generate_id(),
            name: "Ana".to_string(),
            login_handle: handle.to_string(),
            password_hash: "$argon2id$stub".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let ana = user("ana");
        db.users().insert(&ana).await.unwrap();

        let found = db.users().find_by_handle("ana").await.unwrap().unwrap();
        assert_eq!(found.id, ana.id);
        assert_eq!(found.password_hash, ana.password_hash);

        let by_id = db.users().find_by_id(&ana.id).await.unwrap().unwrap();
        assert_eq!(by_id.login_handle, "ana");

        assert!(db.users().find_by_handle("bia").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_handle_leaves_count_unchanged() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.users().insert(&user("ana")).await.unwrap();

        let err = db.users().insert(&user("ana")).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { ref value, .. } if value == "ana"));
        assert_eq!(db.users().count().await.unwrap(), 1);
    }
}
