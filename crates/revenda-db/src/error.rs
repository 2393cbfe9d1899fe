//! # Store Errors
//!
//! ```text
//!  sqlx::Error ──► DbError ──► ApiError (revenda-api)
//!                    │
//!                    ├── NotFound          missing or someone else's row
//!                    ├── UniqueViolation   login handle taken
//!                    └── everything else   logged, surfaced as 500
//! ```
//!
//! Ownership failures are reported as [`DbError::NotFound`] so a caller
//! cannot probe for ids belonging to other accounts.

use thiserror::Error;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    /// No row with this id visible to the caller.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    #[error("{field} '{value}' is already taken")]
    UniqueViolation { field: String, value: String },

    /// A row referenced a user or product that does not exist.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    #[error("Could not open database: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Begin or commit failed; nothing from the transaction persisted.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Every connection stayed busy past the acquire timeout.
    #[error("No database connection available")]
    PoolExhausted,

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound { .. })
    }

    /// Sorts a SQLite error message into a constraint kind.
    ///
    /// SQLite phrases them as `UNIQUE constraint failed: usuarios.usuario`
    /// and `FOREIGN KEY constraint failed`.
    fn from_sqlite_message(message: &str) -> Self {
        if let Some(column) = message.strip_prefix("UNIQUE constraint failed: ") {
            return DbError::duplicate(column, "?");
        }
        if message.starts_with("FOREIGN KEY constraint failed") {
            return DbError::ForeignKeyViolation {
                message: message.to_string(),
            };
        }
        DbError::QueryFailed(message.to_string())
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Row", "?"),
            sqlx::Error::Database(db_err) => DbError::from_sqlite_message(db_err.message()),
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool closed".to_string()),
            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}
