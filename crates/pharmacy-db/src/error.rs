//! # Database Errors
//!
//! ```text
//! sqlx::Error ──┐
//!               ├──► DbError ──► ApiError (apps/web) ──► { code, message } + status
//! CoreError ────┘     (billing rules raised inside a transaction)
//! ```
//!
//! Constraint failures are classified by `sqlx::error::ErrorKind` so callers
//! can match on a variant instead of parsing SQLite's message text.

use pharmacy_core::CoreError;
use sqlx::error::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// No row with that id (lookup, update or delete).
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A UNIQUE column already holds `value`. Supplier names, for instance.
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// The database file could not be opened or the pool is closed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Any other statement failure, CHECK constraints included.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// A billing rule rejected the cart. The surrounding transaction was
    /// dropped, so nothing it touched was written.
    #[error(transparent)]
    Domain(#[from] CoreError),

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    /// True when the request, not the database, is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DbError::NotFound { .. } | DbError::UniqueViolation { .. } | DbError::Domain(_)
        )
    }
}

/// `"UNIQUE constraint failed: suppliers.name"` → `"name"`
fn unique_column(message: &str) -> &str {
    message
        .rsplit(": ")
        .next()
        .and_then(|qualified| qualified.rsplit('.').next())
        .unwrap_or("unknown")
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),
            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_string();
                match db_err.kind() {
                    ErrorKind::UniqueViolation => DbError::UniqueViolation {
                        field: unique_column(&message).to_string(),
                        value: String::new(),
                    },
                    ErrorKind::ForeignKeyViolation => DbError::ForeignKeyViolation { message },
                    _ => DbError::QueryFailed(message),
                }
            }
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool is closed".to_string()),
            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;
