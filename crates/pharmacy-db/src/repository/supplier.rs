//! # Supplier Repository
//!
//! Database operations for suppliers. Names are unique (enforced by the
//! schema), everything else is free-form contact data.

use chrono::Utc;
use pharmacy_core::{NewSupplier, Supplier};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};

const SUPPLIER_COLUMNS: &str = "id, name, contact, email, address, created_at, updated_at";

/// Repository for supplier database operations.
#[derive(Debug, Clone)]
pub struct SupplierRepository {
    pool: SqlitePool,
}

impl SupplierRepository {
    /// Creates a new SupplierRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SupplierRepository { pool }
    }

    /// Lists all suppliers ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Supplier>> {
        let sql = format!("SELECT {SUPPLIER_COLUMNS} FROM suppliers ORDER BY name, id");

        let suppliers = sqlx::query_as::<_, Supplier>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = suppliers.len(), "Listed suppliers");
        Ok(suppliers)
    }

    /// Gets a supplier by ID, failing with `NotFound` if it does not exist.
    pub async fn get(&self, id: i64) -> DbResult<Supplier> {
        let sql = format!("SELECT {SUPPLIER_COLUMNS} FROM suppliers WHERE id = ?1");

        sqlx::query_as::<_, Supplier>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Supplier", id))
    }

    /// Inserts a new supplier.
    ///
    /// ## Errors
    /// * `UniqueViolation` on field `name` if a supplier with the same name exists
    pub async fn insert(&self, supplier: &NewSupplier) -> DbResult<Supplier> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO suppliers (name, contact, email, address, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            "#,
        )
        .bind(&supplier.name)
        .bind(&supplier.contact)
        .bind(&supplier.email)
        .bind(&supplier.address)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("name", supplier.name.clone()),
            other => other,
        })?;

        let id = result.last_insert_rowid();
        info!(id, name = %supplier.name, "Supplier added");

        self.get(id).await
    }

    /// Counts total suppliers.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM suppliers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
