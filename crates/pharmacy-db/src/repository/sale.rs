//! # Sale Repository
//!
//! Read access to recorded sales. Sales are only ever written by the billing
//! transaction (see [`super::billing`]) and only ever removed by the cascade
//! when their medicine is deleted.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. CREATE                                                             │
//! │     └── BillingRepository::generate_invoice() → one row per cart line  │
//! │                                                                         │
//! │  2. READ                                                               │
//! │     └── list_for_day()   → dashboard "sales today"                     │
//! │     └── list_recent()    → /api/sales (joined with medicine name)      │
//! │     └── list_for_invoice() / list_for_medicine()                       │
//! │                                                                         │
//! │  3. DELETE (indirect)                                                  │
//! │     └── DELETE FROM medicines ... ON DELETE CASCADE                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{Days, NaiveDate};
use pharmacy_core::{Sale, SaleRecord};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Sales whose `sale_date` falls on `day` (UTC).
    pub async fn list_for_day(&self, day: NaiveDate) -> DbResult<Vec<Sale>> {
        let start = day.and_time(chrono::NaiveTime::MIN).and_utc();
        let end = day
            .checked_add_days(Days::new(1))
            .unwrap_or(NaiveDate::MAX)
            .and_time(chrono::NaiveTime::MIN)
            .and_utc();

        debug!(day = %day, "Listing sales for day");

        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, medicine_id, quantity_sold, total_paise, sale_date, invoice_number, created_at
            FROM sales
            WHERE sale_date >= ?1 AND sale_date < ?2
            ORDER BY sale_date, id
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Most recent sales first, each joined with the name of its medicine.
    pub async fn list_recent(&self, limit: i64) -> DbResult<Vec<SaleRecord>> {
        let records = sqlx::query_as::<_, SaleRecord>(
            r#"
            SELECT
                s.id,
                s.medicine_id,
                s.quantity_sold,
                s.total_paise,
                s.sale_date,
                s.invoice_number,
                s.created_at,
                m.name AS medicine_name
            FROM sales s
            INNER JOIN medicines m ON m.id = s.medicine_id
            ORDER BY s.sale_date DESC, s.id DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// All rows written for one invoice, in cart order.
    pub async fn list_for_invoice(&self, invoice_number: &str) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, medicine_id, quantity_sold, total_paise, sale_date, invoice_number, created_at
            FROM sales
            WHERE invoice_number = ?1
            ORDER BY id
            "#,
        )
        .bind(invoice_number)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Sales history of a single medicine.
    pub async fn list_for_medicine(&self, medicine_id: i64) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, medicine_id, quantity_sold, total_paise, sale_date, invoice_number, created_at
            FROM sales
            WHERE medicine_id = ?1
            ORDER BY sale_date, id
            "#,
        )
        .bind(medicine_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Counts total sales rows.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
