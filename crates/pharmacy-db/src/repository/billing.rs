//! # Billing Repository
//!
//! Turns a cart into an invoice in a single database transaction.
//!
//! ## Billing Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    generate_invoice(cart)                               │
//! │                                                                         │
//! │  cart.validate()            empty / too large / bad quantity → reject  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN IMMEDIATE            waits (busy_timeout) for the write lock    │
//! │       │                                                                 │
//! │       ├── for each line, in cart order:                                │
//! │       │     load medicine (once per id)  → MedicineNotFound            │
//! │       │     ledger.reserve(id, qty)      → InsufficientStock           │
//! │       │     UPDATE stock (guarded)                                     │
//! │       │     INSERT sale                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  COMMIT → Invoice                                                      │
//! │                                                                         │
//! │  Any error drops the transaction: no stock moves, no sale is written.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A deferred `BEGIN` would only ask for the write lock at the first
//! `UPDATE`, after its read snapshot is taken. SQLite cannot wait out that
//! upgrade and answers `database is locked` at once. Taking the lock up
//! front makes concurrent invoices queue instead.

use chrono::Utc;
use pharmacy_core::billing::{generate_invoice_number, Cart, Invoice, InvoiceLine, StockLedger};
use pharmacy_core::CoreError;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::medicine::fetch_medicine;

/// Repository for the billing transaction.
#[derive(Debug, Clone)]
pub struct BillingRepository {
    pool: SqlitePool,
}

impl BillingRepository {
    /// Creates a new BillingRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BillingRepository { pool }
    }

    /// Bills a cart atomically.
    ///
    /// Lines are processed in cart order. A medicine that appears on several
    /// lines is checked against its cumulative quantity, so `[A×5, A×6]` on a
    /// stock of 10 fails on the second line.
    ///
    /// ## Errors
    /// * `Domain(EmptyCart | CartTooLarge | Validation)` before touching the database
    /// * `Domain(MedicineNotFound)` if a line names an unknown medicine
    /// * `Domain(InsufficientStock)` if a line asks for more than is left
    /// * `TransactionFailed` if the transaction cannot begin or commit
    ///
    /// On any error nothing is written.
    pub async fn generate_invoice(&self, cart: &Cart) -> DbResult<Invoice> {
        cart.validate()?;

        let now = Utc::now();
        let invoice_number = generate_invoice_number(now);

        debug!(
            invoice = %invoice_number,
            lines = cart.len(),
            "Starting billing transaction"
        );

        let mut tx = self
            .pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let mut ledger = StockLedger::new();
        let mut lines = Vec::with_capacity(cart.len());

        for line in &cart.lines {
            if ledger.get(line.medicine_id).is_none() {
                let medicine = fetch_medicine(&mut *tx, line.medicine_id)
                    .await?
                    .ok_or(CoreError::MedicineNotFound(line.medicine_id))?;
                ledger.track(medicine);
            }

            let invoice_line = InvoiceLine::new(
                ledger.reserve(line.medicine_id, line.quantity)?,
                line.quantity,
            )?;

            let updated = sqlx::query(
                r#"
                UPDATE medicines
                SET stock_quantity = stock_quantity - ?1, updated_at = ?2
                WHERE id = ?3 AND stock_quantity >= ?1
                "#,
            )
            .bind(line.quantity)
            .bind(now)
            .bind(line.medicine_id)
            .execute(&mut *tx)
            .await?;

            if updated.rows_affected() == 0 {
                // Stock moved underneath the ledger; report what is really there.
                let available: i64 =
                    sqlx::query_scalar("SELECT stock_quantity FROM medicines WHERE id = ?1")
                        .bind(line.medicine_id)
                        .fetch_optional(&mut *tx)
                        .await?
                        .unwrap_or(0);

                warn!(
                    medicine_id = line.medicine_id,
                    available,
                    requested = line.quantity,
                    "Guarded stock update touched no rows"
                );

                return Err(CoreError::InsufficientStock {
                    name: invoice_line.name,
                    available,
                    requested: line.quantity,
                }
                .into());
            }

            sqlx::query(
                r#"
                INSERT INTO sales (
                    medicine_id, quantity_sold, total_paise,
                    sale_date, invoice_number, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?4)
                "#,
            )
            .bind(line.medicine_id)
            .bind(line.quantity)
            .bind(invoice_line.line_total.minor())
            .bind(now)
            .bind(&invoice_number)
            .execute(&mut *tx)
            .await?;

            lines.push(invoice_line);
        }

        let invoice = Invoice::new(invoice_number, now, lines)?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            invoice = %invoice.invoice_number,
            total = %invoice.total,
            items = invoice.item_count,
            "Invoice generated"
        );

        Ok(invoice)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use chrono::NaiveDate;
    use pharmacy_core::billing::CartLine;
    use pharmacy_core::{Money, NewMedicine, ValidationError};

    async fn add_medicine(db: &Database, name: &str, price_paise: i64, stock: i64) -> i64 {
        db.medicines()
            .insert(&NewMedicine {
                name: name.to_string(),
                manufacturer: "Sun Pharma".to_string(),
                category: "Pain Relief".to_string(),
                price: Money::from_minor(price_paise),
                stock_quantity: stock,
                expiry_date: NaiveDate::from_ymd_opt(2027, 6, 30).unwrap(),
                seasonal_tag: None,
            })
            .await
            .unwrap()
            .id
    }

    fn cart(lines: &[(i64, i64)]) -> Cart {
        Cart::new(
            lines
                .iter()
                .map(|&(medicine_id, quantity)| CartLine {
                    medicine_id,
                    quantity,
                })
                .collect(),
        )
    }

    async fn stock_of(db: &Database, id: i64) -> i64 {
        db.medicines().get(id).await.unwrap().stock_quantity
    }

    #[tokio::test]
    async fn test_single_line_invoice() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let id = add_medicine(&db, "Paracetamol 500mg", 10_000, 10).await;

        let invoice = db.billing().generate_invoice(&cart(&[(id, 2)])).await.unwrap();

        assert_eq!(invoice.total, Money::from_minor(20_000));
        assert_eq!(invoice.item_count, 2);
        assert_eq!(invoice.lines.len(), 1);
        assert_eq!(invoice.lines[0].unit_price, Money::from_minor(10_000));
        assert!(invoice.invoice_number.starts_with("INV-"));

        assert_eq!(stock_of(&db, id).await, 8);

        let sales = db.sales().list_for_invoice(&invoice.invoice_number).await.unwrap();
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].quantity_sold, 2);
        assert_eq!(sales[0].total_amount(), Money::from_minor(20_000));
    }

    #[tokio::test]
    async fn test_failure_on_later_line_rolls_back_everything() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let a = add_medicine(&db, "Cetirizine", 500, 10).await;
        let b = add_medicine(&db, "Amoxicillin", 2_500, 1).await;

        let err = db
            .billing()
            .generate_invoice(&cart(&[(a, 3), (b, 5)]))
            .await
            .unwrap_err();

        match err {
            DbError::Domain(CoreError::InsufficientStock {
                name,
                available,
                requested,
            }) => {
                assert_eq!(name, "Amoxicillin");
                assert_eq!(available, 1);
                assert_eq!(requested, 5);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        assert_eq!(stock_of(&db, a).await, 10);
        assert_eq!(stock_of(&db, b).await, 1);
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_repeated_medicine_checked_cumulatively() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let a = add_medicine(&db, "ORS Sachet", 200, 10).await;

        let err = db
            .billing()
            .generate_invoice(&cart(&[(a, 5), (a, 6)]))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DbError::Domain(CoreError::InsufficientStock {
                available: 5,
                requested: 6,
                ..
            })
        ));
        assert_eq!(stock_of(&db, a).await, 10);

        let invoice = db
            .billing()
            .generate_invoice(&cart(&[(a, 5), (a, 5)]))
            .await
            .unwrap();
        assert_eq!(invoice.lines.len(), 2);
        assert_eq!(invoice.total, Money::from_minor(2_000));
        assert_eq!(stock_of(&db, a).await, 0);
    }

    #[tokio::test]
    async fn test_unknown_medicine_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let a = add_medicine(&db, "Vitamin C", 300, 10).await;

        let err = db
            .billing()
            .generate_invoice(&cart(&[(a, 1), (999, 1)]))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::Domain(CoreError::MedicineNotFound(999))));
        assert_eq!(stock_of(&db, a).await, 10);
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_empty_cart_rejected_before_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db.billing().generate_invoice(&cart(&[])).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::EmptyCart)));
    }

    #[tokio::test]
    async fn test_each_invoice_gets_its_own_number() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let a = add_medicine(&db, "Zinc Tablets", 150, 50).await;

        let first = db.billing().generate_invoice(&cart(&[(a, 1)])).await.unwrap();
        let second = db.billing().generate_invoice(&cart(&[(a, 1)])).await.unwrap();

        assert_ne!(first.invoice_number, second.invoice_number);
        assert_eq!(db.sales().count().await.unwrap(), 2);
        assert_eq!(stock_of(&db, a).await, 48);
    }

    #[tokio::test]
    async fn test_line_total_overflow_rolls_back() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let cheap = add_medicine(&db, "Crocin", 3_000, 10).await;
        let pricey = add_medicine(&db, "Imported Biologic", 5_000_000_000_000_000_000, 10).await;

        let err = db
            .billing()
            .generate_invoice(&cart(&[(cheap, 1), (pricey, 2)]))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DbError::Domain(CoreError::Validation(ValidationError::Overflow { .. }))
        ));
        assert_eq!(stock_of(&db, cheap).await, 10);
        assert_eq!(stock_of(&db, pricey).await, 10);
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_invoices_queue_for_the_write_lock() {
        let path = std::env::temp_dir().join(format!(
            "pharmacy-billing-concurrency-{}.db",
            std::process::id()
        ));
        let remove_files = || {
            for suffix in ["", "-wal", "-shm"] {
                let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
            }
        };
        remove_files();

        let db = Database::new(DbConfig::new(&path).max_connections(5))
            .await
            .unwrap();
        let id = add_medicine(&db, "Paracetamol 500mg", 1_000, 1_000).await;

        let handles: Vec<_> = (0..40)
            .map(|_| {
                let db = db.clone();
                tokio::spawn(async move { db.billing().generate_invoice(&cart(&[(id, 1)])).await })
            })
            .collect();

        let mut failures = Vec::new();
        for handle in handles {
            if let Err(e) = handle.await.unwrap() {
                failures.push(e.to_string());
            }
        }

        assert!(failures.is_empty(), "rejected invoices: {failures:?}");
        assert_eq!(stock_of(&db, id).await, 960);
        assert_eq!(db.sales().count().await.unwrap(), 40);

        db.close().await;
        remove_files();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_invoices_never_oversell() {
        let path = std::env::temp_dir().join(format!(
            "pharmacy-billing-oversell-{}.db",
            std::process::id()
        ));
        let remove_files = || {
            for suffix in ["", "-wal", "-shm"] {
                let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
            }
        };
        remove_files();

        let db = Database::new(DbConfig::new(&path).max_connections(5))
            .await
            .unwrap();
        let id = add_medicine(&db, "Amoxicillin 250mg", 2_500, 10).await;

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let db = db.clone();
                tokio::spawn(async move { db.billing().generate_invoice(&cart(&[(id, 1)])).await })
            })
            .collect();

        let mut billed = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => billed += 1,
                Err(DbError::Domain(CoreError::InsufficientStock { .. })) => {}
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }

        assert_eq!(billed, 10);
        assert_eq!(stock_of(&db, id).await, 0);

        db.close().await;
        remove_files();
    }
}
