//! # Medicine Repository
//!
//! Database operations for the medicine catalog.
//!
//! ## Key Operations
//! - Listing (catalog order for the dashboard, name order for the inventory page)
//! - Case-insensitive substring search
//! - CRUD operations (delete cascades to sales)
//!
//! ## Search
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How Inventory Search Works                           │
//! │                                                                         │
//! │  User types: "para"                                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Pattern: %para%  (LIKE wildcards in the input are escaped)            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  name LIKE ? OR manufacturer LIKE ? OR category LIKE ?                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │ Paracetamol 500mg | Cipla    | Pain ... │ ← MATCH (name)            │
//! │  │ Crocin            | GSK Para | Pain ... │ ← MATCH (manufacturer)    │
//! │  │ Cetirizine 10mg   | Sun      | Allergy  │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Results ordered by name                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use pharmacy_core::{Medicine, NewMedicine};
use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};

/// Column list matching the `Medicine` FromRow mapping.
const MEDICINE_COLUMNS: &str = "id, name, manufacturer, category, price_paise, \
     stock_quantity, expiry_date, seasonal_tag, created_at, updated_at";

/// Single-row lookup. Kept `'static` so it can run on a caller's transaction.
const SELECT_MEDICINE_BY_ID: &str = "SELECT id, name, manufacturer, category, price_paise, \
     stock_quantity, expiry_date, seasonal_tag, created_at, updated_at \
     FROM medicines WHERE id = ?1";

/// Loads one medicine through any executor (pool or open transaction).
pub(crate) async fn fetch_medicine<'e, E>(executor: E, id: i64) -> DbResult<Option<Medicine>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let medicine = sqlx::query_as::<_, Medicine>(SELECT_MEDICINE_BY_ID)
        .bind(id)
        .fetch_optional(executor)
        .await?;

    Ok(medicine)
}

/// Turns user input into a `LIKE` pattern that matches it as a plain substring.
fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for ch in query.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

/// Repository for medicine database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = MedicineRepository::new(pool);
///
/// let hits = repo.search("para").await?;
/// let medicine = repo.get(42).await?;
/// ```
#[derive(Debug, Clone)]
pub struct MedicineRepository {
    pool: SqlitePool,
}

impl MedicineRepository {
    /// Creates a new MedicineRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MedicineRepository { pool }
    }

    /// Every medicine in catalog (insertion) order.
    ///
    /// The dashboard walks this list, so "first ten seasonal recommendations"
    /// means the first ten in this order.
    pub async fn list_all(&self) -> DbResult<Vec<Medicine>> {
        let sql = format!("SELECT {} FROM medicines ORDER BY id", MEDICINE_COLUMNS);
        let medicines = sqlx::query_as::<_, Medicine>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(medicines)
    }

    /// Searches name, manufacturer and category, ignoring case.
    ///
    /// SQLite's `LIKE` folds ASCII letters only, so `"PARA"` finds
    /// "Paracetamol" but non-ASCII names match case-sensitively.
    /// A blank query lists everything. Results are ordered by name.
    pub async fn search(&self, query: &str) -> DbResult<Vec<Medicine>> {
        let query = query.trim();

        debug!(query = %query, "Searching medicines");

        let medicines = if query.is_empty() {
            let sql = format!("SELECT {} FROM medicines ORDER BY name, id", MEDICINE_COLUMNS);
            sqlx::query_as::<_, Medicine>(&sql)
                .fetch_all(&self.pool)
                .await?
        } else {
            let sql = format!(
                r#"
                SELECT {}
                FROM medicines
                WHERE name LIKE ?1 ESCAPE '\'
                   OR manufacturer LIKE ?1 ESCAPE '\'
                   OR category LIKE ?1 ESCAPE '\'
                ORDER BY name, id
                "#,
                MEDICINE_COLUMNS
            );
            sqlx::query_as::<_, Medicine>(&sql)
                .bind(like_pattern(query))
                .fetch_all(&self.pool)
                .await?
        };

        debug!(count = medicines.len(), "Search returned medicines");
        Ok(medicines)
    }

    /// Medicines that can be billed (stock > 0), ordered by name.
    pub async fn list_in_stock(&self) -> DbResult<Vec<Medicine>> {
        let sql = format!(
            "SELECT {} FROM medicines WHERE stock_quantity > 0 ORDER BY name, id",
            MEDICINE_COLUMNS
        );
        let medicines = sqlx::query_as::<_, Medicine>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(medicines)
    }

    /// Gets a medicine by ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Medicine))` - Medicine found
    /// * `Ok(None)` - Medicine not found
    pub async fn find(&self, id: i64) -> DbResult<Option<Medicine>> {
        fetch_medicine(&self.pool, id).await
    }

    /// Gets a medicine by ID, failing with `NotFound` if absent.
    pub async fn get(&self, id: i64) -> DbResult<Medicine> {
        self.find(id)
            .await?
            .ok_or_else(|| DbError::not_found("Medicine", id))
    }

    /// Inserts a new medicine and returns it with its generated ID.
    pub async fn insert(&self, medicine: &NewMedicine) -> DbResult<Medicine> {
        debug!(name = %medicine.name, category = %medicine.category, "Inserting medicine");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO medicines (
                name, manufacturer, category, price_paise, stock_quantity,
                expiry_date, seasonal_tag, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
            "#,
        )
        .bind(&medicine.name)
        .bind(&medicine.manufacturer)
        .bind(&medicine.category)
        .bind(medicine.price.minor())
        .bind(medicine.stock_quantity)
        .bind(medicine.expiry_date)
        .bind(medicine.seasonal_tag)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();

        Ok(Medicine {
            id,
            name: medicine.name.clone(),
            manufacturer: medicine.manufacturer.clone(),
            category: medicine.category.clone(),
            price_paise: medicine.price.minor(),
            stock_quantity: medicine.stock_quantity,
            expiry_date: medicine.expiry_date,
            seasonal_tag: medicine.seasonal_tag,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replaces every editable field of a medicine.
    ///
    /// ## Returns
    /// * `Ok(Medicine)` - The updated medicine
    /// * `Err(DbError::NotFound)` - Medicine doesn't exist
    pub async fn update(&self, id: i64, medicine: &NewMedicine) -> DbResult<Medicine> {
        debug!(id = %id, "Updating medicine");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE medicines SET
                name = ?2,
                manufacturer = ?3,
                category = ?4,
                price_paise = ?5,
                stock_quantity = ?6,
                expiry_date = ?7,
                seasonal_tag = ?8,
                updated_at = ?9
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&medicine.name)
        .bind(&medicine.manufacturer)
        .bind(&medicine.category)
        .bind(medicine.price.minor())
        .bind(medicine.stock_quantity)
        .bind(medicine.expiry_date)
        .bind(medicine.seasonal_tag)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Medicine", id));
        }

        self.get(id).await
    }

    /// Deletes a medicine and, through the foreign key cascade, its sales.
    ///
    /// Returns the deleted medicine so callers can report what was removed.
    pub async fn delete(&self, id: i64) -> DbResult<Medicine> {
        debug!(id = %id, "Deleting medicine");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let medicine = fetch_medicine(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Medicine", id))?;

        sqlx::query("DELETE FROM medicines WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(medicine)
    }

    /// Counts total medicines.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM medicines")
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
    use crate::{Database, DbConfig};
    use chrono::NaiveDate;
    use pharmacy_core::{Money, Season};

    fn new_medicine(name: &str, manufacturer: &str, category: &str) -> NewMedicine {
        NewMedicine {
            name: name.to_string(),
            manufacturer: manufacturer.to_string(),
            category: category.to_string(),
            price: Money::from_minor(1250),
            stock_quantity: 20,
            expiry_date: NaiveDate::from_ymd_opt(2027, 6, 30).unwrap(),
            seasonal_tag: None,
        }
    }

    async fn repo() -> MedicineRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().medicines()
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("para"), "%para%");
        assert_eq!(like_pattern("50%"), "%50\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
    }

    #[tokio::test]
    async fn test_insert_and_get_round_trip() {
        let repo = repo().await;

        let mut input = new_medicine("Benadryl", "J&J", "Cough Syrup");
        input.seasonal_tag = Some(Season::Winter);
        let created = repo.insert(&input).await.unwrap();

        let loaded = repo.get(created.id).await.unwrap();
        assert_eq!(loaded.name, "Benadryl");
        assert_eq!(loaded.price(), Money::from_minor(1250));
        assert_eq!(loaded.expiry_date, input.expiry_date);
        assert_eq!(loaded.seasonal_tag, Some(Season::Winter));
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_across_fields() {
        let repo = repo().await;
        repo.insert(&new_medicine("Paracetamol 500mg", "Cipla", "Pain Relief"))
            .await
            .unwrap();
        repo.insert(&new_medicine("Crocin", "GSK PARAmed", "Pain Relief"))
            .await
            .unwrap();
        repo.insert(&new_medicine("Cetirizine 10mg", "Sun Pharma", "Antihistamine"))
            .await
            .unwrap();

        let hits = repo.search("para").await.unwrap();
        let names: Vec<&str> = hits.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Crocin", "Paracetamol 500mg"]);

        let by_category = repo.search("ANTIHIST").await.unwrap();
        assert_eq!(by_category.len(), 1);

        let mixed = repo.search("PaRaCeTaMoL").await.unwrap();
        assert_eq!(mixed.len(), 1);
        assert_eq!(mixed[0].name, "Paracetamol 500mg");

        assert_eq!(repo.search("  ").await.unwrap().len(), 3);
        assert!(repo.search("%").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_in_stock_skips_empty() {
        let repo = repo().await;
        let mut empty = new_medicine("Zinc Tablets", "Abbott", "Vitamin C");
        empty.stock_quantity = 0;
        repo.insert(&empty).await.unwrap();
        repo.insert(&new_medicine("Avil", "Sanofi", "Antihistamine"))
            .await
            .unwrap();

        let billable = repo.list_in_stock().await.unwrap();
        assert_eq!(billable.len(), 1);
        assert_eq!(billable[0].name, "Avil");
    }

    #[tokio::test]
    async fn test_update_and_missing_ids() {
        let repo = repo().await;
        let created = repo
            .insert(&new_medicine("Dolo 650", "Micro Labs", "Pain Relief"))
            .await
            .unwrap();

        let mut edit = new_medicine("Dolo 650", "Micro Labs", "Pain Relief");
        edit.stock_quantity = 3;
        let updated = repo.update(created.id, &edit).await.unwrap();
        assert_eq!(updated.stock_quantity, 3);

        assert!(matches!(
            repo.update(999, &edit).await,
            Err(DbError::NotFound { .. })
        ));
        assert!(matches!(repo.get(999).await, Err(DbError::NotFound { .. })));
        assert!(matches!(repo.delete(999).await, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_returns_removed_medicine() {
        let repo = repo().await;
        let created = repo
            .insert(&new_medicine("ORS Sachet", "FDC", "Oral Rehydration"))
            .await
            .unwrap();

        let deleted = repo.delete(created.id).await.unwrap();
        assert_eq!(deleted.name, "ORS Sachet");
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_negative_stock_rejected_by_schema() {
        let repo = repo().await;
        let mut bad = new_medicine("Broken", "Nobody", "Antacid");
        bad.stock_quantity = -1;
        assert!(matches!(
            repo.insert(&bad).await,
            Err(DbError::QueryFailed(_))
        ));
    }
}
