//! # Domain Types
//!
//! Core domain types used throughout the pharmacy inventory.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Medicine     │   │      Sale       │   │    Supplier     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │◄──│  medicine_id    │   │  id (i64)       │       │
//! │  │  name           │   │  quantity_sold  │   │  name (unique)  │       │
//! │  │  category       │   │  total_paise    │   │  contact        │       │
//! │  │  price_paise    │   │  invoice_number │   │  email?         │       │
//! │  │  stock_quantity │   │  sale_date      │   │  address?       │       │
//! │  │  expiry_date    │   └─────────────────┘   └─────────────────┘       │
//! │  │  seasonal_tag?  │                                                    │
//! │  └─────────────────┘   SaleRecord = Sale + medicine name (SQL join)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! All entities use SQLite integer surrogate keys. A Sale refers to its
//! Medicine by id only; the medicine name for listings comes from an explicit
//! join in the repository (see `SaleRecord`).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::season::Season;

// =============================================================================
// Medicine
// =============================================================================

/// A medicine held in stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Medicine {
    /// Surrogate key (autoincrement).
    pub id: i64,

    /// Display name, e.g. "Paracetamol 500mg".
    pub name: String,

    pub manufacturer: String,

    /// Therapeutic category, e.g. "Cough Syrup". Drives `seasonal_tag`.
    pub category: String,

    /// Unit price in paise (smallest currency unit).
    pub price_paise: i64,

    /// Units on hand. Never negative.
    pub stock_quantity: i64,

    #[ts(as = "String")]
    pub expiry_date: NaiveDate,

    /// Season derived from `category`. Never supplied by the client.
    pub seasonal_tag: Option<Season>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Medicine {
    /// Returns the unit price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_minor(self.price_paise)
    }

    /// True when stock is strictly below the threshold.
    ///
    /// ```rust
    /// # use pharmacy_core::types::Medicine;
    /// # let mut m = Medicine::sample(1, "Paracetamol 500mg");
    /// m.stock_quantity = 9;
    /// assert!(m.is_low_stock(10));
    /// m.stock_quantity = 10;
    /// assert!(!m.is_low_stock(10));
    /// ```
    #[inline]
    pub fn is_low_stock(&self, threshold: i64) -> bool {
        self.stock_quantity < threshold
    }

    /// Whole days from `today` until expiry. Negative once expired.
    #[inline]
    pub fn days_until_expiry(&self, today: NaiveDate) -> i64 {
        (self.expiry_date - today).num_days()
    }

    /// True when the medicine expires within `window_days` but has not expired yet.
    ///
    /// Expiring today counts (0 days left); already expired does not.
    pub fn is_expiring_soon(&self, today: NaiveDate, window_days: i64) -> bool {
        let days = self.days_until_expiry(today);
        (0..=window_days).contains(&days)
    }

    #[inline]
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.days_until_expiry(today) < 0
    }

    #[inline]
    pub fn is_in_stock(&self) -> bool {
        self.stock_quantity > 0
    }

    /// Builds a medicine with neutral values. Handy in doc examples and tests.
    pub fn sample(id: i64, name: &str) -> Self {
        let epoch = DateTime::<Utc>::UNIX_EPOCH;
        Medicine {
            id,
            name: name.to_string(),
            manufacturer: "Generic Pharma".to_string(),
            category: "Pain Relief".to_string(),
            price_paise: 1000,
            stock_quantity: 100,
            expiry_date: NaiveDate::MAX,
            seasonal_tag: None,
            created_at: epoch,
            updated_at: epoch,
        }
    }
}

/// Validated input for creating or replacing a medicine.
///
/// Produced by `validation::MedicineForm::validate`, which also derives the
/// seasonal tag. Repositories accept only this type, so unvalidated form data
/// cannot reach the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewMedicine {
    pub name: String,
    pub manufacturer: String,
    pub category: String,
    pub price: Money,
    pub stock_quantity: i64,
    #[ts(as = "String")]
    pub expiry_date: NaiveDate,
    pub seasonal_tag: Option<Season>,
}

// =============================================================================
// Sale
// =============================================================================

/// A single sold line, written by the billing transaction.
///
/// `total_paise` is frozen at sale time (quantity × price then). Later price
/// edits do not change historical sales.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: i64,
    pub medicine_id: i64,
    pub quantity_sold: i64,
    pub total_paise: i64,
    #[ts(as = "String")]
    pub sale_date: DateTime<Utc>,
    /// Invoice that produced this row.
    pub invoice_number: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// Returns the frozen total as Money.
    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_minor(self.total_paise)
    }
}

/// A sale joined with the name of the medicine it sold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleRecord {
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub sale: Sale,
    pub medicine_name: String,
}

// =============================================================================
// Supplier
// =============================================================================

/// A supplier contact. Not linked to billing or the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Supplier {
    pub id: i64,
    pub name: String,
    pub contact: String,
    pub email: Option<String>,
    pub address: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating a supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewSupplier {
    pub name: String,
    pub contact: String,
    pub email: Option<String>,
    pub address: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================
