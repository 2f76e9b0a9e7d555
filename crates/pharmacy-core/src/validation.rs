//! # Validation Module
//!
//! Input validation for the pharmacy inventory.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler (axum)                                          │
//! │  ├── Form / query deserialization into raw strings                     │
//! │  └── Path parameters as integers                                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required fields, lengths                                          │
//! │  ├── Price / stock / date parsing                                      │
//! │  └── Seasonal tag derivation (MedicineForm → NewMedicine)              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL, CHECK (stock_quantity >= 0, price_paise >= 0)           │
//! │  ├── UNIQUE (suppliers.name)                                           │
//! │  └── Foreign key constraints (sales.medicine_id)                       │
//! │                                                                         │
//! │  Defense in depth: Multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pharmacy_core::season::{Season, SeasonalCategories};
//! use pharmacy_core::validation::MedicineForm;
//!
//! let form = MedicineForm {
//!     name: "Benadryl Cough Syrup".into(),
//!     manufacturer: "Johnson & Johnson".into(),
//!     category: "Cough Syrup".into(),
//!     price: "85.50".into(),
//!     stock_quantity: "40".into(),
//!     expiry_date: "2026-01-31".into(),
//! };
//!
//! let medicine = form.validate(&SeasonalCategories::default()).unwrap();
//! assert_eq!(medicine.seasonal_tag, Some(Season::Winter));
//! assert_eq!(medicine.price.minor(), 8550);
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use crate::error::ValidationResult;

use crate::error::ValidationError;
use crate::money::Money;
use crate::season::SeasonalCategories;
use crate::types::{NewMedicine, NewSupplier};
use crate::MAX_ITEM_QUANTITY;

/// Date format accepted on forms and emitted in JSON.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Upper bound for a single medicine's stock level.
pub const MAX_STOCK_QUANTITY: i64 = 1_000_000;

/// Upper bound for a unit price: ₹1,00,000.00.
pub const MAX_PRICE: Money = Money::from_minor(10_000_000);

pub const MAX_NAME_LEN: usize = 200;
pub const MAX_CATEGORY_LEN: usize = 100;
pub const MAX_CONTACT_LEN: usize = 15;
pub const MAX_EMAIL_LEN: usize = 100;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required free-text field and returns it trimmed.
///
/// ## Example
/// ```rust
/// use pharmacy_core::validation::validate_text;
///
/// assert_eq!(validate_text("name", "  Crocin  ", 200).unwrap(), "Crocin");
/// assert!(validate_text("name", "   ", 200).is_err());
/// assert!(validate_text("name", &"A".repeat(201), 200).is_err());
/// ```
pub fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (returns all results)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "search".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

/// Loose email check: something before and after a single `@`, with a dot
/// in the domain.
pub fn validate_email(email: &str) -> ValidationResult<String> {
    let email = validate_text("email", email, MAX_EMAIL_LEN)?;

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };

    if !valid {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@example.com".to_string(),
        });
    }

    Ok(email)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Billing: Generate Invoice                                              │
/// │                                                                         │
/// │  Cart line: { medicine_id: 3, quantity: 5 }                            │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(5) ← THIS FUNCTION                                  │
/// │       │                                                                 │
/// │       ├── qty <= 0? → Error: "quantity must be positive"               │
/// │       │                                                                 │
/// │       ├── qty > 999? → Error: "quantity must be between 1 and 999"     │
/// │       │                                                                 │
/// │       └── OK → Proceed to stock check                                  │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Parses a price field, at most [`MAX_PRICE`]. See [`Money::parse_decimal`]
/// for the accepted forms.
///
/// ```rust
/// use pharmacy_core::validation::parse_price;
///
/// assert_eq!(parse_price("100000").unwrap().minor(), 10_000_000);
/// assert!(parse_price("100000.01").is_err());
/// ```
pub fn parse_price(raw: &str) -> ValidationResult<Money> {
    let price = Money::parse_decimal(raw)?;

    if price > MAX_PRICE {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_PRICE.major(),
        });
    }

    Ok(price)
}

/// Parses a stock level: a whole number between 0 and `MAX_STOCK_QUANTITY`.
///
/// ## Example
/// ```rust
/// use pharmacy_core::validation::parse_stock_quantity;
///
/// assert_eq!(parse_stock_quantity("0").unwrap(), 0);
/// assert_eq!(parse_stock_quantity(" 150 ").unwrap(), 150);
/// assert!(parse_stock_quantity("-1").is_err());
/// assert!(parse_stock_quantity("2.5").is_err());
/// ```
pub fn parse_stock_quantity(raw: &str) -> ValidationResult<i64> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: "stock_quantity".to_string(),
        });
    }

    let qty: i64 = raw.parse().map_err(|_| ValidationError::InvalidFormat {
        field: "stock_quantity".to_string(),
        reason: "must be a whole number".to_string(),
    })?;

    if !(0..=MAX_STOCK_QUANTITY).contains(&qty) {
        return Err(ValidationError::OutOfRange {
            field: "stock_quantity".to_string(),
            min: 0,
            max: MAX_STOCK_QUANTITY,
        });
    }

    Ok(qty)
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(field: &str, raw: &str) -> ValidationResult<NaiveDate> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "expected YYYY-MM-DD".to_string(),
    })
}

/// Resolves an optional `limit` query parameter.
///
/// ## Rules
/// - Missing → `default`
/// - Must be positive and at most `max`
pub fn validate_limit(limit: Option<i64>, default: i64, max: i64) -> ValidationResult<i64> {
    match limit {
        None => Ok(default),
        Some(n) if n <= 0 => Err(ValidationError::MustBePositive {
            field: "limit".to_string(),
        }),
        Some(n) if n > max => Err(ValidationError::OutOfRange {
            field: "limit".to_string(),
            min: 1,
            max,
        }),
        Some(n) => Ok(n),
    }
}

// =============================================================================
// Forms
// =============================================================================

/// Raw add/edit medicine form, exactly as posted.
///
/// Every field is a string so that a bad number surfaces as a field-level
/// validation error instead of a generic deserialization failure. Missing
/// fields deserialize as empty and are reported as required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MedicineForm {
    pub name: String,
    pub manufacturer: String,
    pub category: String,
    pub price: String,
    pub stock_quantity: String,
    pub expiry_date: String,
}

impl MedicineForm {
    /// Validates every field and derives the seasonal tag from the category.
    ///
    /// Categories outside the seasonal table are accepted and left untagged.
    pub fn validate(&self, categories: &SeasonalCategories) -> ValidationResult<NewMedicine> {
        let name = validate_text("name", &self.name, MAX_NAME_LEN)?;
        let manufacturer = validate_text("manufacturer", &self.manufacturer, MAX_NAME_LEN)?;
        let category = validate_text("category", &self.category, MAX_CATEGORY_LEN)?;
        let price = parse_price(&self.price)?;
        let stock_quantity = parse_stock_quantity(&self.stock_quantity)?;
        let expiry_date = parse_date("expiry_date", &self.expiry_date)?;
        let seasonal_tag = categories.tag_for_category(&category);

        Ok(NewMedicine {
            name,
            manufacturer,
            category,
            price,
            stock_quantity,
            expiry_date,
            seasonal_tag,
        })
    }
}

/// Raw supplier form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupplierForm {
    pub name: String,
    pub contact: String,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl SupplierForm {
    pub fn validate(&self) -> ValidationResult<NewSupplier> {
        let name = validate_text("name", &self.name, MAX_NAME_LEN)?;
        let contact = validate_text("contact", &self.contact, MAX_CONTACT_LEN)?;

        let email = match self.email.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(e) => Some(validate_email(e)?),
        };

        let address = self
            .address
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string);

        Ok(NewSupplier {
            name,
            contact,
            email,
            address,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
