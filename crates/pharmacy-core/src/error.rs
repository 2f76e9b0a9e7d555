//! # Domain Errors
//!
//! Two enums cover everything pharmacy-core can reject:
//!
//! ```text
//! ValidationError   one bad field in a form or query string
//!       │ #[from]
//!       ▼
//! CoreError         a cart that cannot be billed (unknown medicine,
//!                   not enough stock, empty or oversized cart)
//! ```
//!
//! Both carry the offending field or medicine in their message, since the
//! web layer forwards `to_string()` to the client unchanged.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Billing failures.
///
/// Any of these aborts the whole cart; the caller rolls back whatever the
/// same transaction already wrote.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The cart names an id that does not exist, or was deleted after the
    /// billing page loaded.
    #[error("Medicine with ID {0} not found")]
    MedicineNotFound(i64),

    /// Insufficient stock to complete the invoice.
    ///
    /// ## User Workflow
    /// ```text
    /// Cart: [Paracetamol × 5, Paracetamol × 6]
    ///      │
    ///      ▼
    /// Ledger: available=10 → 5 left after first line
    ///      │
    ///      ▼
    /// InsufficientStock { name: "Paracetamol", available: 5, requested: 6 }
    ///      │
    ///      ▼
    /// Nothing committed, client sees the message
    /// ```
    #[error("Insufficient stock for {name}: available {available}, requested {requested}")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    /// Cart payload was missing, blank, or an empty list.
    #[error("Cart is empty")]
    EmptyCart,

    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// A single rejected input field.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Missing, or blank after trimming.
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Malformed number, date, or JSON.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// An amount that does not fit in the money type.
    #[error("{field} is too large")]
    Overflow { field: String },

    /// Supplier names are unique.
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

pub type CoreResult<T> = Result<T, CoreError>;
pub type ValidationResult<T> = Result<T, ValidationError>;
