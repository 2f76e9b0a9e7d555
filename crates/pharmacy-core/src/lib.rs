//! # pharmacy-core: Pure Business Logic for the Pharmacy Inventory
//!
//! This crate is the **heart** of the pharmacy inventory. It contains all
//! business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Pharmacy Inventory Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP Routes (axum)                           │   │
//! │  │   dashboard, inventory CRUD, billing, JSON API                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ pharmacy-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │  ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌──────────┐ │   │
//! │  │  │  types  │ │  money  │ │ season  │ │dashboard │ │ billing  │ │   │
//! │  │  │Medicine │ │  Money  │ │ Season  │ │  Stats   │ │Cart,     │ │   │
//! │  │  │Sale     │ │ (paise) │ │Calendar │ │ compute  │ │Ledger,   │ │   │
//! │  │  │Supplier │ │         │ │         │ │          │ │Invoice   │ │   │
//! │  │  └─────────┘ └─────────┘ └─────────┘ └──────────┘ └──────────┘ │   │
//! │  │          policy (thresholds + tables) · validation              │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  pharmacy-db (Database Layer)                   │   │
//! │  │     SQLite queries, migrations, repositories, billing tx        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Medicine, Sale, Supplier)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`season`] - Month → season and category → season tables
//! - [`policy`] - Thresholds and tables as one configuration value
//! - [`dashboard`] - Dashboard statistics
//! - [`billing`] - Cart parsing, in-pass stock ledger, invoice building
//! - [`error`] - Domain error types
//! - [`validation`] - Form and field validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: the caller passes `today`/`now`; nothing here reads the clock
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in paise (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use pharmacy_core::{InventoryPolicy, Season};
//!
//! let policy = InventoryPolicy::default();
//! let today = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();
//!
//! assert_eq!(policy.season_for(today), Season::Monsoon);
//! assert_eq!(policy.tag_for_category("Antibiotic"), Some(Season::Monsoon));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod billing;
pub mod dashboard;
pub mod error;
pub mod money;
pub mod policy;
pub mod season;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use pharmacy_core::Money` instead of
// `use pharmacy_core::money::Money`

pub use dashboard::DashboardStats;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use policy::InventoryPolicy;
pub use season::Season;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed in a single cart
///
/// ## Business Reason
/// Prevents runaway carts and ensures reasonable transaction sizes.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single cart line
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10)
pub const MAX_ITEM_QUANTITY: i64 = 999;
