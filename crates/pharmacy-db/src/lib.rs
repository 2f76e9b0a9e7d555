//! # pharmacy-db: Database Layer for the Pharmacy Inventory
//!
//! SQLite storage for medicines, sales and suppliers, accessed through sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Pharmacy Inventory Data Flow                        │
//! │                                                                         │
//! │  axum handler (POST /generate_invoice)                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   pharmacy-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │                │    │  (embedded)  │  │   │
//! │  │   │               │    │ MedicineRepo   │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ SaleRepo       │    │ 001_initial_ │  │   │
//! │  │   │ Connection    │    │ SupplierRepo   │    │   schema.sql │  │   │
//! │  │   │ Management    │    │ BillingRepo    │    │              │  │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │                     ./pharmacy.db (configurable)                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pharmacy_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./pharmacy.db")).await?;
//!
//! let hits = db.medicines().search("para").await?;
//! let invoice = db.billing().generate_invoice(&cart).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use migrations::migration_status;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::billing::BillingRepository;
pub use repository::medicine::MedicineRepository;
pub use repository::sale::SaleRepository;
pub use repository::supplier::SupplierRepository;
