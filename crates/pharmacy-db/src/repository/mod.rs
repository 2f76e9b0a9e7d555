//! # Repository Module
//!
//! Database repository implementations for the pharmacy inventory.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  state.db.medicines().search("para")                           │
//! │       ▼                                                                 │
//! │  MedicineRepository                                                    │
//! │  ├── list_all / search / list_in_stock                                 │
//! │  ├── get / insert / update / delete                                    │
//! │  └── count                                                              │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`MedicineRepository`](medicine::MedicineRepository) - Medicine CRUD and search
//! - [`SaleRepository`](sale::SaleRepository) - Sales history queries
//! - [`SupplierRepository`](supplier::SupplierRepository) - Supplier list and insert
//! - [`BillingRepository`](billing::BillingRepository) - Atomic invoice generation

pub mod billing;
pub mod medicine;
pub mod sale;
pub mod supplier;
