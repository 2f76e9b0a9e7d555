//! # pharmacy-web
//!
//! axum HTTP server for the pharmacy inventory.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           Web Server                                    │
//! │                                                                         │
//! │  Request ──► TraceLayer ──► Router ──► handler(State<AppState>)        │
//! │                                             │                           │
//! │                      ┌──────────────────────┼───────────────────┐       │
//! │                      ▼                      ▼                   ▼       │
//! │               InventoryPolicy        Database (pool)       StoreConfig  │
//! │               (pharmacy-core)        (pharmacy-db)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`config`]. Logging honours `RUST_LOG`.

pub mod config;
pub mod dto;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::http::Uri;
use axum::Router;
use pharmacy_core::InventoryPolicy;
use pharmacy_db::Database;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

pub use config::{AppConfig, StoreConfig};
pub use error::ApiError;

/// Default log filter when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info,pharmacy=debug,sqlx=warn";

/// Shared application state.
///
/// Cheap to clone: the database handle wraps a pooled connection set and the
/// rest is behind `Arc`.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub policy: Arc<InventoryPolicy>,
    pub store: Arc<StoreConfig>,
}

impl AppState {
    pub fn new(db: Database, policy: InventoryPolicy, store: StoreConfig) -> Self {
        AppState {
            db,
            policy: Arc::new(policy),
            store: Arc::new(store),
        }
    }
}

/// Builds the full application router with tracing middleware.
pub fn router(state: AppState) -> Router {
    routes::routes()
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found("Route", uri.path())
}

/// Installs the global tracing subscriber.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
