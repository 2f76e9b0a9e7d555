//! # HTTP Routes
//!
//! ```text
//! GET  /                               dashboard
//! GET  /dashboard                      dashboard
//! GET  /inventory?search=              inventory list / search
//! GET  /inventory/add                  form options
//! POST /inventory/add                  create medicine (form)
//! GET  /inventory/edit/{id}            medicine + form options
//! POST /inventory/edit/{id}            update medicine (form)
//! POST /inventory/delete/{id}          delete medicine (cascades sales)
//! GET  /billing                        medicines in stock
//! POST /generate_invoice               bill a cart (form field cart_data)
//! GET  /api/seasonal_recommendations   this season's medicines
//! GET  /api/medicine/{id}              single medicine
//! GET  /api/sales?limit=               recent sales
//! GET  /api/suppliers                  supplier list
//! POST /api/suppliers                  create supplier (JSON)
//! GET  /health                         database health
//! ```

pub mod api;
pub mod billing;
pub mod dashboard;
pub mod inventory;

use axum::routing::{get, post};
use axum::Router;

use crate::AppState;

/// All routes, without state or middleware.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::dashboard))
        .route("/dashboard", get(dashboard::dashboard))
        .route("/inventory", get(inventory::list))
        .route("/inventory/add", get(inventory::add_form).post(inventory::add))
        .route(
            "/inventory/edit/{id}",
            get(inventory::edit_form).post(inventory::edit),
        )
        .route("/inventory/delete/{id}", post(inventory::delete))
        .route("/billing", get(billing::billing))
        .route("/generate_invoice", post(billing::generate_invoice))
        .route(
            "/api/seasonal_recommendations",
            get(api::seasonal_recommendations),
        )
        .route("/api/medicine/{id}", get(api::medicine))
        .route("/api/sales", get(api::recent_sales))
        .route(
            "/api/suppliers",
            get(api::list_suppliers).post(api::create_supplier),
        )
        .route("/health", get(api::health))
}
