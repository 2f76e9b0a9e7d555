//! # Billing
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET /billing              → medicines with stock > 0, by name         │
//! │       │                                                                 │
//! │       ▼  (client builds the cart)                                      │
//! │  POST /generate_invoice                                                │
//! │       cart_data=[{"medicine_id":1,"quantity":2}, ...]                  │
//! │       │                                                                 │
//! │       ├── Cart::parse_json      missing / blank / []  → 400 EMPTY_CART │
//! │       ├── generate_invoice      one transaction                        │
//! │       │     unknown id          → 404 NOT_FOUND                        │
//! │       │     not enough stock    → 409 INSUFFICIENT_STOCK               │
//! │       ▼                                                                 │
//! │  200 InvoiceDto                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::State;
use axum::{Form, Json};
use pharmacy_core::billing::Cart;
use serde::Deserialize;
use tracing::debug;

use crate::dto::{self, InvoiceDto, MedicineDto};
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct InvoiceForm {
    #[serde(default)]
    pub cart_data: Option<String>,
}

/// `GET /billing`
pub async fn billing(State(state): State<AppState>) -> Result<Json<Vec<MedicineDto>>, ApiError> {
    let medicines = state.db.medicines().list_in_stock().await?;
    Ok(Json(dto::medicines(&medicines)))
}

/// `POST /generate_invoice`
pub async fn generate_invoice(
    State(state): State<AppState>,
    Form(form): Form<InvoiceForm>,
) -> Result<Json<InvoiceDto>, ApiError> {
    let cart = Cart::parse_json(form.cart_data.as_deref())?;

    debug!(lines = cart.len(), "generate_invoice");

    let invoice = state.db.billing().generate_invoice(&cart).await?;

    Ok(Json(InvoiceDto::new(&invoice, &state.store)))
}
