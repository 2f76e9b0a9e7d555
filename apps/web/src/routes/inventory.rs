//! # Inventory
//!
//! Listing, search and the add/edit/delete forms for medicines.
//!
//! Forms are posted urlencoded. Every field arrives as text and is validated
//! by `MedicineForm::validate`, which also derives the seasonal tag from the
//! category; clients never send the tag.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Form, Json};
use pharmacy_core::validation::{validate_search_query, MedicineForm};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dto::{self, FormOptions, MedicineDto, MessageDto};
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct InventoryQuery {
    #[serde(default)]
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InventoryPage {
    pub search: String,
    pub count: usize,
    pub medicines: Vec<MedicineDto>,
}

#[derive(Debug, Serialize)]
pub struct EditPage {
    pub medicine: MedicineDto,
    pub categories: Vec<String>,
}

/// `GET /inventory?search=`: medicines by name, optionally filtered.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<InventoryQuery>,
) -> Result<Json<InventoryPage>, ApiError> {
    let search = validate_search_query(query.search.as_deref().unwrap_or(""))?;

    debug!(search = %search, "inventory list");

    let medicines = state.db.medicines().search(&search).await?;

    Ok(Json(InventoryPage {
        search,
        count: medicines.len(),
        medicines: dto::medicines(&medicines),
    }))
}

/// `GET /inventory/add`
pub async fn add_form(State(state): State<AppState>) -> Json<FormOptions> {
    Json(FormOptions {
        categories: state.policy.categories.all_categories(),
    })
}

/// `POST /inventory/add`
pub async fn add(
    State(state): State<AppState>,
    Form(form): Form<MedicineForm>,
) -> Result<(StatusCode, Json<MedicineDto>), ApiError> {
    let new_medicine = form.validate(&state.policy.categories)?;
    let medicine = state.db.medicines().insert(&new_medicine).await?;

    info!(id = medicine.id, name = %medicine.name, "Medicine added via form");

    Ok((StatusCode::CREATED, Json(MedicineDto::from(medicine))))
}

/// `GET /inventory/edit/{id}`
pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<EditPage>, ApiError> {
    let medicine = state.db.medicines().get(id).await?;

    Ok(Json(EditPage {
        medicine: MedicineDto::from(medicine),
        categories: state.policy.categories.all_categories(),
    }))
}

/// `POST /inventory/edit/{id}`
pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<MedicineForm>,
) -> Result<Json<MedicineDto>, ApiError> {
    let changes = form.validate(&state.policy.categories)?;
    let medicine = state.db.medicines().update(id, &changes).await?;

    info!(id, name = %medicine.name, "Medicine updated via form");

    Ok(Json(MedicineDto::from(medicine)))
}

/// `POST /inventory/delete/{id}`: removes the medicine and its sales.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageDto>, ApiError> {
    let deleted = state.db.medicines().delete(id).await?;

    Ok(Json(MessageDto {
        message: format!("Medicine '{}' deleted successfully", deleted.name),
    }))
}
