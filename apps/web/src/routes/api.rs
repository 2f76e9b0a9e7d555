//! # JSON API
//!
//! Read endpoints for other clients, the supplier list, and the health check.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use pharmacy_core::dashboard::seasonal_catalog;
use pharmacy_core::validation::{validate_limit, SupplierForm};
use pharmacy_db::migration_status;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::dto::{MedicineDto, SaleDto, SeasonalRecommendationsDto, SupplierDto};
use crate::error::ApiError;
use crate::AppState;

/// Default and maximum page size for `/api/sales`.
pub const DEFAULT_SALES_LIMIT: i64 = 50;
pub const MAX_SALES_LIMIT: i64 = 500;

#[derive(Debug, Default, Deserialize)]
pub struct SalesQuery {
    pub limit: Option<i64>,
}

/// `GET /api/seasonal_recommendations`
///
/// Every medicine tagged with the current season, in stock or not, capped at
/// `policy.api_recommendation_limit`.
pub async fn seasonal_recommendations(
    State(state): State<AppState>,
) -> Result<Json<SeasonalRecommendationsDto>, ApiError> {
    let season = state.policy.season_for(Utc::now().date_naive());
    let medicines = state.db.medicines().list_all().await?;
    let recommendations =
        seasonal_catalog(&medicines, season, state.policy.api_recommendation_limit);

    debug!(season = %season, count = recommendations.len(), "seasonal_recommendations");

    Ok(Json(SeasonalRecommendationsDto {
        season,
        recommendations: recommendations.iter().map(MedicineDto::from).collect(),
    }))
}

/// `GET /api/medicine/{id}`
pub async fn medicine(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MedicineDto>, ApiError> {
    let medicine = state.db.medicines().get(id).await?;
    Ok(Json(MedicineDto::from(medicine)))
}

/// `GET /api/sales?limit=`: newest first, with the medicine name joined in.
pub async fn recent_sales(
    State(state): State<AppState>,
    Query(query): Query<SalesQuery>,
) -> Result<Json<Vec<SaleDto>>, ApiError> {
    let limit = validate_limit(query.limit, DEFAULT_SALES_LIMIT, MAX_SALES_LIMIT)?;
    let records = state.db.sales().list_recent(limit).await?;
    Ok(Json(records.iter().map(SaleDto::from).collect()))
}

/// `GET /api/suppliers`
pub async fn list_suppliers(
    State(state): State<AppState>,
) -> Result<Json<Vec<SupplierDto>>, ApiError> {
    let suppliers = state.db.suppliers().list().await?;
    Ok(Json(suppliers.iter().map(SupplierDto::from).collect()))
}

/// `POST /api/suppliers`
pub async fn create_supplier(
    State(state): State<AppState>,
    Json(form): Json<SupplierForm>,
) -> Result<(StatusCode, Json<SupplierDto>), ApiError> {
    let new_supplier = form.validate()?;
    let supplier = state.db.suppliers().insert(&new_supplier).await?;

    info!(id = supplier.id, name = %supplier.name, "Supplier created");

    Ok((StatusCode::CREATED, Json(SupplierDto::from(&supplier))))
}

#[derive(Debug, Serialize)]
pub struct HealthDto {
    pub status: &'static str,
    pub database: bool,
    pub migrations_embedded: usize,
    pub migrations_applied: usize,
    pub server_time: String,
}

/// `GET /health`: 200 when the database answers, 503 otherwise.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthDto>) {
    let database = state.db.health_check().await;

    let (embedded, applied) = match migration_status(state.db.pool()).await {
        Ok(counts) => counts,
        Err(e) => {
            error!(error = %e, "Failed to read migration status");
            (0, 0)
        }
    };

    let healthy = database && embedded == applied;
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthDto {
            status: if healthy { "ok" } else { "unavailable" },
            database,
            migrations_embedded: embedded,
            migrations_applied: applied,
            server_time: Utc::now().to_rfc3339(),
        }),
    )
}
