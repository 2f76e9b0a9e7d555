//! # Dashboard
//!
//! ```text
//! GET /dashboard
//!      │
//!      ├── medicines().list_all()          whole catalog, id order
//!      ├── sales().list_for_day(today)     today's sales (UTC)
//!      │
//!      ▼
//! DashboardStats::compute(.., today, &policy)
//!      │
//!      ▼
//! DashboardDto (money as strings, store name, currency symbol)
//! ```

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use pharmacy_core::DashboardStats;
use std::time::Instant;
use tracing::{debug, info};

use crate::dto::DashboardDto;
use crate::error::ApiError;
use crate::AppState;

pub async fn dashboard(State(state): State<AppState>) -> Result<Json<DashboardDto>, ApiError> {
    let start = Instant::now();
    let today = Utc::now().date_naive();

    debug!(today = %today, "dashboard");

    let medicines = state.db.medicines().list_all().await?;
    let sales = state.db.sales().list_for_day(today).await?;

    let stats = DashboardStats::compute(&medicines, &sales, today, &state.policy);

    info!(
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        medicines = medicines.len(),
        low_stock = stats.low_stock_count,
        expiring = stats.expiring_count,
        season = %stats.current_season,
        "dashboard computed"
    );

    Ok(Json(DashboardDto::new(&stats, today, &state.store)))
}
