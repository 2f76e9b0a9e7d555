//! # Inventory Policy
//!
//! Every tunable number and table the dashboard and billing rely on, gathered
//! into one value. The web app deserializes it from configuration; anything
//! left out falls back to the defaults below.
//!
//! ```text
//! ┌──────────────────────────┬─────────┬──────────────────────────────────────┐
//! │ Field                    │ Default │ Used by                              │
//! ├──────────────────────────┼─────────┼──────────────────────────────────────┤
//! │ low_stock_threshold      │ 10      │ Dashboard: low_stock                 │
//! │ expiry_warning_days      │ 30      │ Dashboard: expiring_soon             │
//! │ restock_threshold        │ 50      │ Dashboard: seasonal_recommendations  │
//! │ max_recommendations      │ 10      │ Dashboard: seasonal_recommendations  │
//! │ api_recommendation_limit │ 20      │ /api/seasonal_recommendations        │
//! │ calendar                 │ India   │ Season Resolver                      │
//! │ categories               │ India   │ Seasonal tag derivation              │
//! └──────────────────────────┴─────────┴──────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};
use crate::season::{Season, SeasonCalendar, SeasonalCategories};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryPolicy {
    pub low_stock_threshold: i64,
    pub expiry_warning_days: i64,
    pub restock_threshold: i64,
    pub max_recommendations: usize,
    pub api_recommendation_limit: usize,
    pub calendar: SeasonCalendar,
    pub categories: SeasonalCategories,
}

impl Default for InventoryPolicy {
    fn default() -> Self {
        InventoryPolicy {
            low_stock_threshold: 10,
            expiry_warning_days: 30,
            restock_threshold: 50,
            max_recommendations: 10,
            api_recommendation_limit: 20,
            calendar: SeasonCalendar::default(),
            categories: SeasonalCategories::default(),
        }
    }
}

impl InventoryPolicy {
    #[inline]
    pub fn season_for(&self, today: NaiveDate) -> Season {
        self.calendar.season_for_date(today)
    }

    #[inline]
    pub fn tag_for_category(&self, category: &str) -> Option<Season> {
        self.categories.tag_for_category(category)
    }

    /// Rejects nonsensical values loaded from configuration.
    pub fn validate(&self) -> ValidationResult<()> {
        let positive = |field: &str, value: i64| {
            if value > 0 {
                Ok(())
            } else {
                Err(ValidationError::MustBePositive {
                    field: field.to_string(),
                })
            }
        };

        positive("low_stock_threshold", self.low_stock_threshold)?;
        positive("restock_threshold", self.restock_threshold)?;
        positive("max_recommendations", self.max_recommendations as i64)?;
        positive("api_recommendation_limit", self.api_recommendation_limit as i64)?;

        if self.expiry_warning_days < 0 {
            return Err(ValidationError::OutOfRange {
                field: "expiry_warning_days".to_string(),
                min: 0,
                max: i64::from(i32::MAX),
            });
        }

        if self.categories.entries().is_empty() {
            return Err(ValidationError::Required {
                field: "categories".to_string(),
            });
        }

        Ok(())
    }
}
