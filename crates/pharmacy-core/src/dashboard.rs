//! # Dashboard Aggregator
//!
//! Summary statistics for the landing page, computed from a snapshot of the
//! catalog and the sales recorded so far.
//!
//! ## Data Flow
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │  medicines   │    │    sales     │    │ today/policy │
//! └──────┬───────┘    └──────┬───────┘    └──────┬───────┘
//!        │                   │                   │
//!        └───────────────────┼───────────────────┘
//!                            ▼
//!                ┌───────────────────────┐
//!                │ DashboardStats::compute│  (pure, no clock, no I/O)
//!                └───────────┬───────────┘
//!                            ▼
//!   total_stock · sales_today · low_stock · expiring_soon ·
//!   seasonal_recommendations · current_season · counts
//! ```
//!
//! Every output is computed independently, so one empty list never hides
//! another. The caller decides what "today" is, which keeps the function
//! deterministic in tests.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::policy::InventoryPolicy;
use crate::season::Season;
use crate::types::{Medicine, Sale};

/// Everything the dashboard shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardStats {
    /// Sum of stock across all medicines.
    pub total_stock: i64,
    /// Revenue from sales dated today (UTC).
    pub sales_today: Money,
    pub low_stock: Vec<Medicine>,
    pub expiring_soon: Vec<Medicine>,
    pub seasonal_recommendations: Vec<Medicine>,
    pub current_season: Season,
    pub low_stock_count: usize,
    pub expiring_count: usize,
    /// Medicines already past expiry. Informational only; they are not part
    /// of `expiring_soon`.
    pub expired_count: usize,
}

impl DashboardStats {
    /// Computes the dashboard for `today`.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::NaiveDate;
    /// use pharmacy_core::dashboard::DashboardStats;
    /// use pharmacy_core::policy::InventoryPolicy;
    /// use pharmacy_core::season::Season;
    ///
    /// let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    /// let stats = DashboardStats::compute(&[], &[], today, &InventoryPolicy::default());
    ///
    /// assert_eq!(stats.total_stock, 0);
    /// assert!(stats.sales_today.is_zero());
    /// assert_eq!(stats.current_season, Season::Winter);
    /// ```
    pub fn compute<'a, S>(
        medicines: &[Medicine],
        sales: S,
        today: NaiveDate,
        policy: &InventoryPolicy,
    ) -> Self
    where
        S: IntoIterator<Item = &'a Sale>,
    {
        let current_season = policy.season_for(today);

        let total_stock = medicines.iter().map(|m| m.stock_quantity).sum();

        let sales_today = sales
            .into_iter()
            .filter(|s| s.sale_date.date_naive() == today)
            .map(Sale::total_amount)
            .fold(Money::zero(), |acc, amount| acc.saturating_add(amount));

        let low_stock: Vec<Medicine> = medicines
            .iter()
            .filter(|m| m.is_low_stock(policy.low_stock_threshold))
            .cloned()
            .collect();

        let expiring_soon: Vec<Medicine> = medicines
            .iter()
            .filter(|m| m.is_expiring_soon(today, policy.expiry_warning_days))
            .cloned()
            .collect();

        let expired_count = medicines.iter().filter(|m| m.is_expired(today)).count();

        let seasonal_recommendations = medicines
            .iter()
            .filter(|m| {
                m.seasonal_tag == Some(current_season)
                    && m.stock_quantity < policy.restock_threshold
            })
            .take(policy.max_recommendations)
            .cloned()
            .collect();

        DashboardStats {
            total_stock,
            sales_today,
            low_stock_count: low_stock.len(),
            expiring_count: expiring_soon.len(),
            low_stock,
            expiring_soon,
            seasonal_recommendations,
            current_season,
            expired_count,
        }
    }
}

/// Medicines tagged with `season`, whatever their stock, first `limit` only.
///
/// Backs the seasonal recommendations API, which lists the whole seasonal
/// range rather than just what needs restocking.
pub fn seasonal_catalog(medicines: &[Medicine], season: Season, limit: usize) -> Vec<Medicine> {
    medicines
        .iter()
        .filter(|m| m.seasonal_tag == Some(season))
        .take(limit)
        .cloned()
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn medicine(id: i64, stock: i64, expiry: NaiveDate, tag: Option<Season>) -> Medicine {
        let mut m = Medicine::sample(id, &format!("Medicine {}", id));
        m.stock_quantity = stock;
        m.expiry_date = expiry;
        m.seasonal_tag = tag;
        m
    }

    fn sale(id: i64, paise: i64, y: i32, mo: u32, d: u32, h: u32) -> Sale {
        let at = Utc.with_ymd_and_hms(y, mo, d, h, 0, 0).unwrap();
        Sale {
            id,
            medicine_id: 1,
            quantity_sold: 1,
            total_paise: paise,
            sale_date: at,
            invoice_number: format!("INV-{}", id),
            created_at: at,
        }
    }

    #[test]
    fn test_empty_catalog() {
        let stats =
            DashboardStats::compute(&[], &[], date(2024, 7, 1), &InventoryPolicy::default());
        assert_eq!(stats.total_stock, 0);
        assert_eq!(stats.sales_today, Money::zero());
        assert!(stats.low_stock.is_empty());
        assert!(stats.expiring_soon.is_empty());
        assert!(stats.seasonal_recommendations.is_empty());
        assert_eq!(stats.current_season, Season::Monsoon);
        assert_eq!(stats.expired_count, 0);
    }

    #[test]
    fn test_total_stock_and_low_stock() {
        let far = date(2030, 1, 1);
        let meds = vec![
            medicine(1, 5, far, None),
            medicine(2, 10, far, None),
            medicine(3, 0, far, None),
        ];
        let stats =
            DashboardStats::compute(&meds, &[], date(2024, 1, 1), &InventoryPolicy::default());

        assert_eq!(stats.total_stock, 15);
        let low: Vec<i64> = stats.low_stock.iter().map(|m| m.id).collect();
        assert_eq!(low, vec![1, 3]);
        assert_eq!(stats.low_stock_count, 2);
    }

    #[test]
    fn test_sales_today_only_counts_today() {
        let sales = vec![
            sale(1, 1050, 2024, 3, 10, 0),
            sale(2, 2025, 2024, 3, 10, 23),
            sale(3, 99999, 2024, 3, 9, 23),
            sale(4, 77777, 2024, 3, 11, 0),
        ];
        let stats =
            DashboardStats::compute(&[], &sales, date(2024, 3, 10), &InventoryPolicy::default());
        assert_eq!(stats.sales_today.to_string(), "30.75");
    }

    #[test]
    fn test_sales_today_saturates() {
        let sales = vec![
            sale(1, i64::MAX, 2024, 3, 10, 9),
            sale(2, 100, 2024, 3, 10, 10),
        ];
        let stats =
            DashboardStats::compute(&[], &sales, date(2024, 3, 10), &InventoryPolicy::default());
        assert_eq!(stats.sales_today, Money::from_minor(i64::MAX));
    }

    #[test]
    fn test_expiring_soon_excludes_expired() {
        let today = date(2024, 6, 1);
        let meds = vec![
            medicine(1, 100, today, None),
            medicine(2, 100, date(2024, 7, 1), None),  // 30 days
            medicine(3, 100, date(2024, 7, 2), None),  // 31 days
            medicine(4, 100, date(2024, 5, 31), None), // expired yesterday
        ];
        let stats = DashboardStats::compute(&meds, &[], today, &InventoryPolicy::default());

        let ids: Vec<i64> = stats.expiring_soon.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(stats.expiring_count, 2);
        assert_eq!(stats.expired_count, 1);
    }

    #[test]
    fn test_seasonal_recommendations_filter_and_cap() {
        let today = date(2024, 12, 1); // Winter
        let far = date(2030, 1, 1);
        let mut meds = vec![
            medicine(100, 49, far, Some(Season::Winter)),
            medicine(101, 50, far, Some(Season::Winter)),
            medicine(102, 5, far, Some(Season::Summer)),
            medicine(103, 5, far, None),
        ];
        for id in 0..15 {
            meds.push(medicine(id, 1, far, Some(Season::Winter)));
        }

        let stats = DashboardStats::compute(&meds, &[], today, &InventoryPolicy::default());
        let recs = &stats.seasonal_recommendations;

        assert_eq!(recs.len(), 10);
        assert_eq!(recs[0].id, 100);
        assert!(recs.iter().all(|m| m.stock_quantity < 50));
        assert!(recs.iter().all(|m| m.seasonal_tag == Some(Season::Winter)));
    }

    #[test]
    fn test_policy_thresholds_are_respected() {
        let far = date(2030, 1, 1);
        let meds = vec![medicine(1, 7, far, None)];
        let policy = InventoryPolicy {
            low_stock_threshold: 5,
            ..Default::default()
        };
        let stats = DashboardStats::compute(&meds, &[], date(2024, 1, 1), &policy);
        assert!(stats.low_stock.is_empty());
    }

    #[test]
    fn test_seasonal_catalog_ignores_stock() {
        let far = date(2030, 1, 1);
        let mut meds = vec![medicine(1, 500, far, Some(Season::Spring))];
        for id in 2..30 {
            meds.push(medicine(id, 1, far, Some(Season::Spring)));
        }
        meds.push(medicine(99, 1, far, Some(Season::Summer)));

        let catalog = seasonal_catalog(&meds, Season::Spring, 20);
        assert_eq!(catalog.len(), 20);
        assert_eq!(catalog[0].id, 1);
        assert!(catalog.iter().all(|m| m.seasonal_tag == Some(Season::Spring)));
    }
}
