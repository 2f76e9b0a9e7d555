//! # Season Resolver
//!
//! Maps calendar months to seasons and medicine categories to the season in
//! which demand for them peaks.
//!
//! ## Default Tables (India)
//! ```text
//! ┌──────────┬──────────────────────────────┬──────────────────────────────────────┐
//! │ Season   │ Months                       │ Categories                           │
//! ├──────────┼──────────────────────────────┼──────────────────────────────────────┤
//! │ Winter   │ Jan, Feb, Nov, Dec           │ Cough Syrup, Cold Relief, Throat     │
//! │          │                              │ Lozenges, Decongestant, Vitamin C    │
//! │ Monsoon  │ Jul, Aug, Sep                │ Antifungal, Antibiotic, Antiseptic,  │
//! │          │                              │ Anti-diarrheal, Mosquito Repellent   │
//! │ Summer   │ May, Jun                     │ Antacid, Oral Rehydration, Sunscreen,│
//! │          │                              │ Antihistamine, Heat Rash Cream       │
//! │ Spring   │ Mar, Apr, Oct                │ Antihistamine, Allergy Relief, Eye   │
//! │          │                              │ Drops, Nasal Spray                   │
//! └──────────┴──────────────────────────────┴──────────────────────────────────────┘
//! ```
//!
//! Category lookup walks the table top to bottom and stops at the first hit,
//! so "Antihistamine" is a Summer medicine even though Spring lists it too.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Season
// =============================================================================

/// One of the four retail seasons. Stored and serialized by name ("Winter").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[ts(export)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Monsoon,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Monsoon];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Monsoon => "Monsoon",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Season {
    type Err = ValidationError;

    /// Case-insensitive. Used for rows and config values written by hand.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Season::ALL
            .into_iter()
            .find(|season| season.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "season".to_string(),
                reason: format!("unknown season '{}'", s),
            })
    }
}

// =============================================================================
// Season Calendar
// =============================================================================

/// Month → season lookup table, indexed by month number (1 = January).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Season>", into = "Vec<Season>")]
pub struct SeasonCalendar([Season; 12]);

impl SeasonCalendar {
    /// Returned for any month outside 1..=12.
    pub const FALLBACK: Season = Season::Winter;

    pub const fn new(months: [Season; 12]) -> Self {
        SeasonCalendar(months)
    }

    /// Total lookup: never fails, out-of-range months resolve to `FALLBACK`.
    ///
    /// ```rust
    /// use pharmacy_core::season::{Season, SeasonCalendar};
    ///
    /// let calendar = SeasonCalendar::default();
    /// assert_eq!(calendar.season_for_month(7), Season::Monsoon);
    /// assert_eq!(calendar.season_for_month(13), Season::Winter);
    /// ```
    pub fn season_for_month(&self, month: u32) -> Season {
        match month {
            1..=12 => self.0[(month - 1) as usize],
            _ => Self::FALLBACK,
        }
    }

    pub fn season_for_date(&self, date: NaiveDate) -> Season {
        self.season_for_month(date.month())
    }

    pub fn months(&self) -> &[Season; 12] {
        &self.0
    }
}

impl Default for SeasonCalendar {
    fn default() -> Self {
        use Season::*;
        SeasonCalendar([
            Winter, Winter, // Jan, Feb
            Spring, Spring, // Mar, Apr
            Summer, Summer, // May, Jun
            Monsoon, Monsoon, Monsoon, // Jul-Sep
            Spring,  // Oct
            Winter, Winter, // Nov, Dec
        ])
    }
}

impl TryFrom<Vec<Season>> for SeasonCalendar {
    type Error = ValidationError;

    fn try_from(months: Vec<Season>) -> Result<Self, Self::Error> {
        let len = months.len() as i64;
        let months: [Season; 12] = months.try_into().map_err(|_| ValidationError::OutOfRange {
            field: format!("season calendar ({} entries)", len),
            min: 12,
            max: 12,
        })?;
        Ok(SeasonCalendar(months))
    }
}

impl From<SeasonCalendar> for Vec<Season> {
    fn from(calendar: SeasonCalendar) -> Self {
        calendar.0.to_vec()
    }
}

// =============================================================================
// Seasonal Categories
// =============================================================================

/// A season together with the categories that peak in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonCategories {
    pub season: Season,
    pub categories: Vec<String>,
}

/// Ordered season → categories table. Order decides ties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeasonalCategories(Vec<SeasonCategories>);

impl SeasonalCategories {
    pub fn new(entries: Vec<SeasonCategories>) -> Self {
        SeasonalCategories(entries)
    }

    /// First season (in table order) listing `category` exactly.
    ///
    /// ```rust
    /// use pharmacy_core::season::{Season, SeasonalCategories};
    ///
    /// let table = SeasonalCategories::default();
    /// assert_eq!(table.tag_for_category("Cough Syrup"), Some(Season::Winter));
    /// assert_eq!(table.tag_for_category("Antihistamine"), Some(Season::Summer));
    /// assert_eq!(table.tag_for_category("Pain Relief"), None);
    /// ```
    pub fn tag_for_category(&self, category: &str) -> Option<Season> {
        self.0
            .iter()
            .find(|entry| entry.categories.iter().any(|c| c == category))
            .map(|entry| entry.season)
    }

    /// Every category across all seasons, sorted and de-duplicated.
    pub fn all_categories(&self) -> Vec<String> {
        let mut all: Vec<String> = self
            .0
            .iter()
            .flat_map(|entry| entry.categories.iter().cloned())
            .collect();
        all.sort();
        all.dedup();
        all
    }

    pub fn entries(&self) -> &[SeasonCategories] {
        &self.0
    }
}

impl Default for SeasonalCategories {
    fn default() -> Self {
        let entry = |season, names: &[&str]| SeasonCategories {
            season,
            categories: names.iter().map(|n| n.to_string()).collect(),
        };

        SeasonalCategories(vec![
            entry(
                Season::Winter,
                &["Cough Syrup", "Cold Relief", "Throat Lozenges", "Decongestant", "Vitamin C"],
            ),
            entry(
                Season::Monsoon,
                &["Antifungal", "Antibiotic", "Antiseptic", "Anti-diarrheal", "Mosquito Repellent"],
            ),
            entry(
                Season::Summer,
                &["Antacid", "Oral Rehydration", "Sunscreen", "Antihistamine", "Heat Rash Cream"],
            ),
            entry(
                Season::Spring,
                &["Antihistamine", "Allergy Relief", "Eye Drops", "Nasal Spray"],
            ),
        ])
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
