//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With floats:                                                           │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Dashboard "sales today" summed over hundreds of float rows drifts     │
//! │  and has to be re-rounded for display.                                 │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units (paise)                             │
//! │    ₹12.50 is stored as 1250. Sums are exact, and "rounded to two      │
//! │    decimal places" is true by construction.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pharmacy_core::money::Money;
//!
//! let price = Money::from_minor(1099); // 10.99
//! let line_total = price.multiply_quantity(3).unwrap();
//! assert_eq!(line_total.minor(), 3297);
//!
//! let parsed = Money::parse_decimal("12.5").unwrap();
//! assert_eq!(parsed.to_string(), "12.50");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

use crate::error::ValidationError;

/// Number of minor units in one major unit (100 paise = 1 rupee).
pub const MINOR_PER_MAJOR: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: Differences (e.g. comparisons in tests) can go negative
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: serde support; serializes as the raw minor-unit integer
///
/// ## Where Money is Used
/// ```text
/// Medicine.price ──► InvoiceLine.unit_price ──► InvoiceLine.line_total
///                                                    │
///                    Sale.total_amount ◄─────────────┤
///                                                    ▼
///                                             Invoice.total
///
/// Sale.total_amount (today) ──► DashboardStats.sales_today
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use pharmacy_core::money::Money;
    ///
    /// let price = Money::from_minor(1099); // Represents 10.99
    /// assert_eq!(price.minor(), 1099);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Creates a Money value from major and minor parts.
    ///
    /// ## Example
    /// ```rust
    /// use pharmacy_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(100, 0).minor(), 10000);
    /// assert_eq!(Money::from_major_minor(-5, 50).minor(), -550);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * MINOR_PER_MAJOR - minor)
        } else {
            Money(major * MINOR_PER_MAJOR + minor)
        }
    }

    /// Parses a non-negative decimal string such as `"12"`, `"12.5"` or `"12.50"`.
    ///
    /// ## Rules
    /// - Digits with at most one `.`
    /// - At most two fractional digits (no silent rounding of prices)
    /// - Negative values and exponents are rejected
    ///
    /// ## Example
    /// ```rust
    /// use pharmacy_core::money::Money;
    ///
    /// assert_eq!(Money::parse_decimal("100").unwrap().minor(), 10000);
    /// assert_eq!(Money::parse_decimal("0.05").unwrap().minor(), 5);
    /// assert!(Money::parse_decimal("-1").is_err());
    /// assert!(Money::parse_decimal("1.234").is_err());
    /// ```
    pub fn parse_decimal(input: &str) -> Result<Money, ValidationError> {
        let raw = input.trim();
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "price".to_string(),
            reason: reason.to_string(),
        };

        if raw.is_empty() {
            return Err(ValidationError::Required {
                field: "price".to_string(),
            });
        }

        let (whole, frac) = match raw.split_once('.') {
            Some((w, f)) => (w, f),
            None => (raw, ""),
        };

        if whole.is_empty() && frac.is_empty() {
            return Err(invalid("must be a number"));
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid("must be a non-negative number"));
        }
        if frac.len() > 2 {
            return Err(invalid("must have at most two decimal places"));
        }

        let major: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid("is too large"))?
        };
        let minor: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid("must be a number"))? * 10,
            _ => frac.parse().map_err(|_| invalid("must be a number"))?,
        };

        major
            .checked_mul(MINOR_PER_MAJOR)
            .and_then(|m| m.checked_add(minor))
            .map(Money)
            .ok_or_else(|| invalid("is too large"))
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / MINOR_PER_MAJOR
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % MINOR_PER_MAJOR).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity, `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use pharmacy_core::money::Money;
    ///
    /// let unit_price = Money::from_minor(10000); // 100.00
    /// assert_eq!(unit_price.multiply_quantity(2).unwrap().minor(), 20000);
    /// assert!(Money::from_minor(i64::MAX / 2 + 1).multiply_quantity(2).is_none());
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(minor) => Some(Money(minor)),
            None => None,
        }
    }

    /// Adds, `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(minor) => Some(Money(minor)),
            None => None,
        }
    }

    /// Adds, clamping at the `i64` bounds.
    #[inline]
    pub const fn saturating_add(&self, other: Money) -> Self {
        Money(self.0.saturating_add(other.0))
    }

    /// Formats with thousands separators and a currency symbol, e.g. `₹1,234.50`.
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let digits = self.major().abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        format!(
            "{}{}{}.{:02}",
            if self.is_negative() { "-" } else { "" },
            symbol,
            grouped,
            self.minor_part()
        )
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal rendering (`12.50`), used for JSON DTOs.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
