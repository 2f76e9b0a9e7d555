//! # Billing
//!
//! The pure half of invoice generation: parsing and validating the cart,
//! tracking stock seen during one billing pass, and building the invoice.
//! The database half (transaction, guarded stock update, sale rows) lives in
//! `pharmacy_db::repository::billing`.
//!
//! ## Billing Pass
//! ```text
//! cart_data (JSON) ──► Cart::parse_json ──► Cart::validate
//!                                               │
//!            ┌──────────────────────────────────┘
//!            ▼  for each line, in cart order
//!   ┌──────────────────┐   first time?   ┌────────────────────────┐
//!   │   StockLedger    │ ──────────────► │ load medicine (in tx)  │
//!   │  id → remaining  │ ◄────────────── │ MedicineNotFound if no │
//!   └────────┬─────────┘     track()     └────────────────────────┘
//!            │ reserve(id, qty)
//!            │   InsufficientStock if qty > remaining
//!            ▼
//!   InvoiceLine::new(medicine, qty) ──► Invoice::new(number, now, lines)
//! ```
//!
//! The ledger is what makes repeated ids cumulative: `[A×5, A×6]` against a
//! stock of 10 fails on the second line even though each line alone fits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::Medicine;
use crate::MAX_CART_ITEMS;

/// Display format of `Invoice::invoice_date`, e.g. `05-Mar-2024 02:30 PM`.
pub const INVOICE_DATE_FORMAT: &str = "%d-%b-%Y %I:%M %p";

// =============================================================================
// Cart
// =============================================================================

/// One requested line: which medicine and how many.
///
/// Both fields accept a JSON number or a numeric string, since browser forms
/// tend to send `"3"` rather than `3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLine {
    #[serde(deserialize_with = "lenient_i64")]
    #[ts(type = "number | string")]
    pub medicine_id: i64,
    #[serde(deserialize_with = "lenient_i64")]
    #[ts(type = "number | string")]
    pub quantity: i64,
}

/// Ordered list of cart lines. Order is preserved through to the invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    pub lines: Vec<CartLine>,
}

impl Cart {
    pub fn new(lines: Vec<CartLine>) -> Self {
        Cart { lines }
    }

    /// Parses the `cart_data` form field.
    ///
    /// ## Errors
    /// - `EmptyCart` when the payload is missing, blank, or `[]`
    /// - `Validation` when the payload is not a list of cart lines
    ///
    /// ```rust
    /// use pharmacy_core::billing::Cart;
    /// use pharmacy_core::error::CoreError;
    ///
    /// let cart = Cart::parse_json(Some(r#"[{"medicine_id": "4", "quantity": 2}]"#)).unwrap();
    /// assert_eq!(cart.lines[0].medicine_id, 4);
    ///
    /// assert!(matches!(Cart::parse_json(None), Err(CoreError::EmptyCart)));
    /// assert!(matches!(Cart::parse_json(Some("[]")), Err(CoreError::EmptyCart)));
    /// ```
    pub fn parse_json(raw: Option<&str>) -> CoreResult<Cart> {
        let raw = match raw.map(str::trim) {
            Some(s) if !s.is_empty() => s,
            _ => return Err(CoreError::EmptyCart),
        };

        let cart: Cart = serde_json::from_str(raw).map_err(|e| ValidationError::InvalidFormat {
            field: "cart_data".to_string(),
            reason: e.to_string(),
        })?;

        if cart.lines.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        Ok(cart)
    }

    /// Checks size and quantity limits before any stock is touched.
    pub fn validate(&self) -> CoreResult<()> {
        if self.lines.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        if self.lines.len() > MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        for line in &self.lines {
            crate::validation::validate_quantity(line.quantity)?;
        }

        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Int(i64),
        Float(f64),
        Str(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Int(n) => Ok(n),
        NumberOrString::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
        NumberOrString::Float(f) => Err(serde::de::Error::custom(format!(
            "expected a whole number, got {}",
            f
        ))),
        NumberOrString::Str(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("expected a whole number, got '{}'", s))),
    }
}

// =============================================================================
// Stock Ledger
// =============================================================================

#[derive(Debug, Clone)]
struct LedgerEntry {
    medicine: Medicine,
    remaining: i64,
}

/// Stock as seen so far in one billing pass.
///
/// Each medicine is tracked once, with its stock at the moment it was first
/// loaded. Every reservation is subtracted from that view.
#[derive(Debug, Clone, Default)]
pub struct StockLedger {
    entries: HashMap<i64, LedgerEntry>,
}

impl StockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts tracking a medicine. A medicine that is already tracked keeps
    /// its in-pass view.
    pub fn track(&mut self, medicine: Medicine) -> &Medicine {
        &self
            .entries
            .entry(medicine.id)
            .or_insert_with(|| LedgerEntry {
                remaining: medicine.stock_quantity,
                medicine,
            })
            .medicine
    }

    pub fn get(&self, medicine_id: i64) -> Option<&Medicine> {
        self.entries.get(&medicine_id).map(|e| &e.medicine)
    }

    pub fn remaining(&self, medicine_id: i64) -> Option<i64> {
        self.entries.get(&medicine_id).map(|e| e.remaining)
    }

    /// Takes `quantity` out of the in-pass stock.
    ///
    /// ## Errors
    /// - `MedicineNotFound` if the medicine was never tracked
    /// - `InsufficientStock` if `quantity` exceeds what is left; the ledger
    ///   is unchanged in that case
    pub fn reserve(&mut self, medicine_id: i64, quantity: i64) -> CoreResult<&Medicine> {
        let entry = self
            .entries
            .get_mut(&medicine_id)
            .ok_or(CoreError::MedicineNotFound(medicine_id))?;

        if quantity > entry.remaining {
            return Err(CoreError::InsufficientStock {
                name: entry.medicine.name.clone(),
                available: entry.remaining,
                requested: quantity,
            });
        }

        entry.remaining -= quantity;
        Ok(&entry.medicine)
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// One priced line of an invoice. Name and price are frozen at billing time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceLine {
    pub medicine_id: i64,
    pub name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub line_total: Money,
}

impl InvoiceLine {
    /// Prices `quantity` units. Fails with `Overflow` if the total does not fit.
    pub fn new(medicine: &Medicine, quantity: i64) -> CoreResult<Self> {
        let unit_price = medicine.price();
        let line_total =
            unit_price
                .multiply_quantity(quantity)
                .ok_or_else(|| ValidationError::Overflow {
                    field: "line_total".to_string(),
                })?;

        Ok(InvoiceLine {
            medicine_id: medicine.id,
            name: medicine.name.clone(),
            quantity,
            unit_price,
            line_total,
        })
    }
}

/// The result of a successful billing pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Invoice {
    pub invoice_number: String,
    /// Human readable, see `INVOICE_DATE_FORMAT`.
    pub invoice_date: String,
    #[ts(as = "String")]
    pub issued_at: DateTime<Utc>,
    pub lines: Vec<InvoiceLine>,
    pub total: Money,
    /// Sum of quantities across all lines.
    pub item_count: i64,
}

impl Invoice {
    pub fn new(
        invoice_number: String,
        issued_at: DateTime<Utc>,
        lines: Vec<InvoiceLine>,
    ) -> CoreResult<Self> {
        let total = lines
            .iter()
            .try_fold(Money::zero(), |acc, l| acc.checked_add(l.line_total))
            .ok_or_else(|| ValidationError::Overflow {
                field: "total".to_string(),
            })?;
        let item_count = lines.iter().map(|l| l.quantity).sum();

        Ok(Invoice {
            invoice_number,
            invoice_date: format_invoice_date(issued_at),
            issued_at,
            lines,
            total,
            item_count,
        })
    }
}

/// Generates an invoice number: `INV-<YYYYMMDDHHMMSS>-<8 hex chars>`.
///
/// The timestamp keeps numbers sortable; the random suffix keeps two invoices
/// issued in the same second apart.
///
/// ```rust
/// use chrono::Utc;
/// use pharmacy_core::billing::generate_invoice_number;
///
/// let now = Utc::now();
/// assert_ne!(generate_invoice_number(now), generate_invoice_number(now));
/// ```
pub fn generate_invoice_number(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("INV-{}-{}", now.format("%Y%m%d%H%M%S"), &suffix[..8])
}

pub fn format_invoice_date(at: DateTime<Utc>) -> String {
    at.format(INVOICE_DATE_FORMAT).to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn medicine(id: i64, name: &str, price_paise: i64, stock: i64) -> Medicine {
        let mut m = Medicine::sample(id, name);
        m.price_paise = price_paise;
        m.stock_quantity = stock;
        m
    }

    #[test]
    fn test_parse_accepts_numbers_and_strings() {
        let cart = Cart::parse_json(Some(
            r#"[{"medicine_id": 1, "quantity": "2"}, {"medicine_id": "7", "quantity": 3.0}]"#,
        ))
        .unwrap();

        assert_eq!(
            cart.lines,
            vec![
                CartLine { medicine_id: 1, quantity: 2 },
                CartLine { medicine_id: 7, quantity: 3 },
            ]
        );
    }

    #[test]
    fn test_cart_line_binding_accepts_strings() {
        let decl = CartLine::decl();
        assert!(decl.contains("medicine_id: number | string"), "{decl}");
        assert!(decl.contains("quantity: number | string"), "{decl}");
    }

    #[test]
    fn test_parse_empty_payloads() {
        assert!(matches!(Cart::parse_json(None), Err(CoreError::EmptyCart)));
        assert!(matches!(Cart::parse_json(Some("   ")), Err(CoreError::EmptyCart)));
        assert!(matches!(Cart::parse_json(Some("[]")), Err(CoreError::EmptyCart)));
    }

    #[test]
    fn test_parse_malformed_payloads() {
        for raw in [
            "not json",
            r#"{"medicine_id": 1}"#,
            r#"[{"medicine_id": "abc", "quantity": 1}]"#,
            r#"[{"medicine_id": 1, "quantity": 1.5}]"#,
            r#"[{"quantity": 1}]"#,
        ] {
            assert!(
                matches!(Cart::parse_json(Some(raw)), Err(CoreError::Validation(_))),
                "expected validation error for {}",
                raw
            );
        }
    }

    #[test]
    fn test_validate_quantities() {
        let ok = Cart::new(vec![CartLine { medicine_id: 1, quantity: 999 }]);
        assert!(ok.validate().is_ok());

        for qty in [0, -1, 1000] {
            let cart = Cart::new(vec![CartLine { medicine_id: 1, quantity: qty }]);
            assert!(matches!(cart.validate(), Err(CoreError::Validation(_))));
        }
    }

    #[test]
    fn test_validate_cart_size() {
        let lines = vec![CartLine { medicine_id: 1, quantity: 1 }; MAX_CART_ITEMS + 1];
        assert!(matches!(
            Cart::new(lines).validate(),
            Err(CoreError::CartTooLarge { max: MAX_CART_ITEMS })
        ));
        assert!(matches!(Cart::default().validate(), Err(CoreError::EmptyCart)));
    }

    #[test]
    fn test_ledger_is_cumulative() {
        let mut ledger = StockLedger::new();
        ledger.track(medicine(1, "Paracetamol 500mg", 1000, 10));

        assert!(ledger.reserve(1, 5).is_ok());
        assert_eq!(ledger.remaining(1), Some(5));

        match ledger.reserve(1, 6) {
            Err(CoreError::InsufficientStock { name, available, requested }) => {
                assert_eq!(name, "Paracetamol 500mg");
                assert_eq!(available, 5);
                assert_eq!(requested, 6);
            }
            other => panic!("expected InsufficientStock, got {:?}", other),
        }
        assert_eq!(ledger.remaining(1), Some(5));
    }

    #[test]
    fn test_ledger_track_keeps_first_view() {
        let mut ledger = StockLedger::new();
        ledger.track(medicine(1, "Cetirizine 10mg", 500, 4));
        ledger.reserve(1, 3).unwrap();
        ledger.track(medicine(1, "Cetirizine 10mg", 500, 4));
        assert_eq!(ledger.remaining(1), Some(1));
    }

    #[test]
    fn test_ledger_unknown_medicine() {
        let mut ledger = StockLedger::new();
        assert!(matches!(
            ledger.reserve(42, 1),
            Err(CoreError::MedicineNotFound(42))
        ));
    }

    #[test]
    fn test_invoice_totals() {
        let a = medicine(1, "A", 10000, 10);
        let b = medicine(2, "B", 1250, 10);
        let issued_at = Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap();

        let invoice = Invoice::new(
            "INV-TEST".to_string(),
            issued_at,
            vec![InvoiceLine::new(&a, 2).unwrap(), InvoiceLine::new(&b, 3).unwrap()],
        )
        .unwrap();

        assert_eq!(invoice.lines[0].line_total.to_string(), "200.00");
        assert_eq!(invoice.lines[1].line_total.to_string(), "37.50");
        assert_eq!(invoice.total.to_string(), "237.50");
        assert_eq!(invoice.item_count, 5);
        assert_eq!(invoice.invoice_date, "05-Mar-2024 02:30 PM");
    }

    #[test]
    fn test_line_total_overflow_is_an_error() {
        let pricey = medicine(1, "Pricey", i64::MAX / 2 + 1, 10);
        assert!(matches!(
            InvoiceLine::new(&pricey, 2),
            Err(CoreError::Validation(ValidationError::Overflow { .. }))
        ));

        let half = medicine(2, "Half", i64::MAX / 2, 10);
        let lines = vec![
            InvoiceLine::new(&half, 1).unwrap(),
            InvoiceLine::new(&half, 1).unwrap(),
            InvoiceLine::new(&half, 1).unwrap(),
        ];
        let issued_at = Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap();
        assert!(matches!(
            Invoice::new("INV-TEST".to_string(), issued_at, lines),
            Err(CoreError::Validation(ValidationError::Overflow { .. }))
        ));
    }

    #[test]
    fn test_invoice_number_format_and_uniqueness() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 59).unwrap();
        let first = generate_invoice_number(now);
        let second = generate_invoice_number(now);

        assert!(first.starts_with("INV-20240305143059-"));
        assert_eq!(first.len(), "INV-20240305143059-".len() + 8);
        assert_ne!(first, second);
    }
}
