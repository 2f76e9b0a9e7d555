//! # Response Shapes
//!
//! JSON bodies returned by the handlers. Domain types stay in integer paise
//! and `chrono` types; this module renders them for clients:
//!
//! | Domain                  | JSON                         |
//! |-------------------------|------------------------------|
//! | `Money`                 | `"12.50"`                    |
//! | `NaiveDate` (expiry)    | `"2025-03-31"`               |
//! | `DateTime<Utc>`         | `"2025-03-31 14:05:09"`      |
//! | `Option<Season>`        | `"Winter"` or `null`         |

use pharmacy_core::billing::{Invoice, InvoiceLine};
use pharmacy_core::validation::DATE_FORMAT;
use pharmacy_core::{DashboardStats, Medicine, SaleRecord, Season, Supplier};
use serde::Serialize;

use crate::config::StoreConfig;

/// Timestamp format used in every response.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Serialize)]
pub struct MedicineDto {
    pub id: i64,
    pub name: String,
    pub manufacturer: String,
    pub category: String,
    pub price: String,
    pub stock_quantity: i64,
    pub expiry_date: String,
    pub seasonal_tag: Option<Season>,
    pub created_at: String,
}

impl From<&Medicine> for MedicineDto {
    fn from(m: &Medicine) -> Self {
        MedicineDto {
            id: m.id,
            name: m.name.clone(),
            manufacturer: m.manufacturer.clone(),
            category: m.category.clone(),
            price: m.price().to_string(),
            stock_quantity: m.stock_quantity,
            expiry_date: m.expiry_date.format(DATE_FORMAT).to_string(),
            seasonal_tag: m.seasonal_tag,
            created_at: m.created_at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

impl From<Medicine> for MedicineDto {
    fn from(m: Medicine) -> Self {
        MedicineDto::from(&m)
    }
}

pub fn medicines(list: &[Medicine]) -> Vec<MedicineDto> {
    list.iter().map(MedicineDto::from).collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardDto {
    pub store_name: String,
    pub today: String,
    pub current_season: Season,
    pub total_stock: i64,
    pub sales_today: String,
    /// `sales_today` with the currency symbol and thousands separators.
    pub sales_today_display: String,
    pub low_stock: Vec<MedicineDto>,
    pub low_stock_count: usize,
    pub expiring_soon: Vec<MedicineDto>,
    pub expiring_count: usize,
    pub expired_count: usize,
    pub seasonal_recommendations: Vec<MedicineDto>,
}

impl DashboardDto {
    pub fn new(stats: &DashboardStats, today: chrono::NaiveDate, store: &StoreConfig) -> Self {
        DashboardDto {
            store_name: store.name.clone(),
            today: today.format(DATE_FORMAT).to_string(),
            current_season: stats.current_season,
            total_stock: stats.total_stock,
            sales_today: stats.sales_today.to_string(),
            sales_today_display: stats.sales_today.format_with_symbol(&store.currency_symbol),
            low_stock: medicines(&stats.low_stock),
            low_stock_count: stats.low_stock_count,
            expiring_soon: medicines(&stats.expiring_soon),
            expiring_count: stats.expiring_count,
            expired_count: stats.expired_count,
            seasonal_recommendations: medicines(&stats.seasonal_recommendations),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceLineDto {
    pub medicine_id: i64,
    pub name: String,
    pub quantity: i64,
    pub price: String,
    pub total: String,
}

impl From<&InvoiceLine> for InvoiceLineDto {
    fn from(line: &InvoiceLine) -> Self {
        InvoiceLineDto {
            medicine_id: line.medicine_id,
            name: line.name.clone(),
            quantity: line.quantity,
            price: line.unit_price.to_string(),
            total: line.line_total.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceDto {
    pub store_name: String,
    pub invoice_number: String,
    pub invoice_date: String,
    pub items: Vec<InvoiceLineDto>,
    pub item_count: i64,
    pub total: String,
    pub total_display: String,
}

impl InvoiceDto {
    pub fn new(invoice: &Invoice, store: &StoreConfig) -> Self {
        InvoiceDto {
            store_name: store.name.clone(),
            invoice_number: invoice.invoice_number.clone(),
            invoice_date: invoice.invoice_date.clone(),
            items: invoice.lines.iter().map(InvoiceLineDto::from).collect(),
            item_count: invoice.item_count,
            total: invoice.total.to_string(),
            total_display: invoice.total.format_with_symbol(&store.currency_symbol),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SaleDto {
    pub id: i64,
    pub medicine_id: i64,
    pub medicine_name: String,
    pub quantity_sold: i64,
    pub total_amount: String,
    pub sale_date: String,
    pub invoice_number: String,
}

impl From<&SaleRecord> for SaleDto {
    fn from(record: &SaleRecord) -> Self {
        let sale = &record.sale;
        SaleDto {
            id: sale.id,
            medicine_id: sale.medicine_id,
            medicine_name: record.medicine_name.clone(),
            quantity_sold: sale.quantity_sold,
            total_amount: sale.total_amount().to_string(),
            sale_date: sale.sale_date.format(TIMESTAMP_FORMAT).to_string(),
            invoice_number: sale.invoice_number.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SupplierDto {
    pub id: i64,
    pub name: String,
    pub contact: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub created_at: String,
}

impl From<&Supplier> for SupplierDto {
    fn from(s: &Supplier) -> Self {
        SupplierDto {
            id: s.id,
            name: s.name.clone(),
            contact: s.contact.clone(),
            email: s.email.clone(),
            address: s.address.clone(),
            created_at: s.created_at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

/// Options for the add/edit medicine form.
#[derive(Debug, Clone, Serialize)]
pub struct FormOptions {
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeasonalRecommendationsDto {
    pub season: Season,
    pub recommendations: Vec<MedicineDto>,
}

/// Reply for simple state-changing requests.
#[derive(Debug, Clone, Serialize)]
pub struct MessageDto {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn test_medicine_rendering() {
        let mut m = Medicine::sample(3, "Paracetamol 500mg");
        m.price_paise = 1250;
        m.expiry_date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        m.created_at = Utc.with_ymd_and_hms(2024, 7, 9, 8, 5, 0).unwrap();
        m.seasonal_tag = Some(Season::Winter);

        let json = serde_json::to_value(MedicineDto::from(&m)).unwrap();
        assert_eq!(json["price"], "12.50");
        assert_eq!(json["expiry_date"], "2025-03-01");
        assert_eq!(json["created_at"], "2024-07-09 08:05:00");
        assert_eq!(json["seasonal_tag"], "Winter");
    }

    #[test]
    fn test_untagged_medicine_renders_null() {
        let m = Medicine::sample(1, "Metformin");
        let json = serde_json::to_value(MedicineDto::from(m)).unwrap();
        assert!(json["seasonal_tag"].is_null());
    }
}
