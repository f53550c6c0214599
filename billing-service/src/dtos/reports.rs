use crate::models::{Product, ReportType};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Query parameters for the sales report. Both bounds are inclusive dates;
/// a missing `to` means the same day as `from`, a missing `from` disables
/// filtering.
#[derive(Debug, Default, Deserialize)]
pub struct SalesReportParams {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct NarrativeReportRequest {
    pub report_type: ReportType,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NarrativeReportResponse {
    pub report: String,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub todays_sales: Decimal,
    pub invoices_today: u64,
    pub total_products: usize,
    pub total_customers: usize,
    pub low_stock_products: Vec<Product>,
}
