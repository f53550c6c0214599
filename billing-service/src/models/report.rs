//! Sales report model: date ranges, per-product summaries, report periods.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Inclusive date range for report filtering. An absent `from` means no
/// filtering at all; an absent `to` means the same calendar day as `from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReportRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl ReportRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    /// UTC timestamp bounds covering both boundary dates in full:
    /// 00:00:00.000 on `from` through 23:59:59.999 on `to`. `None` when no
    /// `from` was supplied (fail open, include everything).
    pub fn bounds(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let from = self.from?;
        let to = self.to.unwrap_or(from);
        let start = from
            .and_hms_opt(0, 0, 0)
            .expect("midnight is a valid time")
            .and_utc();
        let end = to
            .and_hms_milli_opt(23, 59, 59, 999)
            .expect("end of day is a valid time")
            .and_utc();
        Some((start, end))
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        match self.bounds() {
            Some((start, end)) => instant >= start && instant <= end,
            None => true,
        }
    }
}

/// Aggregation row: everything a product sold across the filtered invoices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub product_id: String,
    pub product_name: String,
    pub total_boxes: u64,
    pub total_pieces: u64,
    pub total_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportData {
    pub date_range: ReportRange,
    pub product_summary: Vec<ProductSummary>,
    pub grand_total: Decimal,
    pub total_invoices: u64,
}

/// Period selector for the narrative sales report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    Day,
    Week,
    Month,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Day => "day",
            ReportType::Week => "week",
            ReportType::Month => "month",
        }
    }
}
