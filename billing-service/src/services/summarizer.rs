//! Narrative summary orchestration.
//!
//! Resolves the report period, formats the deterministic sales-data lines,
//! and calls the provider boundary with a single-flight gate and a timeout.
//! Provider failure never touches ledger or report state.

use crate::models::{Invoice, ReportType};
use crate::services::metrics::NARRATIVE_REQUESTS_TOTAL;
use crate::services::providers::{NarrativeProvider, NarrativeRequest};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use service_core::error::AppError;
use std::sync::Arc;

pub struct SummaryService {
    provider: Arc<dyn NarrativeProvider>,
    timeout: std::time::Duration,
    in_flight: tokio::sync::Mutex<()>,
}

impl SummaryService {
    pub fn new(provider: Arc<dyn NarrativeProvider>, timeout: std::time::Duration) -> Self {
        Self {
            provider,
            timeout,
            in_flight: tokio::sync::Mutex::new(()),
        }
    }

    /// Generate the narrative for the period ending at `now`. A second call
    /// while one is outstanding is rejected; an empty period short-circuits
    /// without touching the provider.
    pub async fn generate(
        &self,
        report_type: ReportType,
        invoices: &[Invoice],
        now: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let Ok(_guard) = self.in_flight.try_lock() else {
            NARRATIVE_REQUESTS_TOTAL.with_label_values(&["busy"]).inc();
            return Err(AppError::TooManyRequests(
                "A narrative report is already being generated".to_string(),
                None,
            ));
        };

        let (start, end) = period_bounds(report_type, now);
        let relevant: Vec<&Invoice> = invoices
            .iter()
            .filter(|inv| inv.date >= start && inv.date <= end)
            .collect();

        if relevant.is_empty() {
            NARRATIVE_REQUESTS_TOTAL.with_label_values(&["empty"]).inc();
            return Ok(format!(
                "No sales data found for the selected period ({}).",
                report_type.as_str()
            ));
        }

        let request = NarrativeRequest {
            report_type,
            sales_data: format_sales_data(&relevant),
        };

        match tokio::time::timeout(self.timeout, self.provider.generate(&request)).await {
            Ok(Ok(report)) => {
                NARRATIVE_REQUESTS_TOTAL.with_label_values(&["ok"]).inc();
                Ok(report)
            }
            Ok(Err(e)) => {
                NARRATIVE_REQUESTS_TOTAL.with_label_values(&["error"]).inc();
                tracing::warn!(error = %e, "Narrative provider failed");
                Err(AppError::SummarizerError(e.to_string()))
            }
            Err(_) => {
                NARRATIVE_REQUESTS_TOTAL
                    .with_label_values(&["timeout"])
                    .inc();
                tracing::warn!(timeout = ?self.timeout, "Narrative provider timed out");
                Err(AppError::SummarizerError(
                    "Narrative generation timed out".to_string(),
                ))
            }
        }
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.provider
            .health_check()
            .await
            .map_err(|e| AppError::SummarizerError(e.to_string()))
    }
}

/// UTC period bounds ending at `now`: the past 24 hours for `day`, Sunday
/// through Saturday of the current week, or the current calendar month.
pub fn period_bounds(report_type: ReportType, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    match report_type {
        ReportType::Day => (now - Duration::hours(24), now),
        ReportType::Week => {
            let week = now.date_naive().week(Weekday::Sun);
            (start_of_day(week.first_day()), end_of_day(week.last_day()))
        }
        ReportType::Month => {
            let first = now
                .date_naive()
                .with_day(1)
                .expect("day one always exists");
            let next_month = if first.month() == 12 {
                NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
            } else {
                NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
            }
            .expect("first of month always exists");
            let last = next_month.pred_opt().expect("previous day always exists");
            (start_of_day(first), end_of_day(last))
        }
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0)
        .expect("midnight is a valid time")
        .and_utc()
}

fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_milli_opt(23, 59, 59, 999)
        .expect("end of day is a valid time")
        .and_utc()
}

/// Deterministic one-line-per-invoice rendering fed to the provider.
pub fn format_sales_data(invoices: &[&Invoice]) -> String {
    invoices
        .iter()
        .map(|inv| {
            let customer = inv.customer_name.as_deref().unwrap_or("walk-in customer");
            let items = inv
                .items
                .iter()
                .map(|item| {
                    format!(
                        "{} boxes and {} pieces of {}",
                        item.boxes, item.pieces, item.product_name
                    )
                })
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "Invoice {} to {} on {}: {}. Total: {:.2}",
                inv.invoice_number,
                customer,
                inv.date.format("%Y-%m-%d"),
                items,
                inv.total
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
