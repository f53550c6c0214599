use crate::dtos::DashboardResponse;
use crate::models::ReportRange;
use crate::startup::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use rust_decimal::Decimal;
use service_core::error::AppError;

pub async fn dashboard(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let today = Utc::now().date_naive();
    let today_range = ReportRange::new(Some(today), Some(today));

    let invoices = state.ledger.load_all().await?;
    let mut todays_sales = Decimal::ZERO;
    let mut invoices_today = 0u64;
    for invoice in invoices.iter().filter(|inv| today_range.contains(inv.date)) {
        todays_sales += invoice.total;
        invoices_today += 1;
    }

    let products = state.catalog.list().await?;
    let customers = state.customers.list().await?;
    let low_stock_products = products.iter().filter(|p| p.is_low_stock()).cloned().collect();

    Ok(Json(DashboardResponse {
        todays_sales,
        invoices_today,
        total_products: products.len(),
        total_customers: customers.len(),
        low_stock_products,
    }))
}
