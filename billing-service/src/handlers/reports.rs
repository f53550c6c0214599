use crate::dtos::{NarrativeReportRequest, NarrativeReportResponse, SalesReportParams};
use crate::models::ReportRange;
use crate::services::reports::aggregate;
use crate::startup::AppState;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use service_core::error::AppError;

pub async fn sales_report(
    State(state): State<AppState>,
    Query(params): Query<SalesReportParams>,
) -> Result<impl IntoResponse, AppError> {
    let invoices = state.ledger.load_all().await?;
    let range = ReportRange::new(params.from, params.to);
    Ok(Json(aggregate(&invoices, &range)))
}

pub async fn narrative_report(
    State(state): State<AppState>,
    Json(payload): Json<NarrativeReportRequest>,
) -> Result<impl IntoResponse, AppError> {
    let invoices = state.ledger.load_all().await?;
    let report = state
        .summarizer
        .generate(payload.report_type, &invoices, Utc::now())
        .await?;
    Ok(Json(NarrativeReportResponse { report }))
}
