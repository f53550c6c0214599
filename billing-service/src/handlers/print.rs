use crate::models::ReportData;
use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use service_core::error::AppError;

pub async fn take_invoice_print(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let invoice = state
        .handoff
        .take_invoice()
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("No invoice staged for printing")))?;
    Ok(Json(invoice))
}

pub async fn stage_report_print(
    State(state): State<AppState>,
    Json(report): Json<ReportData>,
) -> Result<impl IntoResponse, AppError> {
    state.handoff.stage_report(&report).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn take_report_print(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let report = state
        .handoff
        .take_report()
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("No report staged for printing")))?;
    Ok(Json(report))
}
