use crate::dtos::SearchParams;
use crate::startup::AppState;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

pub async fn list_customers(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, AppError> {
    let customers = match params.search.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        Some(query) => state.customers.search(query).await?,
        None => state.customers.list().await?,
    };
    Ok(Json(customers))
}
