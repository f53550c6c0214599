use crate::dtos::SearchParams;
use crate::models::{CreateProduct, UpdateProduct};
use crate::startup::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;
use validator::Validate;

pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, AppError> {
    let products = match params.search.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        Some(query) => state.catalog.search(query).await?,
        None => state.catalog.list().await?,
    };
    Ok(Json(products))
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProduct>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let product = state.catalog.create(payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Json(patch): Json<UpdateProduct>,
) -> Result<impl IntoResponse, AppError> {
    let product = state.catalog.update(&product_id, patch).await?;
    Ok(Json(product))
}
