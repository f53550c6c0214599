use crate::dtos::{
    AddLineRequest, CreateDraftRequest, DraftResponse, UpdateDraftRequest, UpdateLineRequest,
};
use crate::services::metrics::{INVOICES_FINALIZED_TOTAL, INVOICE_AMOUNT_TOTAL};
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::prelude::ToPrimitive;
use service_core::error::AppError;
use uuid::Uuid;

pub async fn create_draft(
    State(state): State<AppState>,
    Json(payload): Json<CreateDraftRequest>,
) -> Result<impl IntoResponse, AppError> {
    let customer = match payload.customer_id.as_deref() {
        Some(customer_id) => Some(state.customers.get(customer_id).await?.ok_or_else(|| {
            AppError::NotFound(anyhow::anyhow!("Customer '{}' not found", customer_id))
        })?),
        None => None,
    };

    let draft_id = state.drafts.create(customer.as_ref());
    let draft = state.drafts.get(&draft_id)?;
    Ok((
        StatusCode::CREATED,
        Json(DraftResponse::from_draft(draft_id, &draft)),
    ))
}

pub async fn get_draft(
    State(state): State<AppState>,
    Path(draft_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let draft = state.drafts.get(&draft_id)?;
    Ok(Json(DraftResponse::from_draft(draft_id, &draft)))
}

pub async fn update_draft(
    State(state): State<AppState>,
    Path(draft_id): Path<Uuid>,
    Json(payload): Json<UpdateDraftRequest>,
) -> Result<impl IntoResponse, AppError> {
    let customer = match payload.customer_id.as_deref() {
        Some(customer_id) => Some(state.customers.get(customer_id).await?.ok_or_else(|| {
            AppError::NotFound(anyhow::anyhow!("Customer '{}' not found", customer_id))
        })?),
        None => None,
    };

    let draft = state.drafts.update(&draft_id, |draft| {
        if let Some(discount) = payload.discount {
            draft.discount = discount;
        }
        if let Some(tax) = payload.tax {
            draft.tax = tax;
        }
        if let Some(customer) = customer.as_ref() {
            draft.set_customer(Some(customer));
        }
        Ok(draft.clone())
    })?;
    Ok(Json(DraftResponse::from_draft(draft_id, &draft)))
}

pub async fn discard_draft(
    State(state): State<AppState>,
    Path(draft_id): Path<Uuid>,
) -> impl IntoResponse {
    state.drafts.discard(&draft_id);
    StatusCode::NO_CONTENT
}

pub async fn add_line(
    State(state): State<AppState>,
    Path(draft_id): Path<Uuid>,
    Json(payload): Json<AddLineRequest>,
) -> Result<impl IntoResponse, AppError> {
    let product = state
        .catalog
        .get(&payload.product_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(anyhow::anyhow!("Product '{}' not found", payload.product_id))
        })?;

    let draft = state.drafts.update(&draft_id, |draft| {
        draft.add_item(&product)?;
        Ok(draft.clone())
    })?;
    Ok((
        StatusCode::CREATED,
        Json(DraftResponse::from_draft(draft_id, &draft)),
    ))
}

pub async fn update_line(
    State(state): State<AppState>,
    Path((draft_id, product_id)): Path<(Uuid, String)>,
    Json(payload): Json<UpdateLineRequest>,
) -> Result<impl IntoResponse, AppError> {
    let draft = state.drafts.update(&draft_id, |draft| {
        draft.update_item(&product_id, payload.boxes, payload.pieces)?;
        Ok(draft.clone())
    })?;
    Ok(Json(DraftResponse::from_draft(draft_id, &draft)))
}

pub async fn remove_line(
    State(state): State<AppState>,
    Path((draft_id, product_id)): Path<(Uuid, String)>,
) -> Result<impl IntoResponse, AppError> {
    state.drafts.update(&draft_id, |draft| {
        draft.remove_item(&product_id);
        Ok(())
    })?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn finalize_draft(
    State(state): State<AppState>,
    Path(draft_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let draft = state.drafts.get(&draft_id)?;
    let invoice = state.ledger.finalize_and_append(&draft).await?;

    // Finalized is terminal: the next invoice starts from a fresh draft.
    state.drafts.discard(&draft_id);

    INVOICES_FINALIZED_TOTAL.inc();
    if let Some(amount) = invoice.total.to_f64() {
        INVOICE_AMOUNT_TOTAL.inc_by(amount);
    }

    // The invoice is already durable; a failed staging only affects the
    // print view.
    if let Err(e) = state.handoff.stage_invoice(&invoice).await {
        tracing::warn!(error = %e, invoice_id = %invoice.id, "Failed to stage invoice for printing");
    }

    Ok((StatusCode::CREATED, Json(invoice)))
}

pub async fn list_invoices(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let mut invoices = state.ledger.load_all().await?;
    invoices.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(Json(invoices))
}

pub async fn get_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let invoice = state
        .ledger
        .find(&invoice_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Invoice '{}' not found", invoice_id)))?;
    Ok(Json(invoice))
}
