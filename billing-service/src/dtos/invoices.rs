use crate::models::{Discount, InvoiceItem, InvoiceTotals, Tax};
use crate::services::drafts::InvoiceDraft;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
pub struct CreateDraftRequest {
    pub customer_id: Option<String>,
}

/// Draft-level edits: discount, tax, or customer selection.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateDraftRequest {
    pub discount: Option<Discount>,
    pub tax: Option<Tax>,
    pub customer_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddLineRequest {
    pub product_id: String,
}

/// Quantity edits for one line. Line totals are always re-derived.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateLineRequest {
    pub boxes: Option<u32>,
    pub pieces: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct DraftResponse {
    pub draft_id: Uuid,
    pub customer_id: Option<String>,
    pub customer_name: Option<String>,
    pub items: Vec<InvoiceItem>,
    pub discount: Discount,
    pub tax: Tax,
    pub totals: InvoiceTotals,
}

impl DraftResponse {
    pub fn from_draft(draft_id: Uuid, draft: &InvoiceDraft) -> Self {
        Self {
            draft_id,
            customer_id: draft.customer_id.clone(),
            customer_name: draft.customer_name.clone(),
            items: draft.items.clone(),
            discount: draft.discount,
            tax: draft.tax,
            totals: draft.totals(),
        }
    }
}
