//! Draft invoice builder.
//!
//! A draft accumulates at most one line per product, re-deriving line totals
//! from quantities and the unit prices frozen at add-time. `finalize`
//! produces the immutable [`Invoice`] snapshot; the registry removes the
//! draft on successful finalization, making that state terminal.

use crate::models::{Customer, Discount, Invoice, InvoiceItem, InvoiceTotals, Product, Tax};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use service_core::error::AppError;
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct InvoiceDraft {
    pub customer_id: Option<String>,
    pub customer_name: Option<String>,
    pub items: Vec<InvoiceItem>,
    pub discount: Discount,
    pub tax: Tax,
}

impl InvoiceDraft {
    pub fn new(customer: Option<&Customer>) -> Self {
        Self {
            customer_id: customer.map(|c| c.id.clone()),
            customer_name: customer.map(|c| c.name.clone()),
            ..Default::default()
        }
    }

    pub fn set_customer(&mut self, customer: Option<&Customer>) {
        self.customer_id = customer.map(|c| c.id.clone());
        self.customer_name = customer.map(|c| c.name.clone());
    }

    /// Append a zero-quantity line for the product. Rejected when the
    /// product already has a line.
    pub fn add_item(&mut self, product: &Product) -> Result<(), AppError> {
        if self.items.iter().any(|item| item.product_id == product.id) {
            return Err(AppError::Conflict(anyhow::anyhow!(
                "Product '{}' is already on the invoice",
                product.id
            )));
        }
        self.items.push(InvoiceItem::for_product(product));
        Ok(())
    }

    /// Replace the given quantity fields on the matching line; the line
    /// total is re-derived from the frozen unit prices.
    pub fn update_item(
        &mut self,
        product_id: &str,
        boxes: Option<u32>,
        pieces: Option<u32>,
    ) -> Result<(), AppError> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.product_id == product_id)
            .ok_or_else(|| {
                AppError::NotFound(anyhow::anyhow!(
                    "Product '{}' is not on the invoice",
                    product_id
                ))
            })?;
        item.set_quantities(boxes, pieces);
        Ok(())
    }

    /// Delete the line. No error when absent.
    pub fn remove_item(&mut self, product_id: &str) {
        self.items.retain(|item| item.product_id != product_id);
    }

    /// `Σ item.total` over the current items, recomputed on every call.
    pub fn subtotal(&self) -> rust_decimal::Decimal {
        self.items.iter().map(|item| item.total).sum()
    }

    pub fn totals(&self) -> InvoiceTotals {
        InvoiceTotals::compute(&self.items, &self.discount, &self.tax)
    }

    /// Produce the immutable invoice snapshot. Rejects an empty draft and a
    /// discount that would push the total below zero.
    pub fn finalize(
        &self,
        invoice_number: String,
        issued_utc: DateTime<Utc>,
    ) -> Result<Invoice, AppError> {
        if self.items.is_empty() {
            return Err(AppError::InvalidInput(anyhow::anyhow!(
                "Cannot finalize an invoice with no items"
            )));
        }

        let totals = self.totals();
        if totals.discount_amount > totals.subtotal {
            return Err(AppError::InvalidInput(anyhow::anyhow!(
                "Discount exceeds the invoice subtotal"
            )));
        }

        Ok(Invoice {
            id: Uuid::new_v4(),
            invoice_number,
            customer_id: self.customer_id.clone(),
            customer_name: self.customer_name.clone(),
            date: issued_utc,
            items: self.items.clone(),
            subtotal: totals.subtotal,
            discount: self.discount,
            discount_amount: totals.discount_amount,
            tax: self.tax,
            tax_amount: totals.tax_amount,
            total: totals.total,
        })
    }
}

/// In-memory registry giving drafts a server-side identity.
#[derive(Default)]
pub struct DraftRegistry {
    drafts: DashMap<Uuid, InvoiceDraft>,
}

impl DraftRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, customer: Option<&Customer>) -> Uuid {
        let draft_id = Uuid::new_v4();
        self.drafts.insert(draft_id, InvoiceDraft::new(customer));
        draft_id
    }

    pub fn get(&self, draft_id: &Uuid) -> Result<InvoiceDraft, AppError> {
        self.drafts
            .get(draft_id)
            .map(|entry| entry.clone())
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Draft '{}' not found", draft_id)))
    }

    /// Run a mutation against the draft, returning its result.
    pub fn update<T>(
        &self,
        draft_id: &Uuid,
        f: impl FnOnce(&mut InvoiceDraft) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let mut entry = self
            .drafts
            .get_mut(draft_id)
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Draft '{}' not found", draft_id)))?;
        f(entry.value_mut())
    }

    /// Discard a draft. Idempotent.
    pub fn discard(&self, draft_id: &Uuid) {
        self.drafts.remove(draft_id);
    }
}
