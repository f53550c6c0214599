//! Append-only invoice ledger.
//!
//! Finalized invoices live as a JSON sequence under the `"invoices"` key in
//! append order. Appends serialize their read-modify-write cycle behind an
//! async mutex so concurrent finalizations cannot lose invoices.

use crate::models::Invoice;
use crate::services::drafts::InvoiceDraft;
use crate::services::metrics::STORE_OP_DURATION;
use crate::services::store::KeyValueStore;
use chrono::{Datelike, Utc};
use service_core::error::AppError;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

const INVOICES_KEY: &str = "invoices";

pub struct InvoiceLedger {
    store: Arc<dyn KeyValueStore>,
    append_lock: tokio::sync::Mutex<()>,
}

impl InvoiceLedger {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            append_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Full sequence in append order. Absent key is the empty ledger;
    /// malformed data logs a warning and falls back to empty.
    #[instrument(skip(self))]
    pub async fn load_all(&self) -> Result<Vec<Invoice>, AppError> {
        let timer = STORE_OP_DURATION
            .with_label_values(&["invoices_load"])
            .start_timer();
        let raw = self
            .store
            .get(INVOICES_KEY)
            .await
            .map_err(AppError::StorageError)?;
        timer.observe_duration();

        match raw {
            None => Ok(Vec::new()),
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(invoices) => Ok(invoices),
                Err(e) => {
                    tracing::warn!(error = %e, "Malformed ledger data, falling back to empty");
                    Ok(Vec::new())
                }
            },
        }
    }

    pub async fn find(&self, invoice_id: &Uuid) -> Result<Option<Invoice>, AppError> {
        let invoices = self.load_all().await?;
        Ok(invoices.into_iter().find(|inv| inv.id == *invoice_id))
    }

    pub async fn count(&self) -> Result<usize, AppError> {
        Ok(self.load_all().await?.len())
    }

    /// Finalize the draft with the next invoice number and append the
    /// resulting invoice. Numbers are `{year}-{sequence:04}` from the ledger
    /// length; they are human-facing labels, not guaranteed unique across
    /// sessions.
    #[instrument(skip(self, draft))]
    pub async fn finalize_and_append(&self, draft: &InvoiceDraft) -> Result<Invoice, AppError> {
        let _guard = self.append_lock.lock().await;

        let mut invoices = self.load_all().await?;
        let now = Utc::now();
        let invoice_number = format!("{}-{:04}", now.year(), invoices.len() + 1);
        let invoice = draft.finalize(invoice_number, now)?;

        invoices.push(invoice.clone());
        self.persist(&invoices).await?;

        tracing::info!(
            invoice_id = %invoice.id,
            invoice_number = %invoice.invoice_number,
            total = %invoice.total,
            "Appended invoice to ledger"
        );
        Ok(invoice)
    }

    async fn persist(&self, invoices: &[Invoice]) -> Result<(), AppError> {
        let timer = STORE_OP_DURATION
            .with_label_values(&["invoices_persist"])
            .start_timer();
        let encoded = serde_json::to_string(invoices)
            .map_err(|e| AppError::InternalError(anyhow::anyhow!("Failed to encode ledger: {}", e)))?;
        self.store
            .set(INVOICES_KEY, &encoded)
            .await
            .map_err(AppError::StorageError)?;
        timer.observe_duration();
        Ok(())
    }
}
