//! One-shot print handoff slots.
//!
//! The print renderer is an external consumer: finalize stages the invoice
//! under `"latest_invoice"`, the report view stages under `"latest_report"`,
//! and each slot is consumed exactly once via the store's atomic `take`.
//! Staging overwrites any unconsumed value.

use crate::models::{Invoice, ReportData};
use crate::services::store::KeyValueStore;
use service_core::error::AppError;
use std::sync::Arc;

const LATEST_INVOICE_KEY: &str = "latest_invoice";
const LATEST_REPORT_KEY: &str = "latest_report";

pub struct PrintHandoff {
    store: Arc<dyn KeyValueStore>,
}

impl PrintHandoff {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn stage_invoice(&self, invoice: &Invoice) -> Result<(), AppError> {
        let encoded = serde_json::to_string(invoice).map_err(|e| {
            AppError::InternalError(anyhow::anyhow!("Failed to encode invoice: {}", e))
        })?;
        self.store
            .set(LATEST_INVOICE_KEY, &encoded)
            .await
            .map_err(AppError::StorageError)
    }

    pub async fn take_invoice(&self) -> Result<Option<Invoice>, AppError> {
        let raw = self
            .store
            .take(LATEST_INVOICE_KEY)
            .await
            .map_err(AppError::StorageError)?;
        decode(raw)
    }

    pub async fn stage_report(&self, report: &ReportData) -> Result<(), AppError> {
        let encoded = serde_json::to_string(report).map_err(|e| {
            AppError::InternalError(anyhow::anyhow!("Failed to encode report: {}", e))
        })?;
        self.store
            .set(LATEST_REPORT_KEY, &encoded)
            .await
            .map_err(AppError::StorageError)
    }

    pub async fn take_report(&self) -> Result<Option<ReportData>, AppError> {
        let raw = self
            .store
            .take(LATEST_REPORT_KEY)
            .await
            .map_err(AppError::StorageError)?;
        decode(raw)
    }
}

fn decode<T: serde::de::DeserializeOwned>(raw: Option<String>) -> Result<Option<T>, AppError> {
    match raw {
        None => Ok(None),
        Some(raw) => match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(error = %e, "Malformed print slot data, treating as empty");
                Ok(None)
            }
        },
    }
}
