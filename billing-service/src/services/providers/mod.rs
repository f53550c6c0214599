//! Narrative summarizer providers.
//!
//! The AI boundary is a trait so backends can be swapped: Gemini in
//! production, a deterministic mock for tests and development.

pub mod gemini;
pub mod mock;

use crate::models::ReportType;
use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Boundary contract: period label plus the formatted sales data lines.
#[derive(Debug, Clone)]
pub struct NarrativeRequest {
    pub report_type: ReportType,
    pub sales_data: String,
}

#[async_trait]
pub trait NarrativeProvider: Send + Sync {
    /// Generate the free-text sales analysis.
    async fn generate(&self, request: &NarrativeRequest) -> Result<String, ProviderError>;

    /// Health check.
    async fn health_check(&self) -> Result<(), ProviderError>;
}
