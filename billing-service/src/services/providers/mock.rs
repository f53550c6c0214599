//! Mock narrative provider for tests and development.

use super::{NarrativeProvider, NarrativeRequest, ProviderError};
use async_trait::async_trait;
use std::time::Duration;

/// Deterministic provider: the output is a pure function of the request, and
/// the configurable delay lets tests exercise the single-flight gate and
/// timeout paths.
pub struct MockProvider {
    delay: Duration,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl MockProvider {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl NarrativeProvider for MockProvider {
    async fn generate(&self, request: &NarrativeRequest) -> Result<String, ProviderError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let line_count = request.sales_data.lines().count();
        Ok(format!(
            "Mock sales analysis ({}): reviewed {} invoice line(s).",
            request.report_type.as_str(),
            line_count
        ))
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}
