//! Common test utilities for billing-service integration tests.

use billing_service::config::{BillingConfig, RedisConfig, SummarizerConfig};
use billing_service::services::providers::mock::MockProvider;
use billing_service::services::MemoryStore;
use billing_service::startup::Application;
use serde_json::{json, Value};
use service_core::config::Config as CommonConfig;
use std::sync::{Arc, Once};

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,billing_service=debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }
}

/// Spawn a hermetic test application: in-memory store, mock narrative
/// provider, random port.
pub async fn spawn_app() -> TestApp {
    init_tracing();

    let config = BillingConfig {
        common: CommonConfig { port: 0 },
        service_name: "billing-service-test".to_string(),
        log_level: "debug".to_string(),
        otlp_endpoint: None,
        redis: RedisConfig {
            url: "redis://unused-in-tests".to_string(),
        },
        summarizer: SummarizerConfig {
            provider: "mock".to_string(),
            model: "mock".to_string(),
            api_key: String::new(),
            timeout_secs: 5,
            mock_delay_ms: 0,
        },
    };

    let app = Application::build_with(
        config,
        Arc::new(MemoryStore::new()),
        Arc::new(MockProvider::default()),
    )
    .await
    .expect("Failed to build application");

    let port = app.port();
    tokio::spawn(async move {
        app.run_until_stopped().await.ok();
    });

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        client: reqwest::Client::new(),
    }
}

/// Drive the draft lifecycle end to end and return the finalized invoice.
pub async fn finalize_invoice(
    app: &TestApp,
    customer_id: Option<&str>,
    lines: &[(&str, u32, u32)],
    discount: Option<Value>,
    tax: Option<Value>,
) -> Value {
    let draft: Value = app
        .client
        .post(app.url("/api/invoices/drafts"))
        .json(&json!({ "customer_id": customer_id }))
        .send()
        .await
        .expect("Failed to create draft")
        .json()
        .await
        .expect("Invalid draft response");
    let draft_id = draft["draft_id"].as_str().expect("Missing draft_id");

    for (product_id, boxes, pieces) in lines {
        let response = app
            .client
            .post(app.url(&format!("/api/invoices/drafts/{}/items", draft_id)))
            .json(&json!({ "product_id": product_id }))
            .send()
            .await
            .expect("Failed to add line");
        assert_eq!(response.status().as_u16(), 201);

        let response = app
            .client
            .patch(app.url(&format!(
                "/api/invoices/drafts/{}/items/{}",
                draft_id, product_id
            )))
            .json(&json!({ "boxes": boxes, "pieces": pieces }))
            .send()
            .await
            .expect("Failed to update line");
        assert_eq!(response.status().as_u16(), 200);
    }

    if discount.is_some() || tax.is_some() {
        let mut patch = serde_json::Map::new();
        if let Some(discount) = discount {
            patch.insert("discount".to_string(), discount);
        }
        if let Some(tax) = tax {
            patch.insert("tax".to_string(), tax);
        }
        let response = app
            .client
            .patch(app.url(&format!("/api/invoices/drafts/{}", draft_id)))
            .json(&Value::Object(patch))
            .send()
            .await
            .expect("Failed to update draft");
        assert_eq!(response.status().as_u16(), 200);
    }

    let response = app
        .client
        .post(app.url(&format!("/api/invoices/drafts/{}/finalize", draft_id)))
        .send()
        .await
        .expect("Failed to finalize draft");
    assert_eq!(response.status().as_u16(), 201);
    response.json().await.expect("Invalid invoice response")
}
