use crate::config::BillingConfig;
use crate::handlers;
use crate::services::metrics::http_metrics_middleware;
use crate::services::providers::gemini::{GeminiConfig, GeminiProvider};
use crate::services::providers::mock::MockProvider;
use crate::services::providers::NarrativeProvider;
use crate::services::{
    CatalogStore, CustomerDirectory, DraftRegistry, InvoiceLedger, KeyValueStore, PrintHandoff,
    RedisStore, SummaryService,
};
use axum::{
    middleware::from_fn,
    routing::{get, patch, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::request_id::request_id_middleware;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: BillingConfig,
    pub store: Arc<dyn KeyValueStore>,
    pub catalog: Arc<CatalogStore>,
    pub customers: Arc<CustomerDirectory>,
    pub drafts: Arc<DraftRegistry>,
    pub ledger: Arc<InvoiceLedger>,
    pub handoff: Arc<PrintHandoff>,
    pub summarizer: Arc<SummaryService>,
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
}

impl Application {
    pub async fn build(config: BillingConfig) -> Result<Self, AppError> {
        let store: Arc<dyn KeyValueStore> = Arc::new(
            RedisStore::new(&config.redis.url)
                .await
                .map_err(AppError::StorageError)?,
        );
        let provider = select_provider(&config);
        Self::build_with(config, store, provider).await
    }

    /// Build against explicit store and provider implementations. Used by
    /// the tests to run hermetically on the in-memory store and mock
    /// provider.
    pub async fn build_with(
        config: BillingConfig,
        store: Arc<dyn KeyValueStore>,
        provider: Arc<dyn NarrativeProvider>,
    ) -> Result<Self, AppError> {
        let summarizer_timeout = Duration::from_secs(config.summarizer.timeout_secs);

        let state = AppState {
            config: config.clone(),
            catalog: Arc::new(CatalogStore::new(store.clone())),
            customers: Arc::new(CustomerDirectory::new(store.clone())),
            drafts: Arc::new(DraftRegistry::new()),
            ledger: Arc::new(InvoiceLedger::new(store.clone())),
            handoff: Arc::new(PrintHandoff::new(store.clone())),
            summarizer: Arc::new(SummaryService::new(provider, summarizer_timeout)),
            store,
        };

        let app = build_router(state);

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app);

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

fn select_provider(config: &BillingConfig) -> Arc<dyn NarrativeProvider> {
    match config.summarizer.provider.as_str() {
        "gemini" => {
            tracing::info!(model = %config.summarizer.model, "Using Gemini narrative provider");
            Arc::new(GeminiProvider::new(GeminiConfig {
                api_key: config.summarizer.api_key.clone(),
                model: config.summarizer.model.clone(),
                timeout: Duration::from_secs(config.summarizer.timeout_secs),
            }))
        }
        other => {
            if other != "mock" {
                tracing::warn!(provider = %other, "Unknown summarizer provider, using mock");
            }
            Arc::new(MockProvider::new(Duration::from_millis(
                config.summarizer.mock_delay_ms,
            )))
        }
    }
}

fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/metrics", get(handlers::health::metrics_endpoint))
        .route(
            "/api/products",
            get(handlers::products::list_products).post(handlers::products::create_product),
        )
        .route(
            "/api/products/:product_id",
            patch(handlers::products::update_product),
        )
        .route("/api/customers", get(handlers::customers::list_customers))
        .route("/api/dashboard", get(handlers::dashboard::dashboard))
        .route(
            "/api/invoices/drafts",
            post(handlers::invoices::create_draft),
        )
        .route(
            "/api/invoices/drafts/:draft_id",
            get(handlers::invoices::get_draft)
                .patch(handlers::invoices::update_draft)
                .delete(handlers::invoices::discard_draft),
        )
        .route(
            "/api/invoices/drafts/:draft_id/items",
            post(handlers::invoices::add_line),
        )
        .route(
            "/api/invoices/drafts/:draft_id/items/:product_id",
            patch(handlers::invoices::update_line).delete(handlers::invoices::remove_line),
        )
        .route(
            "/api/invoices/drafts/:draft_id/finalize",
            post(handlers::invoices::finalize_draft),
        )
        .route("/api/invoices", get(handlers::invoices::list_invoices))
        .route(
            "/api/invoices/:invoice_id",
            get(handlers::invoices::get_invoice),
        )
        .route("/api/reports/sales", get(handlers::reports::sales_report))
        .route(
            "/api/reports/narrative",
            post(handlers::reports::narrative_report),
        )
        .route(
            "/api/print/invoice",
            get(handlers::print::take_invoice_print),
        )
        .route(
            "/api/print/report",
            get(handlers::print::take_report_print).post(handlers::print::stage_report_print),
        )
        .layer(from_fn(http_metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
