//! Catalog store: source of truth for product pricing and stock.
//!
//! Products live as a JSON sequence under the `"products"` key. The first
//! read of an empty store seeds the built-in default catalog.

use crate::models::{CreateProduct, Product, UpdateProduct};
use crate::services::metrics::STORE_OP_DURATION;
use crate::services::store::KeyValueStore;
use rust_decimal::Decimal;
use service_core::error::AppError;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

const PRODUCTS_KEY: &str = "products";

pub struct CatalogStore {
    store: Arc<dyn KeyValueStore>,
    write_lock: tokio::sync::Mutex<()>,
}

impl CatalogStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    #[instrument(skip(self))]
    async fn load(&self) -> Result<Vec<Product>, AppError> {
        let timer = STORE_OP_DURATION
            .with_label_values(&["products_load"])
            .start_timer();
        let raw = self
            .store
            .get(PRODUCTS_KEY)
            .await
            .map_err(AppError::StorageError)?;
        timer.observe_duration();

        match raw {
            None => {
                tracing::info!("No catalog found, seeding default products");
                let products = default_catalog();
                self.persist(&products).await?;
                Ok(products)
            }
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(products) => Ok(products),
                Err(e) => {
                    tracing::warn!(error = %e, "Malformed catalog data, falling back to empty");
                    Ok(Vec::new())
                }
            },
        }
    }

    async fn persist(&self, products: &[Product]) -> Result<(), AppError> {
        let timer = STORE_OP_DURATION
            .with_label_values(&["products_persist"])
            .start_timer();
        let encoded = serde_json::to_string(products)
            .map_err(|e| AppError::InternalError(anyhow::anyhow!("Failed to encode catalog: {}", e)))?;
        self.store
            .set(PRODUCTS_KEY, &encoded)
            .await
            .map_err(AppError::StorageError)?;
        timer.observe_duration();
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<Product>, AppError> {
        self.load().await
    }

    /// Case-insensitive substring match on name or SKU.
    pub async fn search(&self, query: &str) -> Result<Vec<Product>, AppError> {
        let needle = query.to_lowercase();
        let products = self.load().await?;
        Ok(products
            .into_iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle) || p.sku.to_lowercase().contains(&needle)
            })
            .collect())
    }

    pub async fn get(&self, product_id: &str) -> Result<Option<Product>, AppError> {
        let products = self.load().await?;
        Ok(products.into_iter().find(|p| p.id == product_id))
    }

    #[instrument(skip(self, input), fields(sku = %input.sku))]
    pub async fn create(&self, input: CreateProduct) -> Result<Product, AppError> {
        if input.price_box < Decimal::ZERO || input.price_piece < Decimal::ZERO {
            return Err(AppError::InvalidInput(anyhow::anyhow!(
                "Prices must be non-negative"
            )));
        }

        let _guard = self.write_lock.lock().await;
        let mut products = self.load().await?;

        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            sku: input.sku,
            category: input.category,
            price_box: input.price_box,
            price_piece: input.price_piece,
            stock: input.stock,
            low_stock_threshold: input.low_stock_threshold,
        };
        products.push(product.clone());
        self.persist(&products).await?;

        tracing::info!(product_id = %product.id, "Created product");
        Ok(product)
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, product_id: &str, patch: UpdateProduct) -> Result<Product, AppError> {
        if patch.price_box.is_some_and(|p| p < Decimal::ZERO)
            || patch.price_piece.is_some_and(|p| p < Decimal::ZERO)
        {
            return Err(AppError::InvalidInput(anyhow::anyhow!(
                "Prices must be non-negative"
            )));
        }

        let _guard = self.write_lock.lock().await;
        let mut products = self.load().await?;

        let product = products
            .iter_mut()
            .find(|p| p.id == product_id)
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Product '{}' not found", product_id)))?;

        if let Some(name) = patch.name {
            product.name = name;
        }
        if let Some(category) = patch.category {
            product.category = category;
        }
        if let Some(price_box) = patch.price_box {
            product.price_box = price_box;
        }
        if let Some(price_piece) = patch.price_piece {
            product.price_piece = price_piece;
        }
        if let Some(stock) = patch.stock {
            product.stock = stock;
        }
        if let Some(threshold) = patch.low_stock_threshold {
            product.low_stock_threshold = threshold;
        }

        let updated = product.clone();
        self.persist(&products).await?;
        Ok(updated)
    }

    pub async fn low_stock(&self) -> Result<Vec<Product>, AppError> {
        let products = self.load().await?;
        Ok(products.into_iter().filter(|p| p.is_low_stock()).collect())
    }
}

fn seed(
    id: &str,
    name: &str,
    sku: &str,
    category: &str,
    price_box: i64,
    price_piece: i64,
    stock: u32,
    low_stock_threshold: u32,
) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        sku: sku.to_string(),
        category: category.to_string(),
        price_box: Decimal::from(price_box),
        price_piece: Decimal::from(price_piece),
        stock,
        low_stock_threshold,
    }
}

/// Built-in default catalog, written on first read of an empty store.
pub fn default_catalog() -> Vec<Product> {
    vec![
        seed("prod-001", "Pepsi 500ml", "P500", "Pepsi", 240, 20, 150, 20),
        seed("prod-002", "7Up 500ml", "7U500", "7Up", 240, 20, 8, 10),
        seed("prod-003", "Mirinda 500ml", "M500", "Other", 240, 20, 120, 20),
        seed("prod-004", "Mountain Dew 500ml", "MD500", "Other", 250, 22, 90, 20),
        seed("prod-005", "Pepsi Black 500ml", "PB500", "Pepsi", 300, 25, 75, 15),
        seed("prod-006", "7Up Revive 500ml", "7UR500", "7Up", 280, 24, 5, 10),
        seed("prod-007", "Sting Energy 250ml", "SE250", "Other", 480, 20, 200, 30),
        seed("prod-008", "Pepsi 1.5L", "P1500", "Pepsi", 480, 40, 60, 10),
        seed("prod-009", "7Up 1.5L", "7U1500", "7Up", 480, 40, 40, 10),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::store::MemoryStore;

    fn catalog() -> CatalogStore {
        CatalogStore::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn first_read_seeds_defaults() {
        let catalog = catalog();
        let products = catalog.list().await.unwrap();
        assert_eq!(products.len(), 9);
        assert_eq!(products[0].id, "prod-001");
    }

    #[tokio::test]
    async fn search_matches_name_and_sku_case_insensitively() {
        let catalog = catalog();
        let by_name = catalog.search("pepsi").await.unwrap();
        assert!(by_name.iter().all(|p| p.name.to_lowercase().contains("pepsi")));
        assert_eq!(by_name.len(), 3);

        let by_sku = catalog.search("md500").await.unwrap();
        assert_eq!(by_sku.len(), 1);
        assert_eq!(by_sku[0].id, "prod-004");
    }

    #[tokio::test]
    async fn update_unknown_product_is_not_found() {
        let catalog = catalog();
        let err = catalog
            .update("prod-999", UpdateProduct::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn stock_adjustment_persists() {
        let catalog = catalog();
        catalog.list().await.unwrap();

        let patch = UpdateProduct {
            stock: Some(42),
            ..Default::default()
        };
        let updated = catalog.update("prod-001", patch).await.unwrap();
        assert_eq!(updated.stock, 42);

        let reloaded = catalog.get("prod-001").await.unwrap().unwrap();
        assert_eq!(reloaded.stock, 42);
    }

    #[tokio::test]
    async fn malformed_catalog_falls_back_to_empty() {
        let store = Arc::new(MemoryStore::new());
        store.set("products", "not json").await.unwrap();
        let catalog = CatalogStore::new(store);
        assert!(catalog.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn low_stock_uses_threshold() {
        let catalog = catalog();
        let low = catalog.low_stock().await.unwrap();
        let ids: Vec<_> = low.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["prod-002", "prod-006"]);
    }
}
