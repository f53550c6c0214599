//! Product model for the catalog.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Catalog entry. Prices are per box and per piece; stock is a whole-unit
/// count that catalog edits adjust without touching past invoices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub category: String,
    pub price_box: Decimal,
    pub price_piece: Decimal,
    pub stock: u32,
    pub low_stock_threshold: u32,
}

impl Product {
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.low_stock_threshold
    }
}

/// Input for creating a product.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProduct {
    #[validate(length(min = 2))]
    pub name: String,
    #[validate(length(min = 2))]
    pub sku: String,
    #[validate(length(min = 2))]
    pub category: String,
    pub price_box: Decimal,
    pub price_piece: Decimal,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub low_stock_threshold: u32,
}

/// Input for a stock-adjustment or price-edit. Past invoices are never
/// recomputed from these changes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price_box: Option<Decimal>,
    pub price_piece: Option<Decimal>,
    pub stock: Option<u32>,
    pub low_stock_threshold: Option<u32>,
}
