//! Invoice model: line items, discount/tax math, and the finalized document.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Product;

/// One product line on an invoice. `product_name` and the unit prices are
/// frozen at add-time so later catalog edits never alter a stored invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub product_id: String,
    pub product_name: String,
    pub boxes: u32,
    pub pieces: u32,
    pub price_box: Decimal,
    pub price_piece: Decimal,
    pub total: Decimal,
}

impl InvoiceItem {
    /// New zero-quantity line for a catalog product.
    pub fn for_product(product: &Product) -> Self {
        Self {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            boxes: 0,
            pieces: 0,
            price_box: product.price_box,
            price_piece: product.price_piece,
            total: Decimal::ZERO,
        }
    }

    /// Replace quantities and re-derive the line total from the frozen unit
    /// prices. Line totals are always derived; there is no direct entry.
    pub fn set_quantities(&mut self, boxes: Option<u32>, pieces: Option<u32>) {
        if let Some(boxes) = boxes {
            self.boxes = boxes;
        }
        if let Some(pieces) = pieces {
            self.pieces = pieces;
        }
        self.total = Decimal::from(self.boxes) * self.price_box
            + Decimal::from(self.pieces) * self.price_piece;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    Percentage,
    Flat,
}

impl DiscountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountKind::Percentage => "percentage",
            DiscountKind::Flat => "flat",
        }
    }
}

/// Invoice-level discount, applied once to the subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Discount {
    #[serde(rename = "type")]
    pub kind: DiscountKind,
    pub value: Decimal,
}

impl Discount {
    pub fn amount(&self, subtotal: Decimal) -> Decimal {
        match self.kind {
            DiscountKind::Flat => self.value,
            DiscountKind::Percentage => subtotal * self.value / Decimal::ONE_HUNDRED,
        }
    }
}

impl Default for Discount {
    fn default() -> Self {
        Self {
            kind: DiscountKind::Flat,
            value: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxKind {
    Gst,
}

/// Tax rate as a percentage value, e.g. 5 for 5%. Applied to the
/// post-discount amount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tax {
    #[serde(rename = "type")]
    pub kind: TaxKind,
    pub value: Decimal,
}

impl Tax {
    pub fn amount(&self, after_discount: Decimal) -> Decimal {
        after_discount * self.value / Decimal::ONE_HUNDRED
    }
}

impl Default for Tax {
    fn default() -> Self {
        Self {
            kind: TaxKind::Gst,
            value: Decimal::ZERO,
        }
    }
}

/// Derived money figures for a set of items plus discount and tax.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
}

impl InvoiceTotals {
    /// `total = subtotal - discount_amount + tax_amount`, with tax computed
    /// on the post-discount amount.
    pub fn compute(items: &[InvoiceItem], discount: &Discount, tax: &Tax) -> Self {
        let subtotal: Decimal = items.iter().map(|item| item.total).sum();
        let discount_amount = discount.amount(subtotal);
        let tax_amount = tax.amount(subtotal - discount_amount);
        Self {
            subtotal,
            discount_amount,
            tax_amount,
            total: subtotal - discount_amount + tax_amount,
        }
    }
}

/// Finalized, immutable billing document. Appended to the ledger once and
/// never mutated thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub invoice_number: String,
    pub customer_id: Option<String>,
    pub customer_name: Option<String>,
    pub date: DateTime<Utc>,
    pub items: Vec<InvoiceItem>,
    pub subtotal: Decimal,
    pub discount: Discount,
    pub discount_amount: Decimal,
    pub tax: Tax,
    pub tax_amount: Decimal,
    pub total: Decimal,
}
