//! Report aggregation: a pure fold of ledger invoices into per-product
//! summaries and grand totals over an inclusive date range.

use crate::models::{Invoice, ProductSummary, ReportData, ReportRange};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Fold the invoices within `range` into [`ReportData`]. Pure and
/// idempotent: the same inputs always yield the same output and the input
/// invoices are never mutated.
pub fn aggregate(invoices: &[Invoice], range: &ReportRange) -> ReportData {
    let mut rows: Vec<ProductSummary> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut grand_total = Decimal::ZERO;
    let mut total_invoices = 0u64;

    for invoice in invoices.iter().filter(|inv| range.contains(inv.date)) {
        total_invoices += 1;
        grand_total += invoice.total;

        for item in &invoice.items {
            let idx = *index.entry(item.product_id.clone()).or_insert_with(|| {
                rows.push(ProductSummary {
                    product_id: item.product_id.clone(),
                    product_name: item.product_name.clone(),
                    total_boxes: 0,
                    total_pieces: 0,
                    total_amount: Decimal::ZERO,
                });
                rows.len() - 1
            });
            let row = &mut rows[idx];
            row.total_boxes += u64::from(item.boxes);
            row.total_pieces += u64::from(item.pieces);
            row.total_amount += item.total;
        }
    }

    // Stable sort: ties keep first-seen order.
    rows.sort_by(|a, b| b.total_amount.cmp(&a.total_amount));

    ReportData {
        date_range: *range,
        product_summary: rows,
        grand_total,
        total_invoices,
    }
}
