mod common;

use chrono::Utc;
use common::{finalize_invoice, spawn_app};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::str::FromStr;

fn dec(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().expect("Expected a decimal string")).expect("Invalid decimal")
}

/// Three invoices totalling 1060.5, 1134 and 567.
async fn seed_sales(app: &common::TestApp) {
    finalize_invoice(
        app,
        Some("cust-001"),
        &[("prod-001", 2, 5), ("prod-008", 1, 0)],
        Some(json!({ "type": "flat", "value": "50" })),
        Some(json!({ "type": "gst", "value": "5" })),
    )
    .await;
    finalize_invoice(
        app,
        Some("cust-002"),
        &[("prod-001", 5, 0)],
        Some(json!({ "type": "percentage", "value": "10" })),
        Some(json!({ "type": "gst", "value": "5" })),
    )
    .await;
    finalize_invoice(
        app,
        None,
        &[("prod-001", 2, 3)],
        None,
        Some(json!({ "type": "gst", "value": "5" })),
    )
    .await;
}

#[tokio::test]
async fn sales_report_aggregates_per_product_over_the_range() {
    let app = spawn_app().await;
    seed_sales(&app).await;

    let today = Utc::now().date_naive();
    let report: Value = app
        .client
        .get(app.url(&format!(
            "/api/reports/sales?from={}&to={}",
            today, today
        )))
        .send()
        .await
        .expect("Failed to fetch report")
        .json()
        .await
        .expect("Invalid body");

    assert_eq!(report["total_invoices"], 3);
    assert_eq!(dec(&report["grand_total"]), Decimal::from_str("2761.5").unwrap());

    // prod-001 sold 2+5+2 boxes and 5+0+3 pieces, 580+1200+540 in line
    // totals; prod-008 a single 480 box. Sorted by amount descending.
    let summary = report["product_summary"].as_array().unwrap();
    assert_eq!(summary.len(), 2);
    assert_eq!(summary[0]["product_id"], "prod-001");
    assert_eq!(summary[0]["total_boxes"], 9);
    assert_eq!(summary[0]["total_pieces"], 8);
    assert_eq!(dec(&summary[0]["total_amount"]), Decimal::from(2320));
    assert_eq!(summary[1]["product_id"], "prod-008");
    assert_eq!(dec(&summary[1]["total_amount"]), Decimal::from(480));
}

#[tokio::test]
async fn sales_report_excludes_invoices_outside_the_range() {
    let app = spawn_app().await;
    seed_sales(&app).await;

    let report: Value = app
        .client
        .get(app.url("/api/reports/sales?from=2020-01-01&to=2020-01-31"))
        .send()
        .await
        .expect("Failed to fetch report")
        .json()
        .await
        .expect("Invalid body");

    assert_eq!(report["total_invoices"], 0);
    assert_eq!(dec(&report["grand_total"]), Decimal::ZERO);
    assert!(report["product_summary"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn sales_report_without_a_range_covers_the_whole_ledger() {
    let app = spawn_app().await;
    seed_sales(&app).await;

    let report: Value = app
        .client
        .get(app.url("/api/reports/sales"))
        .send()
        .await
        .expect("Failed to fetch report")
        .json()
        .await
        .expect("Invalid body");

    assert_eq!(report["total_invoices"], 3);
}

#[tokio::test]
async fn narrative_report_feeds_the_period_sales_to_the_provider() {
    let app = spawn_app().await;
    seed_sales(&app).await;

    let response = app
        .client
        .post(app.url("/api/reports/narrative"))
        .json(&json!({ "report_type": "day" }))
        .send()
        .await
        .expect("Failed to request narrative");
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.expect("Invalid body");
    assert_eq!(
        body["report"],
        "Mock sales analysis (day): reviewed 3 invoice line(s)."
    );
}

#[tokio::test]
async fn narrative_report_with_no_sales_short_circuits() {
    let app = spawn_app().await;

    let body: Value = app
        .client
        .post(app.url("/api/reports/narrative"))
        .json(&json!({ "report_type": "month" }))
        .send()
        .await
        .expect("Failed to request narrative")
        .json()
        .await
        .expect("Invalid body");
    assert_eq!(
        body["report"],
        "No sales data found for the selected period (month)."
    );
}

#[tokio::test]
async fn report_print_slot_is_consumed_exactly_once() {
    let app = spawn_app().await;
    seed_sales(&app).await;

    let today = Utc::now().date_naive();
    let report: Value = app
        .client
        .get(app.url(&format!(
            "/api/reports/sales?from={}&to={}",
            today, today
        )))
        .send()
        .await
        .expect("Failed to fetch report")
        .json()
        .await
        .expect("Invalid body");

    let staged = app
        .client
        .post(app.url("/api/print/report"))
        .json(&report)
        .send()
        .await
        .expect("Failed to stage report");
    assert_eq!(staged.status().as_u16(), 204);

    let taken = app
        .client
        .get(app.url("/api/print/report"))
        .send()
        .await
        .expect("Failed to take report");
    assert_eq!(taken.status().as_u16(), 200);
    let taken: Value = taken.json().await.expect("Invalid body");
    assert_eq!(taken["grand_total"], report["grand_total"]);

    let empty = app
        .client
        .get(app.url("/api/print/report"))
        .send()
        .await
        .expect("Failed to take report");
    assert_eq!(empty.status().as_u16(), 404);
}

#[tokio::test]
async fn dashboard_summarizes_the_day() {
    let app = spawn_app().await;
    seed_sales(&app).await;

    let dashboard: Value = app
        .client
        .get(app.url("/api/dashboard"))
        .send()
        .await
        .expect("Failed to fetch dashboard")
        .json()
        .await
        .expect("Invalid body");

    assert_eq!(dashboard["invoices_today"], 3);
    assert_eq!(
        dec(&dashboard["todays_sales"]),
        Decimal::from_str("2761.5").unwrap()
    );
    assert_eq!(dashboard["total_products"], 9);
    assert_eq!(dashboard["total_customers"], 5);

    // prod-002 and prod-006 are seeded below their thresholds.
    let low_stock = dashboard["low_stock_products"].as_array().unwrap();
    assert_eq!(low_stock.len(), 2);
}
