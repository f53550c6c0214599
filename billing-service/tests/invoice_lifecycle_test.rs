mod common;

use common::{finalize_invoice, spawn_app};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::str::FromStr;

fn dec(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().expect("Expected a decimal string")).expect("Invalid decimal")
}

#[tokio::test]
async fn draft_accumulates_lines_and_recomputes_totals() {
    let app = spawn_app().await;

    let draft: Value = app
        .client
        .post(app.url("/api/invoices/drafts"))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to create draft")
        .json()
        .await
        .expect("Invalid body");
    let draft_id = draft["draft_id"].as_str().unwrap();

    // prod-001 is 240 per box / 20 per piece.
    let response = app
        .client
        .post(app.url(&format!("/api/invoices/drafts/{}/items", draft_id)))
        .json(&json!({ "product_id": "prod-001" }))
        .send()
        .await
        .expect("Failed to add line");
    assert_eq!(response.status().as_u16(), 201);

    let updated: Value = app
        .client
        .patch(app.url(&format!(
            "/api/invoices/drafts/{}/items/prod-001",
            draft_id
        )))
        .json(&json!({ "boxes": 2, "pieces": 5 }))
        .send()
        .await
        .expect("Failed to update line")
        .json()
        .await
        .expect("Invalid body");

    assert_eq!(dec(&updated["items"][0]["total"]), Decimal::from(580));
    assert_eq!(dec(&updated["totals"]["subtotal"]), Decimal::from(580));
    assert_eq!(updated["items"][0]["product_name"], "Pepsi 500ml");
}

#[tokio::test]
async fn adding_the_same_product_twice_is_a_conflict() {
    let app = spawn_app().await;

    let draft: Value = app
        .client
        .post(app.url("/api/invoices/drafts"))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to create draft")
        .json()
        .await
        .expect("Invalid body");
    let draft_id = draft["draft_id"].as_str().unwrap();

    let first = app
        .client
        .post(app.url(&format!("/api/invoices/drafts/{}/items", draft_id)))
        .json(&json!({ "product_id": "prod-001" }))
        .send()
        .await
        .expect("Failed to add line");
    assert_eq!(first.status().as_u16(), 201);

    let second = app
        .client
        .post(app.url(&format!("/api/invoices/drafts/{}/items", draft_id)))
        .json(&json!({ "product_id": "prod-001" }))
        .send()
        .await
        .expect("Failed to add line");
    assert_eq!(second.status().as_u16(), 409);

    let draft: Value = app
        .client
        .get(app.url(&format!("/api/invoices/drafts/{}", draft_id)))
        .send()
        .await
        .expect("Failed to get draft")
        .json()
        .await
        .expect("Invalid body");
    assert_eq!(draft["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn removing_an_absent_line_is_a_no_op() {
    let app = spawn_app().await;

    let draft: Value = app
        .client
        .post(app.url("/api/invoices/drafts"))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to create draft")
        .json()
        .await
        .expect("Invalid body");
    let draft_id = draft["draft_id"].as_str().unwrap();

    let response = app
        .client
        .delete(app.url(&format!(
            "/api/invoices/drafts/{}/items/prod-004",
            draft_id
        )))
        .send()
        .await
        .expect("Failed to remove line");
    assert_eq!(response.status().as_u16(), 204);
}

#[tokio::test]
async fn finalizing_an_empty_draft_is_rejected() {
    let app = spawn_app().await;

    let draft: Value = app
        .client
        .post(app.url("/api/invoices/drafts"))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to create draft")
        .json()
        .await
        .expect("Invalid body");
    let draft_id = draft["draft_id"].as_str().unwrap();

    let response = app
        .client
        .post(app.url(&format!("/api/invoices/drafts/{}/finalize", draft_id)))
        .send()
        .await
        .expect("Failed to finalize");
    assert_eq!(response.status().as_u16(), 422);
}

#[tokio::test]
async fn finalize_produces_an_immutable_invoice_with_flat_discount_and_gst() {
    let app = spawn_app().await;

    // 2 boxes + 5 pieces of prod-001 (240/20) = 580; 1 box of prod-008
    // (480) = 480.
    let invoice = finalize_invoice(
        &app,
        Some("cust-002"),
        &[("prod-001", 2, 5), ("prod-008", 1, 0)],
        Some(json!({ "type": "flat", "value": "50" })),
        Some(json!({ "type": "gst", "value": "5" })),
    )
    .await;

    assert_eq!(dec(&invoice["subtotal"]), Decimal::from(1060));
    assert_eq!(dec(&invoice["discount_amount"]), Decimal::from(50));
    assert_eq!(dec(&invoice["tax_amount"]), Decimal::from_str("50.5").unwrap());
    assert_eq!(dec(&invoice["total"]), Decimal::from_str("1060.5").unwrap());
    assert_eq!(invoice["customer_name"], "Quick Mart");
    assert!(invoice["invoice_number"].as_str().unwrap().contains('-'));

    // The draft is gone: Finalized is terminal.
    let invoices: Value = app
        .client
        .get(app.url("/api/invoices"))
        .send()
        .await
        .expect("Failed to list invoices")
        .json()
        .await
        .expect("Invalid body");
    assert_eq!(invoices.as_array().unwrap().len(), 1);

    let invoice_id = invoice["id"].as_str().unwrap();
    let stored: Value = app
        .client
        .get(app.url(&format!("/api/invoices/{}", invoice_id)))
        .send()
        .await
        .expect("Failed to get invoice")
        .json()
        .await
        .expect("Invalid body");
    assert_eq!(stored["total"], invoice["total"]);
}

#[tokio::test]
async fn percentage_discount_taxes_the_post_discount_amount() {
    let app = spawn_app().await;

    // 5 boxes of prod-001 (240) = 1200.
    let invoice = finalize_invoice(
        &app,
        None,
        &[("prod-001", 5, 0)],
        Some(json!({ "type": "percentage", "value": "10" })),
        Some(json!({ "type": "gst", "value": "5" })),
    )
    .await;

    assert_eq!(dec(&invoice["discount_amount"]), Decimal::from(120));
    assert_eq!(dec(&invoice["tax_amount"]), Decimal::from(54));
    assert_eq!(dec(&invoice["total"]), Decimal::from(1134));
    assert!(invoice["customer_name"].is_null());
}

#[tokio::test]
async fn finalized_draft_is_gone_and_invoice_numbers_increment() {
    let app = spawn_app().await;

    let first = finalize_invoice(&app, None, &[("prod-001", 1, 0)], None, None).await;
    let second = finalize_invoice(&app, None, &[("prod-003", 1, 0)], None, None).await;

    let first_number = first["invoice_number"].as_str().unwrap();
    let second_number = second["invoice_number"].as_str().unwrap();
    assert!(first_number.ends_with("0001"));
    assert!(second_number.ends_with("0002"));
}

#[tokio::test]
async fn operations_on_a_missing_draft_are_404() {
    let app = spawn_app().await;
    let missing = "00000000-0000-0000-0000-000000000000";

    let response = app
        .client
        .get(app.url(&format!("/api/invoices/drafts/{}", missing)))
        .send()
        .await
        .expect("Failed to get draft");
    assert_eq!(response.status().as_u16(), 404);

    let response = app
        .client
        .post(app.url(&format!("/api/invoices/drafts/{}/finalize", missing)))
        .send()
        .await
        .expect("Failed to finalize");
    assert_eq!(response.status().as_u16(), 404);

    // Discard stays idempotent even for unknown drafts.
    let response = app
        .client
        .delete(app.url(&format!("/api/invoices/drafts/{}", missing)))
        .send()
        .await
        .expect("Failed to discard");
    assert_eq!(response.status().as_u16(), 204);
}

#[tokio::test]
async fn finalize_stages_the_invoice_print_slot_once() {
    let app = spawn_app().await;

    let invoice = finalize_invoice(&app, None, &[("prod-001", 1, 0)], None, None).await;

    let staged = app
        .client
        .get(app.url("/api/print/invoice"))
        .send()
        .await
        .expect("Failed to take print slot");
    assert_eq!(staged.status().as_u16(), 200);
    let staged: Value = staged.json().await.expect("Invalid body");
    assert_eq!(staged["id"], invoice["id"]);

    // The slot is one-shot.
    let empty = app
        .client
        .get(app.url("/api/print/invoice"))
        .send()
        .await
        .expect("Failed to take print slot");
    assert_eq!(empty.status().as_u16(), 404);
}
