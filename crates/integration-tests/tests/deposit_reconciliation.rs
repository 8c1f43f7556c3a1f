//! Reconciliation pipeline: webhook payload JSON in, balance decision out.
//!
//! Follows the order-paid path: the REST payload is parsed, flattened to a
//! snapshot, and fed through the balance heuristics, including the
//! collection-request correlation attribute written during manual
//! balance collection.

use deposit_pro_admin::deposit::{
    BalanceUpdate, DepositSource, COLLECTION_REQUEST_ATTR, plan_balance_update,
    payment_breakdown, resolve_deposit,
};
use deposit_pro_admin::webhooks::payload::OrderStatusPayload;
use rust_decimal::Decimal;
use uuid::Uuid;

fn payload(value: serde_json::Value) -> OrderStatusPayload {
    serde_json::from_value(value).unwrap()
}

#[test]
fn deposit_attribute_wins_over_tags_and_estimate() {
    let payload = payload(serde_json::json!({
        "id": 1001,
        "financial_status": "partially_paid",
        "total_price": "2400.00",
        "currency": "USD",
        "tags": "deposit-720, safari",
        "note_attributes": [{ "name": "deposit_amount", "value": "720.00" }],
        "line_items": []
    }));
    let snapshot = payload.to_snapshot();

    let resolution = resolve_deposit(&snapshot);
    assert_eq!(resolution.source, DepositSource::Attribute);
    assert_eq!(resolution.amount, Decimal::new(72_000, 2));
    assert!(!resolution.estimated);
}

#[test]
fn tag_amount_is_used_when_no_attribute_exists() {
    let payload = payload(serde_json::json!({
        "id": 1002,
        "financial_status": "partially_paid",
        "total_price": "2400.00",
        "currency": "USD",
        "tags": "safari, deposit-720",
        "note_attributes": [],
        "line_items": []
    }));

    let resolution = resolve_deposit(&payload.to_snapshot());
    assert_eq!(resolution.source, DepositSource::Tag);
    assert_eq!(resolution.amount, Decimal::from(720));
}

#[test]
fn partially_paid_order_without_markers_is_estimated() {
    let payload = payload(serde_json::json!({
        "id": 1003,
        "financial_status": "partially_paid",
        "total_price": "1000.00",
        "currency": "USD",
        "tags": "",
        "note_attributes": [],
        "line_items": []
    }));

    let resolution = resolve_deposit(&payload.to_snapshot());
    assert_eq!(resolution.source, DepositSource::Estimated);
    assert!(resolution.estimated);
    assert_eq!(resolution.amount, Decimal::new(30_000, 2));
}

#[test]
fn correlation_attribute_marks_the_balance_paid() {
    let request_id = Uuid::new_v4();
    let payload = payload(serde_json::json!({
        "id": 1004,
        "financial_status": "paid",
        "total_price": "2400.00",
        "currency": "USD",
        "tags": "",
        "note_attributes": [
            { "name": COLLECTION_REQUEST_ATTR, "value": request_id.to_string() }
        ],
        "line_items": []
    }));

    let update = plan_balance_update(&payload.to_snapshot(), false, Some(request_id));
    assert_eq!(update, BalanceUpdate::MarkPaid);
}

#[test]
fn mismatched_correlation_id_without_markers_is_a_noop() {
    let payload = payload(serde_json::json!({
        "id": 1005,
        "financial_status": "paid",
        "total_price": "2400.00",
        "currency": "USD",
        "tags": "",
        "note_attributes": [
            { "name": COLLECTION_REQUEST_ATTR, "value": Uuid::new_v4().to_string() }
        ],
        "line_items": []
    }));

    let update = plan_balance_update(&payload.to_snapshot(), false, Some(Uuid::new_v4()));
    assert_eq!(update, BalanceUpdate::NoOp);
}

#[test]
fn legacy_line_item_marker_still_fires() {
    // Orders collected before correlation ids were stored only carry the
    // custom fee line item.
    let payload = payload(serde_json::json!({
        "id": 1006,
        "financial_status": "paid",
        "total_price": "2472.00",
        "currency": "USD",
        "tags": "",
        "note_attributes": [],
        "line_items": [
            { "name": "Serengeti 5-Day Safari" },
            { "name": "Processing Fee (3%)" }
        ]
    }));

    let update = plan_balance_update(&payload.to_snapshot(), false, None);
    assert_eq!(update, BalanceUpdate::MarkPaid);
}

#[test]
fn already_paid_orders_are_not_updated_again() {
    let payload = payload(serde_json::json!({
        "id": 1007,
        "financial_status": "paid",
        "total_price": "2400.00",
        "currency": "USD",
        "tags": "",
        "note_attributes": [],
        "line_items": [{ "name": "Balance Payment" }]
    }));

    let update = plan_balance_update(&payload.to_snapshot(), true, None);
    assert_eq!(update, BalanceUpdate::NoOp);
}

#[test]
fn breakdown_reads_first_sale_as_the_deposit() {
    let payload = payload(serde_json::json!({
        "id": 1008,
        "financial_status": "partially_paid",
        "total_price": "2400.00",
        "currency": "USD",
        "tags": "",
        "note_attributes": [],
        "line_items": []
    }));
    let mut snapshot = payload.to_snapshot();
    snapshot.successful_sales = vec![Decimal::new(72_000, 2)];

    let breakdown = payment_breakdown(&snapshot);
    assert_eq!(breakdown.deposit, Some(Decimal::new(72_000, 2)));
    assert_eq!(breakdown.balance, Decimal::new(168_000, 2));
    assert!(!breakdown.balance_paid);
}
