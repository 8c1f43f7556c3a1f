//! End-to-end ingest pipeline: GraphQL order JSON in, tracked-order row out.
//!
//! Exercises the same path the order-created webhook takes after fetching
//! the order, including the serde mapping from Admin API field names.

use chrono::{DateTime, TimeZone, Utc};
use deposit_pro_admin::db::deposit_plans::DepositPlan;
use deposit_pro_admin::deposit::{IngestDecision, build_deposit_order, plan_ingest};
use deposit_pro_admin::shopify::types::Order;
use rust_decimal::Decimal;
use uuid::Uuid;

fn plan(percent: i64, balance_due_days: i32) -> DepositPlan {
    let now = Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).single();
    DepositPlan {
        id: Uuid::new_v4(),
        shop_domain: "safari-tours.myshopify.com".to_string(),
        selling_plan_id: "987".to_string(),
        selling_plan_gid: "gid://shopify/SellingPlan/987".to_string(),
        group_id: "gid://shopify/SellingPlanGroup/55".to_string(),
        plan_name: "30% Deposit".to_string(),
        merchant_code: "30-deposit".to_string(),
        description: None,
        deposit_percent: Decimal::from(percent),
        balance_due_days,
        is_active: true,
        created_at: now.unwrap_or_default(),
        updated_at: now.unwrap_or_default(),
    }
}

fn order_json(selling_plan: Option<&str>, attributes: serde_json::Value) -> serde_json::Value {
    let selling_plan = selling_plan.map(|id| {
        serde_json::json!({ "sellingPlanId": id, "name": "30% Deposit" })
    });
    serde_json::json!({
        "id": "gid://shopify/Order/1001",
        "name": "#1001",
        "createdAt": "2026-02-01T09:30:00Z",
        "note": null,
        "tags": [],
        "displayFinancialStatus": "PARTIALLY_PAID",
        "totalPriceSet": { "shopMoney": { "amount": "2400.00", "currencyCode": "USD" } },
        "totalOutstandingSet": { "shopMoney": { "amount": "1680.00", "currencyCode": "USD" } },
        "customer": {
            "email": "jess@example.com",
            "firstName": "Jess",
            "lastName": "Okafor",
            "phone": null
        },
        "customAttributes": attributes,
        "lineItems": {
            "nodes": [{
                "id": "gid://shopify/LineItem/1",
                "title": "Serengeti 5-Day Safari",
                "quantity": 2,
                "originalTotalSet": {
                    "shopMoney": { "amount": "2400.00", "currencyCode": "USD" }
                },
                "sellingPlan": selling_plan,
                "customAttributes": [
                    { "key": "travelers", "value": "2" },
                    { "key": "pickup_address", "value": "Kilimanjaro Airport" }
                ]
            }]
        },
        "transactions": [{
            "id": "gid://shopify/OrderTransaction/1",
            "kind": "SALE",
            "status": "SUCCESS",
            "amountSet": { "shopMoney": { "amount": "720.00", "currencyCode": "USD" } },
            "createdAt": "2026-02-01T09:30:05Z"
        }]
    })
}

fn parse_order(value: serde_json::Value) -> Order {
    serde_json::from_value(value).unwrap()
}

#[test]
fn order_with_matching_plan_is_ingested() {
    let order = parse_order(order_json(
        Some("gid://shopify/SellingPlan/987"),
        serde_json::json!([{ "key": "arrival_date", "value": "2026-06-15" }]),
    ));
    let plan = plan(30, 60);

    assert_eq!(plan_ingest(&order, Some(&plan), false), IngestDecision::Ingest);

    let row = build_deposit_order("safari-tours.myshopify.com", &order, &plan).unwrap();
    assert_eq!(row.order_gid, "gid://shopify/Order/1001");
    assert_eq!(row.order_number, "#1001");
    assert_eq!(row.total_amount, Decimal::new(240_000, 2));
    assert_eq!(row.deposit_amount, Decimal::new(72_000, 2));
    assert_eq!(row.balance_amount, Decimal::new(168_000, 2));
    assert_eq!(row.currency, "USD");
    assert_eq!(row.customer_email.as_deref(), Some("jess@example.com"));
    assert_eq!(row.customer_name.as_deref(), Some("Jess Okafor"));
    assert_eq!(row.travelers, Some(2));
    assert_eq!(row.pickup_address.as_deref(), Some("Kilimanjaro Airport"));
}

#[test]
fn arrival_date_becomes_the_balance_due_date() {
    let order = parse_order(order_json(
        Some("gid://shopify/SellingPlan/987"),
        serde_json::json!([{ "key": "arrival_date", "value": "2026-06-15" }]),
    ));

    let row = build_deposit_order("safari-tours.myshopify.com", &order, &plan(30, 60)).unwrap();

    let arrival: DateTime<Utc> = row.arrival_date.unwrap();
    assert_eq!(arrival.date_naive().to_string(), "2026-06-15");
    assert_eq!(row.balance_due_date, arrival);
}

#[test]
fn missing_arrival_falls_back_to_plan_terms() {
    let order = parse_order(order_json(
        Some("gid://shopify/SellingPlan/987"),
        serde_json::json!([]),
    ));

    let row = build_deposit_order("safari-tours.myshopify.com", &order, &plan(30, 45)).unwrap();

    assert!(row.arrival_date.is_none());
    // 45 days from the order's createdAt.
    assert_eq!(row.balance_due_date.date_naive().to_string(), "2026-03-18");
}

#[test]
fn order_without_selling_plan_is_skipped() {
    let order = parse_order(order_json(None, serde_json::json!([])));

    assert_eq!(
        plan_ingest(&order, Some(&plan(30, 60)), false),
        IngestDecision::SkipNoSellingPlan
    );
}

#[test]
fn order_with_unknown_selling_plan_is_skipped() {
    let order = parse_order(order_json(
        Some("gid://shopify/SellingPlan/42"),
        serde_json::json!([]),
    ));

    assert_eq!(plan_ingest(&order, None, false), IngestDecision::SkipNoMatchingPlan);
}

#[test]
fn redelivered_order_is_skipped() {
    let order = parse_order(order_json(
        Some("gid://shopify/SellingPlan/987"),
        serde_json::json!([]),
    ));

    assert_eq!(
        plan_ingest(&order, Some(&plan(30, 60)), true),
        IngestDecision::SkipAlreadyTracked
    );
}
