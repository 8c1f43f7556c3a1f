//! Order-created ingest decisions.
//!
//! Decides whether a freshly created order becomes a tracked deposit order
//! and computes the row to insert. All money math happens on the matched
//! line item's total, not the whole order, since only that line was sold
//! under the deposit plan.

use chrono::{Duration, Utc};
use deposit_pro_core::types::{find_attribute, numeric_id};
use rust_decimal::Decimal;

use crate::db::deposit_orders::CreateDepositOrder;
use crate::db::deposit_plans::DepositPlan;
use crate::shopify::types::{LineItem, Order};

use super::reconcile::{
    ARRIVAL_KEYS, CATEGORY_KEYS, PICKUP_KEYS, TOUR_KEYS, TRAVELERS_KEYS, parse_arrival_date,
};

/// Why an order-created event did or did not produce a tracked order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestDecision {
    /// No line item was sold under a selling plan.
    SkipNoSellingPlan,
    /// The referenced selling plan has no deposit plan row in this shop.
    SkipNoMatchingPlan,
    /// A row for this order already exists.
    SkipAlreadyTracked,
    /// Insert a new tracked order.
    Ingest,
}

/// First line item carrying a selling plan association.
#[must_use]
pub fn deposit_line_item(order: &Order) -> Option<&LineItem> {
    order
        .line_items
        .nodes
        .iter()
        .find(|item| {
            item.selling_plan
                .as_ref()
                .is_some_and(|sp| sp.selling_plan_id.is_some())
        })
}

/// Decide what the order-created handler should do.
#[must_use]
pub fn plan_ingest(
    order: &Order,
    plan: Option<&DepositPlan>,
    already_tracked: bool,
) -> IngestDecision {
    if deposit_line_item(order).is_none() {
        return IngestDecision::SkipNoSellingPlan;
    }
    if plan.is_none() {
        return IngestDecision::SkipNoMatchingPlan;
    }
    if already_tracked {
        return IngestDecision::SkipAlreadyTracked;
    }
    IngestDecision::Ingest
}

/// Build the deposit-order row for an order matched to a plan.
///
/// The balance due date is the resolved arrival date when one exists;
/// otherwise the order's creation date plus the plan's grace period.
/// Returns `None` when the order has no selling-plan line item, which
/// callers rule out via [`plan_ingest`] first.
#[must_use]
pub fn build_deposit_order(
    shop_domain: &str,
    order: &Order,
    plan: &DepositPlan,
) -> Option<CreateDepositOrder> {
    let line_item = deposit_line_item(order)?;

    let total = line_item.original_total.shop_money.amount;
    let deposit = total * plan.deposit_percent / Decimal::ONE_HUNDRED;
    let balance = total - deposit;

    let mut attributes = order.custom_attributes.clone();
    attributes.extend(line_item.custom_attributes.iter().cloned());

    let arrival_date =
        find_attribute(&attributes, ARRIVAL_KEYS).and_then(parse_arrival_date);

    let created_at = chrono::DateTime::parse_from_rfc3339(&order.created_at)
        .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));
    let balance_due_date = arrival_date
        .unwrap_or(created_at + Duration::days(i64::from(plan.balance_due_days)));

    let customer = order.customer.clone().unwrap_or_default();
    let travelers = find_attribute(&attributes, TRAVELERS_KEYS)
        .and_then(|raw| raw.trim().parse::<i32>().ok());

    Some(CreateDepositOrder {
        shop_domain: shop_domain.to_string(),
        order_id: numeric_id(&order.id).to_string(),
        order_gid: order.id.clone(),
        order_number: order.name.clone(),
        customer_email: customer.email.clone(),
        customer_name: customer.display_name(),
        customer_phone: customer.phone.clone(),
        tour_name: find_attribute(&attributes, TOUR_KEYS)
            .map(ToString::to_string)
            .or_else(|| Some(line_item.title.clone())),
        travelers,
        arrival_date,
        pickup_address: find_attribute(&attributes, PICKUP_KEYS).map(ToString::to_string),
        camp_category: find_attribute(&attributes, CATEGORY_KEYS).map(ToString::to_string),
        total_amount: total,
        deposit_amount: deposit,
        balance_amount: balance,
        currency: line_item.original_total.shop_money.currency_code.clone(),
        balance_due_date,
        selling_plan_id: line_item
            .selling_plan
            .as_ref()
            .and_then(|sp| sp.selling_plan_id.as_deref())
            .map(|gid| numeric_id(gid).to_string())
            .unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shopify::types::{Connection, Customer, Money, MoneyBag, SellingPlanRef};
    use chrono::TimeZone;
    use deposit_pro_core::types::CustomAttribute;
    use std::str::FromStr;
    use uuid::Uuid;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn money(amount: &str) -> MoneyBag {
        MoneyBag {
            shop_money: Money {
                amount: dec(amount),
                currency_code: "USD".to_string(),
            },
        }
    }

    fn line_item(total: &str, selling_plan: Option<&str>) -> LineItem {
        LineItem {
            id: "gid://shopify/LineItem/1".to_string(),
            title: "Desert Tour".to_string(),
            quantity: 1,
            original_total: money(total),
            selling_plan: selling_plan.map(|id| SellingPlanRef {
                selling_plan_id: Some(id.to_string()),
                name: Some("15% Deposit".to_string()),
            }),
            custom_attributes: vec![],
        }
    }

    fn order(items: Vec<LineItem>) -> Order {
        Order {
            id: "gid://shopify/Order/4242".to_string(),
            name: "#1042".to_string(),
            created_at: "2026-08-01T12:00:00Z".to_string(),
            note: None,
            tags: vec![],
            display_financial_status: None,
            total_price: money("1000.00"),
            total_outstanding: None,
            customer: Some(Customer {
                email: Some("amina@example.com".to_string()),
                first_name: Some("Amina".to_string()),
                last_name: Some("Tazi".to_string()),
                phone: None,
            }),
            custom_attributes: vec![],
            line_items: Connection { nodes: items },
            transactions: vec![],
        }
    }

    fn plan(percent: &str, due_days: i32) -> DepositPlan {
        DepositPlan {
            id: Uuid::new_v4(),
            shop_domain: "camp.myshopify.com".to_string(),
            selling_plan_id: "777".to_string(),
            selling_plan_gid: "gid://shopify/SellingPlan/777".to_string(),
            group_id: "gid://shopify/SellingPlanGroup/9".to_string(),
            plan_name: "Tour deposit".to_string(),
            merchant_code: "tour-deposit".to_string(),
            description: None,
            deposit_percent: dec(percent),
            balance_due_days: due_days,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn skips_orders_without_selling_plan_line_items() {
        let order = order(vec![line_item("1000.00", None)]);
        assert_eq!(
            plan_ingest(&order, Some(&plan("15", 14)), false),
            IngestDecision::SkipNoSellingPlan
        );
    }

    #[test]
    fn skips_orders_without_a_matching_plan() {
        let order = order(vec![line_item(
            "1000.00",
            Some("gid://shopify/SellingPlan/777"),
        )]);
        assert_eq!(
            plan_ingest(&order, None, false),
            IngestDecision::SkipNoMatchingPlan
        );
    }

    #[test]
    fn skips_already_tracked_orders() {
        let order = order(vec![line_item(
            "1000.00",
            Some("gid://shopify/SellingPlan/777"),
        )]);
        assert_eq!(
            plan_ingest(&order, Some(&plan("15", 14)), true),
            IngestDecision::SkipAlreadyTracked
        );
    }

    #[test]
    fn computes_amounts_from_the_matched_line_item() {
        // A second, plan-less line item must not leak into the totals.
        let order = order(vec![
            line_item("1000.00", Some("gid://shopify/SellingPlan/777")),
            line_item("500.00", None),
        ]);
        let row = build_deposit_order("camp.myshopify.com", &order, &plan("15", 14)).unwrap();

        assert_eq!(row.total_amount, dec("1000.00"));
        assert_eq!(row.deposit_amount, dec("150.00"));
        assert_eq!(row.balance_amount, dec("850.00"));
        assert_eq!(row.order_id, "4242");
        assert_eq!(row.order_gid, "gid://shopify/Order/4242");
        assert_eq!(row.selling_plan_id, "777");
        assert_eq!(row.currency, "USD");
        assert_eq!(row.customer_name.as_deref(), Some("Amina Tazi"));
    }

    #[test]
    fn arrival_date_sets_the_balance_due_date() {
        let mut o = order(vec![line_item(
            "1000.00",
            Some("gid://shopify/SellingPlan/777"),
        )]);
        o.custom_attributes = vec![CustomAttribute::new("Arrival Date", "2026-09-15")];

        let row = build_deposit_order("camp.myshopify.com", &o, &plan("15", 14)).unwrap();
        let expected = Utc.with_ymd_and_hms(2026, 9, 15, 0, 0, 0).unwrap();
        assert_eq!(row.balance_due_date, expected);
        assert_eq!(row.arrival_date, Some(expected));
    }

    #[test]
    fn missing_arrival_falls_back_to_created_plus_grace() {
        let o = order(vec![line_item(
            "1000.00",
            Some("gid://shopify/SellingPlan/777"),
        )]);
        let row = build_deposit_order("camp.myshopify.com", &o, &plan("15", 14)).unwrap();

        let expected = Utc.with_ymd_and_hms(2026, 8, 15, 12, 0, 0).unwrap();
        assert_eq!(row.balance_due_date, expected);
        assert_eq!(row.arrival_date, None);
    }
}
