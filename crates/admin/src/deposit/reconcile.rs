//! Best-effort reconciliation of deposit facts from raw order data.
//!
//! Checkout apps and older installs disagree on attribute spellings, tag
//! formats, and whether a deposit is recorded at all, so everything here is
//! a prioritized fallback chain that degrades to "no deposit detected"
//! instead of failing. Nothing in this module returns an error.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, Utc};
use deposit_pro_core::types::{CustomAttribute, FinancialStatus, find_attribute, parse_amount};
use regex::Regex;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::shopify::types::Order;

/// Known spellings for the arrival date, in priority order.
pub const ARRIVAL_KEYS: &[&str] = &[
    "arrival_date",
    "Arrival Date",
    "arrival date",
    "arrival",
    "check_in_date",
    "delivery_date",
];

/// Known spellings for an explicit deposit amount.
pub const DEPOSIT_KEYS: &[&str] = &["deposit_amount", "Deposit Amount", "deposit"];

/// Known spellings for the tour or package name.
pub const TOUR_KEYS: &[&str] = &["tour_name", "Tour Name", "tour", "package_name"];

/// Known spellings for the traveler count.
pub const TRAVELERS_KEYS: &[&str] = &["travelers", "Travelers", "number_of_travelers", "guests", "pax"];

/// Known spellings for the pickup address.
pub const PICKUP_KEYS: &[&str] = &["pickup_address", "Pickup Address", "pickup", "pickup_location"];

/// Known spellings for the accommodation category.
pub const CATEGORY_KEYS: &[&str] = &["camp_category", "Camp Category", "category", "accommodation"];

/// Note attribute carrying the balance-collection correlation id.
pub const COLLECTION_REQUEST_ATTR: &str = "deposit_collection_request";

/// Line item title substrings written by the balance-collection action.
const BALANCE_ITEM_MARKERS: &[&str] = &["Balance Payment", "Processing Fee"];

/// Note substring written by the balance-collection action.
const BALANCE_NOTE_MARKER: &str = "processing fee";

/// Fraction of total price assumed paid when a partially-paid order has no
/// recorded deposit amount.
pub const ESTIMATE_FRACTION: Decimal = Decimal::from_parts(30, 0, 0, false, 2);

/// Loose decimal token, as written in tags like `deposit:120.50`.
static AMOUNT_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+(?:\.[0-9]+)?").unwrap());

/// Dimensionless view of an order, carrying only the fields reconciliation
/// reads. Built from a full API order or assembled directly from a webhook
/// payload.
#[derive(Debug, Clone, Default)]
pub struct OrderSnapshot {
    /// Order plus line-item custom attributes, order-level first.
    pub custom_attributes: Vec<CustomAttribute>,
    pub tags: Vec<String>,
    pub financial_status: FinancialStatus,
    pub total_price: Decimal,
    pub currency: String,
    /// Amounts of successful SALE/CAPTURE transactions, oldest first.
    pub successful_sales: Vec<Decimal>,
    pub line_item_titles: Vec<String>,
    pub note: Option<String>,
}

impl From<&Order> for OrderSnapshot {
    fn from(order: &Order) -> Self {
        let mut custom_attributes = order.custom_attributes.clone();
        for item in &order.line_items.nodes {
            custom_attributes.extend(item.custom_attributes.iter().cloned());
        }

        let successful_sales = order
            .transactions
            .iter()
            .filter(|t| t.is_successful_sale())
            .map(|t| t.amount.shop_money.amount)
            .collect();

        Self {
            custom_attributes,
            tags: order.tags.clone(),
            financial_status: order.financial_status(),
            total_price: order.total_price.shop_money.amount,
            currency: order.total_price.shop_money.currency_code.clone(),
            successful_sales,
            line_item_titles: order
                .line_items
                .nodes
                .iter()
                .map(|i| i.title.clone())
                .collect(),
            note: order.note.clone(),
        }
    }
}

/// Where a resolved deposit amount came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepositSource {
    /// Explicit custom attribute.
    Attribute,
    /// Numeric token in a deposit tag.
    Tag,
    /// Estimated from the partial-payment status.
    Estimated,
    /// Nothing found.
    None,
}

/// Outcome of deposit-amount resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositResolution {
    pub exists: bool,
    pub amount: Decimal,
    pub estimated: bool,
    pub source: DepositSource,
}

impl DepositResolution {
    fn none() -> Self {
        Self {
            exists: false,
            amount: Decimal::ZERO,
            estimated: false,
            source: DepositSource::None,
        }
    }
}

/// Resolve the deposit amount for an order.
///
/// Fallback chain: explicit attribute, then a numeric token in a tag
/// containing "deposit", then a fixed-fraction estimate when the order is
/// partially paid, then nothing.
#[must_use]
pub fn resolve_deposit(snapshot: &OrderSnapshot) -> DepositResolution {
    if let Some(raw) = find_attribute(&snapshot.custom_attributes, DEPOSIT_KEYS)
        && let Some(amount) = parse_amount(raw)
    {
        return DepositResolution {
            exists: true,
            amount,
            estimated: false,
            source: DepositSource::Attribute,
        };
    }

    if let Some(amount) = deposit_from_tags(&snapshot.tags) {
        return DepositResolution {
            exists: true,
            amount,
            estimated: false,
            source: DepositSource::Tag,
        };
    }

    if snapshot.financial_status.is_partial() {
        return DepositResolution {
            exists: true,
            amount: snapshot.total_price * ESTIMATE_FRACTION,
            estimated: true,
            source: DepositSource::Estimated,
        };
    }

    DepositResolution::none()
}

/// Extract an amount from the first tag mentioning "deposit".
///
/// The last numeric token in the tag wins, so `deposit-2024:150.00`
/// resolves to 150.00 rather than 2024.
fn deposit_from_tags(tags: &[String]) -> Option<Decimal> {
    for tag in tags {
        if !tag.to_ascii_lowercase().contains("deposit") {
            continue;
        }
        if let Some(m) = AMOUNT_TOKEN.find_iter(tag).last()
            && let Some(amount) = parse_amount(m.as_str())
        {
            return Some(amount);
        }
    }
    None
}

/// Remaining balance after the deposit, floored at zero.
#[must_use]
pub fn remaining_balance(total: Decimal, deposit: Decimal) -> Decimal {
    (total - deposit).max(Decimal::ZERO)
}

/// Payment state reconstructed from an order's transaction history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentBreakdown {
    /// First successful sale, read as the checkout deposit charge.
    pub deposit: Option<Decimal>,
    pub total_paid: Decimal,
    pub balance: Decimal,
    pub balance_paid: bool,
}

/// Reconstruct deposit/paid/balance figures from transactions.
///
/// The first successful sale is taken as the deposit. The balance is
/// considered paid when less than a cent remains outstanding or the
/// platform already reports the order fully paid.
#[must_use]
pub fn payment_breakdown(snapshot: &OrderSnapshot) -> PaymentBreakdown {
    let deposit = snapshot.successful_sales.first().copied();
    let total_paid: Decimal = snapshot.successful_sales.iter().copied().sum();
    let balance = remaining_balance(snapshot.total_price, total_paid);

    let cent = Decimal::new(1, 2);
    let balance_paid = balance < cent || snapshot.financial_status == FinancialStatus::Paid;

    PaymentBreakdown {
        deposit,
        total_paid,
        balance,
        balance_paid,
    }
}

/// Parse an arrival date written as a bare date or an RFC 3339 timestamp.
#[must_use]
pub fn parse_arrival_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Decide whether the outstanding balance was collected.
///
/// The correlation attribute written by the collection action is checked
/// first; the literal string heuristics remain as a fallback for orders
/// collected before the attribute existed.
#[must_use]
pub fn balance_collected(snapshot: &OrderSnapshot, expected_request: Option<Uuid>) -> bool {
    if !snapshot.financial_status.is_paid_or_partial() {
        return false;
    }

    if let Some(expected) = expected_request
        && let Some(raw) = find_attribute(&snapshot.custom_attributes, &[COLLECTION_REQUEST_ATTR])
        && raw.trim().parse::<Uuid>() == Ok(expected)
    {
        return true;
    }

    let item_marker = snapshot.line_item_titles.iter().any(|title| {
        BALANCE_ITEM_MARKERS
            .iter()
            .any(|marker| title.contains(marker))
    });
    if item_marker {
        return true;
    }

    let note_marker = snapshot
        .note
        .as_deref()
        .is_some_and(|note| note.to_ascii_lowercase().contains(BALANCE_NOTE_MARKER));
    if note_marker {
        return true;
    }

    // The marker may also live in a note-attribute value on orders
    // collected before the correlation id existed.
    snapshot
        .custom_attributes
        .iter()
        .any(|attr| attr.value.to_ascii_lowercase().contains(BALANCE_NOTE_MARKER))
}

/// What a balance-update webhook should do with a tracked order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceUpdate {
    /// Flip the local flag (and, for order-paid, tag the platform order).
    MarkPaid,
    /// Redelivery or the heuristic did not fire.
    NoOp,
}

/// Decide the balance transition for an order-paid/order-updated event.
#[must_use]
pub fn plan_balance_update(
    snapshot: &OrderSnapshot,
    already_paid: bool,
    expected_request: Option<Uuid>,
) -> BalanceUpdate {
    if already_paid {
        return BalanceUpdate::NoOp;
    }
    if balance_collected(snapshot, expected_request) {
        BalanceUpdate::MarkPaid
    } else {
        BalanceUpdate::NoOp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn snapshot() -> OrderSnapshot {
        OrderSnapshot {
            total_price: dec("1000.00"),
            currency: "USD".to_string(),
            ..OrderSnapshot::default()
        }
    }

    #[test]
    fn deposit_attribute_wins_over_tag() {
        let mut snap = snapshot();
        snap.custom_attributes = vec![CustomAttribute::new("Deposit Amount", "250.00")];
        snap.tags = vec!["deposit:120.50".to_string()];

        let resolved = resolve_deposit(&snap);
        assert!(resolved.exists);
        assert_eq!(resolved.amount, dec("250.00"));
        assert_eq!(resolved.source, DepositSource::Attribute);
        assert!(!resolved.estimated);
    }

    #[test]
    fn deposit_tag_resolves_numeric_token() {
        let mut snap = snapshot();
        snap.tags = vec!["vip".to_string(), "deposit:120.50".to_string()];

        let resolved = resolve_deposit(&snap);
        assert!(resolved.exists);
        assert_eq!(resolved.amount, dec("120.50"));
        assert_eq!(resolved.source, DepositSource::Tag);
    }

    #[test]
    fn deposit_tag_takes_last_numeric_token() {
        assert_eq!(
            deposit_from_tags(&["deposit-2024:150.00".to_string()]),
            Some(dec("150.00"))
        );
    }

    #[test]
    fn deposit_tag_match_is_case_insensitive() {
        let mut snap = snapshot();
        snap.tags = vec!["Deposit 90".to_string()];
        assert_eq!(resolve_deposit(&snap).amount, dec("90"));
    }

    #[test]
    fn partial_payment_estimates_fixed_fraction() {
        let mut snap = snapshot();
        snap.financial_status = FinancialStatus::PartiallyPaid;

        let resolved = resolve_deposit(&snap);
        assert!(resolved.exists);
        assert!(resolved.estimated);
        assert_eq!(resolved.source, DepositSource::Estimated);
        assert_eq!(resolved.amount, dec("300.00"));
    }

    #[test]
    fn no_signal_resolves_to_no_deposit() {
        let resolved = resolve_deposit(&snapshot());
        assert!(!resolved.exists);
        assert_eq!(resolved.amount, Decimal::ZERO);
        assert_eq!(resolved.source, DepositSource::None);
    }

    #[test]
    fn remaining_balance_floors_at_zero() {
        assert_eq!(remaining_balance(dec("100"), dec("30")), dec("70"));
        assert_eq!(remaining_balance(dec("100"), dec("150")), Decimal::ZERO);
    }

    #[test]
    fn breakdown_reads_first_sale_as_deposit() {
        let mut snap = snapshot();
        snap.successful_sales = vec![dec("300.00"), dec("700.00")];

        let breakdown = payment_breakdown(&snap);
        assert_eq!(breakdown.deposit, Some(dec("300.00")));
        assert_eq!(breakdown.total_paid, dec("1000.00"));
        assert_eq!(breakdown.balance, Decimal::ZERO);
        assert!(breakdown.balance_paid);
    }

    #[test]
    fn breakdown_with_only_deposit_leaves_balance_open() {
        let mut snap = snapshot();
        snap.financial_status = FinancialStatus::PartiallyPaid;
        snap.successful_sales = vec![dec("300.00")];

        let breakdown = payment_breakdown(&snap);
        assert_eq!(breakdown.balance, dec("700.00"));
        assert!(!breakdown.balance_paid);
    }

    #[test]
    fn arrival_date_parses_both_forms() {
        assert!(parse_arrival_date("2026-09-15").is_some());
        assert!(parse_arrival_date("2026-09-15T10:00:00Z").is_some());
        assert!(parse_arrival_date("next tuesday").is_none());
    }

    #[test]
    fn balance_collected_by_processing_fee_line_item() {
        let mut snap = snapshot();
        snap.financial_status = FinancialStatus::Paid;
        snap.line_item_titles = vec!["Desert Tour".to_string(), "Processing Fee (3%)".to_string()];

        assert!(balance_collected(&snap, None));
    }

    #[test]
    fn balance_collected_by_note_marker() {
        let mut snap = snapshot();
        snap.financial_status = FinancialStatus::PartiallyPaid;
        snap.note = Some("Processing fee added for balance collection".to_string());

        assert!(balance_collected(&snap, None));
    }

    #[test]
    fn balance_collected_by_note_attribute_value() {
        let mut snap = snapshot();
        snap.financial_status = FinancialStatus::Paid;
        snap.custom_attributes = vec![CustomAttribute::new(
            "balance_note",
            "Processing fee added for balance collection",
        )];

        assert!(balance_collected(&snap, None));
        assert_eq!(
            plan_balance_update(&snap, false, None),
            BalanceUpdate::MarkPaid
        );
    }

    #[test]
    fn balance_collected_by_correlation_attribute() {
        let request = Uuid::new_v4();
        let mut snap = snapshot();
        snap.financial_status = FinancialStatus::Paid;
        snap.custom_attributes = vec![CustomAttribute::new(
            COLLECTION_REQUEST_ATTR,
            request.to_string(),
        )];

        assert!(balance_collected(&snap, Some(request)));
        assert!(!balance_collected(&snap, Some(Uuid::new_v4())));
    }

    #[test]
    fn balance_not_collected_without_paid_status() {
        let mut snap = snapshot();
        snap.financial_status = FinancialStatus::Pending;
        snap.line_item_titles = vec!["Balance Payment".to_string()];

        assert!(!balance_collected(&snap, None));
    }

    #[test]
    fn already_paid_order_is_a_noop() {
        let mut snap = snapshot();
        snap.financial_status = FinancialStatus::Paid;
        snap.line_item_titles = vec!["Processing Fee (3%)".to_string()];

        assert_eq!(plan_balance_update(&snap, true, None), BalanceUpdate::NoOp);
        assert_eq!(
            plan_balance_update(&snap, false, None),
            BalanceUpdate::MarkPaid
        );
    }
}
