//! Typed views over Admin API GraphQL responses.
//!
//! Field selections in [`super::queries`] are written against these shapes;
//! both must change together. Money amounts come back as decimal strings
//! and are parsed into `Decimal` at the boundary.

use deposit_pro_core::types::{CustomAttribute, FinancialStatus};
use rust_decimal::Decimal;
use serde::Deserialize;

/// A monetary amount with its currency.
#[derive(Debug, Clone, Deserialize)]
pub struct Money {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    #[serde(rename = "currencyCode")]
    pub currency_code: String,
}

/// A money bag; only the shop-currency leg is selected.
#[derive(Debug, Clone, Deserialize)]
pub struct MoneyBag {
    #[serde(rename = "shopMoney")]
    pub shop_money: Money,
}

/// A user error attached to a mutation payload.
#[derive(Debug, Clone, Deserialize)]
pub struct UserError {
    pub field: Option<Vec<String>>,
    pub message: String,
}

/// Reference to the selling plan a line item was purchased under.
#[derive(Debug, Clone, Deserialize)]
pub struct SellingPlanRef {
    #[serde(rename = "sellingPlanId")]
    pub selling_plan_id: Option<String>,
    pub name: Option<String>,
}

/// A line item on an order.
#[derive(Debug, Clone, Deserialize)]
pub struct LineItem {
    pub id: String,
    pub title: String,
    pub quantity: i64,
    #[serde(rename = "originalTotalSet")]
    pub original_total: MoneyBag,
    #[serde(rename = "sellingPlan")]
    pub selling_plan: Option<SellingPlanRef>,
    #[serde(rename = "customAttributes", default)]
    pub custom_attributes: Vec<CustomAttribute>,
}

/// A customer attached to an order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Customer {
    pub email: Option<String>,
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
    pub phone: Option<String>,
}

impl Customer {
    /// Full display name, or `None` when both parts are absent.
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (None, None) => None,
            (first, last) => Some(
                [first, last]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
        }
    }
}

/// A payment transaction on an order.
#[derive(Debug, Clone, Deserialize)]
pub struct Transaction {
    pub id: String,
    /// SALE, CAPTURE, REFUND, etc.
    pub kind: String,
    /// SUCCESS, FAILURE, PENDING, etc.
    pub status: String,
    #[serde(rename = "amountSet")]
    pub amount: MoneyBag,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl Transaction {
    #[must_use]
    pub fn is_successful_sale(&self) -> bool {
        self.status.eq_ignore_ascii_case("SUCCESS")
            && (self.kind.eq_ignore_ascii_case("SALE") || self.kind.eq_ignore_ascii_case("CAPTURE"))
    }
}

/// An order fetched from the Admin API.
#[derive(Debug, Clone, Deserialize)]
pub struct Order {
    pub id: String,
    pub name: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    pub note: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Nullable in the schema for orders with no payment events yet.
    #[serde(rename = "displayFinancialStatus", default)]
    pub display_financial_status: Option<FinancialStatus>,
    #[serde(rename = "totalPriceSet")]
    pub total_price: MoneyBag,
    #[serde(rename = "totalOutstandingSet")]
    pub total_outstanding: Option<MoneyBag>,
    pub customer: Option<Customer>,
    #[serde(rename = "customAttributes", default)]
    pub custom_attributes: Vec<CustomAttribute>,
    #[serde(rename = "lineItems", default)]
    pub line_items: Connection<LineItem>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Order {
    #[must_use]
    pub fn financial_status(&self) -> FinancialStatus {
        self.display_financial_status.unwrap_or_default()
    }
}

/// A GraphQL connection, flattened to its nodes.
#[derive(Debug, Clone, Deserialize)]
pub struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub nodes: Vec<T>,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

/// A selling plan inside a group.
#[derive(Debug, Clone, Deserialize)]
pub struct SellingPlanSummary {
    pub id: String,
    pub name: String,
}

/// A selling plan group as returned by group mutations and queries.
#[derive(Debug, Clone, Deserialize)]
pub struct SellingPlanGroupSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "merchantCode")]
    pub merchant_code: String,
    #[serde(rename = "sellingPlans", default)]
    pub selling_plans: Connection<SellingPlanSummary>,
}

/// A registered webhook subscription.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookSubscription {
    pub id: String,
    pub topic: String,
    pub endpoint: Option<WebhookEndpoint>,
}

/// The HTTP endpoint of a webhook subscription.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEndpoint {
    #[serde(rename = "callbackUrl")]
    pub callback_url: Option<String>,
}

impl WebhookSubscription {
    #[must_use]
    pub fn callback_url(&self) -> Option<&str> {
        self.endpoint.as_ref()?.callback_url.as_deref()
    }
}
