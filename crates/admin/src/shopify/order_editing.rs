//! Order editing operations for the Admin API.
//!
//! The balance-collection flow is a three step edit session: begin,
//! add the fee as a custom line item, commit with customer notification.
//! Committing raises the order total, which makes Shopify email the
//! customer a payment request for the outstanding amount.

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use super::types::UserError;
use super::{AdminClient, GatewayError, GraphQLError, check_user_errors, queries};

#[derive(Deserialize)]
struct OrderEditBeginData {
    #[serde(rename = "orderEditBegin")]
    payload: Option<OrderEditBeginPayload>,
}

#[derive(Deserialize)]
struct OrderEditBeginPayload {
    #[serde(rename = "calculatedOrder")]
    calculated_order: Option<CalculatedOrderRef>,
    #[serde(rename = "userErrors", default)]
    user_errors: Vec<UserError>,
}

#[derive(Deserialize)]
struct CalculatedOrderRef {
    id: String,
}

#[derive(Deserialize)]
struct OrderEditAddCustomItemData {
    #[serde(rename = "orderEditAddCustomItem")]
    payload: Option<OrderEditAddCustomItemPayload>,
}

#[derive(Deserialize)]
struct OrderEditAddCustomItemPayload {
    #[serde(rename = "userErrors", default)]
    user_errors: Vec<UserError>,
}

#[derive(Deserialize)]
struct OrderEditCommitData {
    #[serde(rename = "orderEditCommit")]
    payload: Option<OrderEditCommitPayload>,
}

#[derive(Deserialize)]
struct OrderEditCommitPayload {
    order: Option<CalculatedOrderRef>,
    #[serde(rename = "userErrors", default)]
    user_errors: Vec<UserError>,
}

fn edit_failed(what: &str) -> GatewayError {
    GatewayError::GraphQL(vec![GraphQLError {
        message: format!("{what} failed"),
        path: vec![],
    }])
}

impl AdminClient {
    /// Begin an order edit session.
    ///
    /// Returns the calculated order id that the other edit mutations
    /// operate on until commit.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self), fields(order_id = %order_gid))]
    pub async fn order_edit_begin(&self, order_gid: &str) -> Result<String, GatewayError> {
        let data: OrderEditBeginData = self
            .execute(queries::ORDER_EDIT_BEGIN, json!({ "id": order_gid }))
            .await?;

        let payload = data.payload.ok_or_else(|| edit_failed("Order edit begin"))?;
        check_user_errors(payload.user_errors)?;

        payload
            .calculated_order
            .map(|c| c.id)
            .ok_or_else(|| edit_failed("Order edit begin"))
    }

    /// Add a custom line item to an order edit.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self), fields(calc_order_id = %calculated_order_id, title = %title))]
    pub async fn order_edit_add_custom_item(
        &self,
        calculated_order_id: &str,
        title: &str,
        amount: Decimal,
        currency_code: &str,
        quantity: i64,
    ) -> Result<(), GatewayError> {
        let data: OrderEditAddCustomItemData = self
            .execute(
                queries::ORDER_EDIT_ADD_CUSTOM_ITEM,
                json!({
                    "id": calculated_order_id,
                    "title": title,
                    "price": {
                        "amount": amount.round_dp(2).to_string(),
                        "currencyCode": currency_code,
                    },
                    "quantity": quantity,
                }),
            )
            .await?;

        let payload = data
            .payload
            .ok_or_else(|| edit_failed("Order edit add custom item"))?;
        check_user_errors(payload.user_errors)
    }

    /// Commit an order edit, finalizing all changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self), fields(calc_order_id = %calculated_order_id))]
    pub async fn order_edit_commit(
        &self,
        calculated_order_id: &str,
        notify_customer: bool,
        staff_note: Option<&str>,
    ) -> Result<String, GatewayError> {
        let data: OrderEditCommitData = self
            .execute(
                queries::ORDER_EDIT_COMMIT,
                json!({
                    "id": calculated_order_id,
                    "notifyCustomer": notify_customer,
                    "staffNote": staff_note,
                }),
            )
            .await?;

        let payload = data
            .payload
            .ok_or_else(|| edit_failed("Order edit commit"))?;
        check_user_errors(payload.user_errors)?;

        payload
            .order
            .map(|o| o.id)
            .ok_or_else(|| edit_failed("Order edit commit"))
    }
}
