//! Order queries and tag/attribute mutations.

use deposit_pro_core::types::CustomAttribute;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use super::types::{Connection, Order, UserError};
use super::{AdminClient, GatewayError, check_user_errors, queries};

/// Search query that matches every order a deposit could live on.
///
/// Deposit orders carry either the deposit tag or a partial/full payment
/// state, so this is intentionally broad and post-filtered locally.
pub const DEPOSIT_ORDER_SEARCH: &str =
    "tag:deposit OR financial_status:partially_paid OR financial_status:paid";

#[derive(Deserialize)]
struct GetOrderData {
    order: Option<Order>,
}

#[derive(Deserialize)]
struct SearchOrdersData {
    orders: Connection<Order>,
}

#[derive(Deserialize)]
struct TagsAddData {
    #[serde(rename = "tagsAdd")]
    tags_add: Option<TagsAddPayload>,
}

#[derive(Deserialize)]
struct TagsAddPayload {
    #[serde(rename = "userErrors", default)]
    user_errors: Vec<UserError>,
}

#[derive(Deserialize)]
struct OrderUpdateData {
    #[serde(rename = "orderUpdate")]
    order_update: Option<OrderUpdatePayload>,
}

#[derive(Deserialize)]
struct OrderUpdatePayload {
    #[serde(rename = "userErrors", default)]
    user_errors: Vec<UserError>,
}

impl AdminClient {
    /// Get an order by gid.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn get_order(&self, id: &str) -> Result<Option<Order>, GatewayError> {
        let data: GetOrderData = self
            .execute(queries::GET_ORDER, json!({ "id": id }))
            .await?;

        Ok(data.order)
    }

    /// Search orders with the Admin API query syntax, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn search_orders(&self, query: &str, first: i64) -> Result<Vec<Order>, GatewayError> {
        let data: SearchOrdersData = self
            .execute(queries::SEARCH_ORDERS, json!({ "query": query, "first": first }))
            .await?;

        Ok(data.orders.nodes)
    }

    /// Append tags to an order. Existing tags are left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn add_order_tags(&self, id: &str, tags: &[&str]) -> Result<(), GatewayError> {
        let data: TagsAddData = self
            .execute(queries::TAGS_ADD, json!({ "id": id, "tags": tags }))
            .await?;

        let payload = data.tags_add.ok_or_else(|| {
            GatewayError::NotFound(format!("Order {id} not found for tagging"))
        })?;

        check_user_errors(payload.user_errors)
    }

    /// Replace an order's custom attributes.
    ///
    /// The mutation replaces the whole list, so callers merge the existing
    /// attributes before adding a new one.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self, attributes), fields(order_id = %id))]
    pub async fn set_order_attributes(
        &self,
        id: &str,
        attributes: &[CustomAttribute],
    ) -> Result<(), GatewayError> {
        let data: OrderUpdateData = self
            .execute(
                queries::ORDER_UPDATE_ATTRIBUTES,
                json!({
                    "input": {
                        "id": id,
                        "customAttributes": attributes,
                    }
                }),
            )
            .await?;

        let payload = data.order_update.ok_or_else(|| {
            GatewayError::NotFound(format!("Order {id} not found for attribute update"))
        })?;

        check_user_errors(payload.user_errors)
    }
}
