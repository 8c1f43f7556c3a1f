//! Selling plan group management.
//!
//! Deposit plans surface at checkout as selling plan groups with a single
//! percentage deposit plan. The remaining balance is never auto-charged:
//! the trigger is set ten years out so collection always goes through the
//! manual balance flow.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use super::types::{Connection, SellingPlanGroupSummary, UserError};
use super::{AdminClient, GatewayError, GraphQLError, check_user_errors, queries};

/// Far-future remaining balance trigger, in days.
const BALANCE_CHARGE_HORIZON_DAYS: i32 = 3650;

/// Input for creating or updating a deposit selling plan group.
#[derive(Debug, Clone)]
pub struct DepositPlanInput {
    pub name: String,
    pub merchant_code: String,
    pub description: Option<String>,
    pub deposit_percent: Decimal,
}

impl DepositPlanInput {
    fn selling_plan_json(&self, existing_plan_gid: Option<&str>) -> serde_json::Value {
        let mut plan = json!({
            "name": format!("{}% Deposit", self.deposit_percent.normalize()),
            "category": "PRE_ORDER",
            "options": [format!("{}% Deposit", self.deposit_percent.normalize())],
            "billingPolicy": {
                "fixed": {
                    "checkoutCharge": {
                        "type": "PERCENTAGE",
                        "value": { "percentage": self.deposit_percent.to_f64().unwrap_or(0.0) },
                    },
                    "remainingBalanceChargeTrigger": "TIME_AFTER_CHECKOUT",
                    "remainingBalanceChargeTimeAfterCheckout":
                        format!("P{BALANCE_CHARGE_HORIZON_DAYS}D"),
                }
            },
            "deliveryPolicy": { "fixed": { "fulfillmentTrigger": "UNKNOWN" } },
            "inventoryPolicy": { "reserve": "ON_FULFILLMENT" },
        });
        if let (Some(gid), Some(obj)) = (existing_plan_gid, plan.as_object_mut()) {
            obj.insert("id".to_string(), json!(gid));
        }
        plan
    }
}

#[derive(Deserialize)]
struct GroupCreateData {
    #[serde(rename = "sellingPlanGroupCreate")]
    payload: Option<GroupPayload>,
}

#[derive(Deserialize)]
struct GroupUpdateData {
    #[serde(rename = "sellingPlanGroupUpdate")]
    payload: Option<GroupPayload>,
}

#[derive(Deserialize)]
struct GroupPayload {
    #[serde(rename = "sellingPlanGroup")]
    selling_plan_group: Option<SellingPlanGroupSummary>,
    #[serde(rename = "userErrors", default)]
    user_errors: Vec<UserError>,
}

#[derive(Deserialize)]
struct GroupDeleteData {
    #[serde(rename = "sellingPlanGroupDelete")]
    payload: Option<GroupDeletePayload>,
}

#[derive(Deserialize)]
struct GroupDeletePayload {
    #[serde(rename = "deletedSellingPlanGroupId")]
    deleted_selling_plan_group_id: Option<String>,
    #[serde(rename = "userErrors", default)]
    user_errors: Vec<UserError>,
}

#[derive(Deserialize)]
struct AddProductsData {
    #[serde(rename = "sellingPlanGroupAddProducts")]
    payload: Option<AddProductsPayload>,
}

#[derive(Deserialize)]
struct AddProductsPayload {
    #[serde(rename = "userErrors", default)]
    user_errors: Vec<UserError>,
}

#[derive(Deserialize)]
struct GetGroupsData {
    #[serde(rename = "sellingPlanGroups")]
    selling_plan_groups: Connection<SellingPlanGroupSummary>,
}

#[derive(Deserialize)]
struct CollectionProductsData {
    collection: Option<CollectionProducts>,
}

#[derive(Deserialize)]
struct CollectionProducts {
    products: Connection<ProductId>,
}

#[derive(Deserialize)]
struct ProductId {
    id: String,
}

fn missing_payload(what: &str) -> GatewayError {
    GatewayError::GraphQL(vec![GraphQLError {
        message: format!("No payload returned from {what}"),
        path: vec![],
    }])
}

impl AdminClient {
    /// Create a deposit selling plan group.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self, input), fields(merchant_code = %input.merchant_code))]
    pub async fn create_selling_plan_group(
        &self,
        input: &DepositPlanInput,
    ) -> Result<SellingPlanGroupSummary, GatewayError> {
        let variables = json!({
            "input": {
                "name": input.name,
                "merchantCode": input.merchant_code,
                "description": input.description,
                "options": ["Deposit"],
                "position": 1,
                "sellingPlansToCreate": [input.selling_plan_json(None)],
            },
            "resources": { "productIds": [] },
        });

        let data: GroupCreateData = self
            .execute(queries::SELLING_PLAN_GROUP_CREATE, variables)
            .await?;

        let payload = data
            .payload
            .ok_or_else(|| missing_payload("sellingPlanGroupCreate"))?;
        check_user_errors(payload.user_errors)?;

        payload
            .selling_plan_group
            .ok_or_else(|| missing_payload("sellingPlanGroupCreate"))
    }

    /// Update an existing deposit selling plan group in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self, input), fields(group_id = %group_gid))]
    pub async fn update_selling_plan_group(
        &self,
        group_gid: &str,
        selling_plan_gid: &str,
        input: &DepositPlanInput,
    ) -> Result<SellingPlanGroupSummary, GatewayError> {
        let variables = json!({
            "id": group_gid,
            "input": {
                "name": input.name,
                "merchantCode": input.merchant_code,
                "description": input.description,
                "sellingPlansToUpdate": [input.selling_plan_json(Some(selling_plan_gid))],
            },
        });

        let data: GroupUpdateData = self
            .execute(queries::SELLING_PLAN_GROUP_UPDATE, variables)
            .await?;

        let payload = data
            .payload
            .ok_or_else(|| missing_payload("sellingPlanGroupUpdate"))?;
        check_user_errors(payload.user_errors)?;

        payload
            .selling_plan_group
            .ok_or_else(|| missing_payload("sellingPlanGroupUpdate"))
    }

    /// Delete a selling plan group.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self), fields(group_id = %group_gid))]
    pub async fn delete_selling_plan_group(
        &self,
        group_gid: &str,
    ) -> Result<String, GatewayError> {
        let data: GroupDeleteData = self
            .execute(
                queries::SELLING_PLAN_GROUP_DELETE,
                json!({ "id": group_gid }),
            )
            .await?;

        let payload = data
            .payload
            .ok_or_else(|| missing_payload("sellingPlanGroupDelete"))?;
        check_user_errors(payload.user_errors)?;

        payload
            .deleted_selling_plan_group_id
            .ok_or_else(|| missing_payload("sellingPlanGroupDelete"))
    }

    /// Attach products to a selling plan group.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self, product_ids), fields(group_id = %group_gid, count = product_ids.len()))]
    pub async fn add_products_to_selling_plan_group(
        &self,
        group_gid: &str,
        product_ids: &[String],
    ) -> Result<(), GatewayError> {
        let data: AddProductsData = self
            .execute(
                queries::SELLING_PLAN_GROUP_ADD_PRODUCTS,
                json!({ "id": group_gid, "productIds": product_ids }),
            )
            .await?;

        let payload = data
            .payload
            .ok_or_else(|| missing_payload("sellingPlanGroupAddProducts"))?;
        check_user_errors(payload.user_errors)
    }

    /// List selling plan groups on the shop.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_selling_plan_groups(
        &self,
        first: i64,
    ) -> Result<Vec<SellingPlanGroupSummary>, GatewayError> {
        let data: GetGroupsData = self
            .execute(queries::GET_SELLING_PLAN_GROUPS, json!({ "first": first }))
            .await?;

        Ok(data.selling_plan_groups.nodes)
    }

    /// Resolve the product ids inside a collection.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::NotFound` when the collection does not exist.
    #[instrument(skip(self), fields(collection_id = %collection_gid))]
    pub async fn get_collection_product_ids(
        &self,
        collection_gid: &str,
        first: i64,
    ) -> Result<Vec<String>, GatewayError> {
        let data: CollectionProductsData = self
            .execute(
                queries::GET_COLLECTION_PRODUCT_IDS,
                json!({ "id": collection_gid, "first": first }),
            )
            .await?;

        let collection = data
            .collection
            .ok_or_else(|| GatewayError::NotFound(format!("Collection {collection_gid}")))?;

        Ok(collection
            .products
            .nodes
            .into_iter()
            .map(|p| p.id)
            .collect())
    }
}
