//! Deposit plan CRUD and product assignment.
//!
//! Every mutation goes to the platform first and is persisted locally only
//! after the platform accepts it, so a rejected mutation leaves no
//! half-created local row.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use deposit_pro_core::types::{AssignmentMode, numeric_id};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{self, deposit_plans::CreateDepositPlan, selling_plan_configs};
use crate::error::AppError;
use crate::shopify::selling_plans::DepositPlanInput;
use crate::state::AppState;

/// Product lists larger than one page are not supported by the admin UI.
const COLLECTION_PAGE: i64 = 250;

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub id: Uuid,
    pub selling_plan_id: String,
    pub group_id: String,
    pub name: String,
    pub merchant_code: String,
    pub description: Option<String>,
    pub deposit_percent: Decimal,
    pub balance_due_days: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    /// Product assignment, when one has been saved for the group.
    pub assignment_mode: Option<String>,
    pub products_count: Option<i32>,
}

impl From<db::deposit_plans::DepositPlan> for PlanResponse {
    fn from(plan: db::deposit_plans::DepositPlan) -> Self {
        Self {
            id: plan.id,
            selling_plan_id: plan.selling_plan_id,
            group_id: plan.group_id,
            name: plan.plan_name,
            merchant_code: plan.merchant_code,
            description: plan.description,
            deposit_percent: plan.deposit_percent,
            balance_due_days: plan.balance_due_days,
            is_active: plan.is_active,
            created_at: plan.created_at,
            assignment_mode: None,
            products_count: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    pub name: String,
    pub merchant_code: Option<String>,
    pub description: Option<String>,
    pub deposit_percent: Decimal,
    pub balance_due_days: i32,
}

impl PlanRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("Plan name is required".to_string()));
        }
        let min = Decimal::ONE;
        let max = Decimal::new(99, 0);
        if self.deposit_percent < min || self.deposit_percent > max {
            return Err(AppError::BadRequest(
                "Deposit percent must be between 1 and 99".to_string(),
            ));
        }
        if self.balance_due_days < 0 {
            return Err(AppError::BadRequest(
                "Balance due days cannot be negative".to_string(),
            ));
        }
        Ok(())
    }

    fn merchant_code(&self) -> String {
        self.merchant_code.clone().unwrap_or_else(|| {
            self.name
                .trim()
                .to_ascii_lowercase()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join("-")
        })
    }

    fn gateway_input(&self) -> DepositPlanInput {
        DepositPlanInput {
            name: self.name.trim().to_string(),
            merchant_code: self.merchant_code(),
            description: self.description.clone(),
            deposit_percent: self.deposit_percent,
        }
    }
}

/// GET /plans - active plans for the shop, merged with saved assignments.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<PlanResponse>>, AppError> {
    let shop = &state.config().shopify.store;
    let plans = db::deposit_plans::get_plans_by_shop(state.pool(), shop).await?;
    let configs = selling_plan_configs::get_configs_by_shop(state.pool(), shop).await?;

    let response = plans
        .into_iter()
        .map(|plan| {
            let config = configs
                .iter()
                .find(|c| c.selling_plan_group_id == plan.group_id);
            let mut response = PlanResponse::from(plan);
            if let Some(config) = config {
                response.assignment_mode = Some(config.assignment_mode.clone());
                response.products_count = Some(config.products_count);
            }
            response
        })
        .collect();

    Ok(Json(response))
}

/// POST /plans - create a selling plan group on the platform, then persist.
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<PlanRequest>,
) -> Result<(StatusCode, Json<PlanResponse>), AppError> {
    request.validate()?;

    let shop = state.config().shopify.store.clone();
    let gateway = state.gateway_for(&shop).await?;

    let group = gateway
        .create_selling_plan_group(&request.gateway_input())
        .await?;

    let selling_plan_gid = group
        .selling_plans
        .nodes
        .first()
        .map(|sp| sp.id.clone())
        .ok_or_else(|| {
            AppError::Internal("Selling plan group created without a plan".to_string())
        })?;

    let plan = db::deposit_plans::create_deposit_plan(
        state.pool(),
        CreateDepositPlan {
            shop_domain: shop,
            selling_plan_id: numeric_id(&selling_plan_gid).to_string(),
            selling_plan_gid,
            group_id: group.id,
            plan_name: request.name.trim().to_string(),
            merchant_code: request.merchant_code(),
            description: request.description.clone(),
            deposit_percent: request.deposit_percent,
            balance_due_days: request.balance_due_days,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(plan.into())))
}

/// PUT /plans/{id} - update the group on the platform, then persist.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<PlanRequest>,
) -> Result<Json<PlanResponse>, AppError> {
    request.validate()?;

    let plan = db::deposit_plans::get_plan_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Plan {id}")))?;

    let gateway = state.gateway_for(&plan.shop_domain).await?;
    gateway
        .update_selling_plan_group(
            &plan.group_id,
            &plan.selling_plan_gid,
            &request.gateway_input(),
        )
        .await?;

    let updated = db::deposit_plans::update_deposit_plan(
        state.pool(),
        id,
        CreateDepositPlan {
            shop_domain: plan.shop_domain,
            selling_plan_id: plan.selling_plan_id,
            selling_plan_gid: plan.selling_plan_gid,
            group_id: plan.group_id,
            plan_name: request.name.trim().to_string(),
            merchant_code: request.merchant_code(),
            description: request.description.clone(),
            deposit_percent: request.deposit_percent,
            balance_due_days: request.balance_due_days,
        },
    )
    .await?;

    Ok(Json(updated.into()))
}

/// DELETE /plans/{id} - delete the platform group, soft-delete locally.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let plan = db::deposit_plans::get_plan_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Plan {id}")))?;

    let gateway = state.gateway_for(&plan.shop_domain).await?;
    gateway.delete_selling_plan_group(&plan.group_id).await?;

    db::deposit_plans::deactivate_plan(state.pool(), id).await?;
    db::selling_plan_configs::delete_config(state.pool(), &plan.group_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct AssignProductsRequest {
    pub assignment_mode: AssignmentMode,
    #[serde(default)]
    pub product_ids: Vec<String>,
    #[serde(default)]
    pub collection_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct AssignProductsResponse {
    pub assignment_mode: AssignmentMode,
    pub products_count: i32,
}

/// POST /plans/{id}/products - attach products to the plan's group.
///
/// Specific mode uses the ids as given; collection mode expands each
/// collection to its product ids first; all mode is recorded in the
/// config but attaches nothing (the storefront applies the plan broadly).
pub async fn assign_products(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AssignProductsRequest>,
) -> Result<Json<AssignProductsResponse>, AppError> {
    let plan = db::deposit_plans::get_plan_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Plan {id}")))?;

    let gateway = state.gateway_for(&plan.shop_domain).await?;

    let product_ids: Vec<String> = match request.assignment_mode {
        AssignmentMode::Specific => request.product_ids.clone(),
        AssignmentMode::Collection => {
            let mut ids = Vec::new();
            for collection_gid in &request.collection_ids {
                ids.extend(
                    gateway
                        .get_collection_product_ids(collection_gid, COLLECTION_PAGE)
                        .await?,
                );
            }
            ids
        }
        AssignmentMode::All => Vec::new(),
    };

    if !product_ids.is_empty() {
        gateway
            .add_products_to_selling_plan_group(&plan.group_id, &product_ids)
            .await?;
    }

    let products_count =
        i32::try_from(product_ids.len()).map_err(|_| {
            AppError::BadRequest("Too many products in one assignment".to_string())
        })?;

    selling_plan_configs::save_config(
        state.pool(),
        selling_plan_configs::SaveSellingPlanConfig {
            shop_domain: plan.shop_domain,
            selling_plan_group_id: plan.group_id,
            selling_plan_id: plan.selling_plan_id,
            assignment_mode: request.assignment_mode.as_str().to_string(),
            product_ids,
            collection_ids: request.collection_ids.clone(),
            products_count,
        },
    )
    .await?;

    Ok(Json(AssignProductsResponse {
        assignment_mode: request.assignment_mode,
        products_count,
    }))
}
