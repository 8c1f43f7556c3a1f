//! Database operations for deposit plans.
//!
//! A plan is the template mirrored into the platform as a selling-plan group;
//! it never holds money. "Delete" flips `is_active` instead of removing the
//! row because historical orders still reference the plan by selling plan id.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::RepositoryError;

/// A merchant-defined deposit payment plan.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DepositPlan {
    /// Internal ID.
    pub id: Uuid,
    /// Shop this plan belongs to.
    pub shop_domain: String,
    /// Platform selling plan ID (numeric form).
    pub selling_plan_id: String,
    /// Platform selling plan ID (gid form).
    pub selling_plan_gid: String,
    /// Selling plan group gid.
    pub group_id: String,
    /// Merchant-facing plan name.
    pub plan_name: String,
    /// Merchant code on the selling plan group.
    pub merchant_code: String,
    /// Optional customer-facing description.
    pub description: Option<String>,
    /// Percentage charged at checkout (1-99).
    pub deposit_percent: Decimal,
    /// Days after checkout until the balance falls due.
    pub balance_due_days: i32,
    /// Soft-delete flag.
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Parameters for creating a deposit plan.
#[derive(Debug, Clone)]
pub struct CreateDepositPlan {
    pub shop_domain: String,
    pub selling_plan_id: String,
    pub selling_plan_gid: String,
    pub group_id: String,
    pub plan_name: String,
    pub merchant_code: String,
    pub description: Option<String>,
    pub deposit_percent: Decimal,
    pub balance_due_days: i32,
}

/// Create a new deposit plan.
///
/// # Errors
///
/// Returns an error if the insert fails, including a unique violation for a
/// duplicate (shop, selling plan id) pair.
pub async fn create_deposit_plan(
    pool: &PgPool,
    params: CreateDepositPlan,
) -> Result<DepositPlan, RepositoryError> {
    let plan = sqlx::query_as::<_, DepositPlan>(
        r"
        INSERT INTO deposit_plans (
            shop_domain, selling_plan_id, selling_plan_gid, group_id,
            plan_name, merchant_code, description, deposit_percent, balance_due_days
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        ",
    )
    .bind(&params.shop_domain)
    .bind(&params.selling_plan_id)
    .bind(&params.selling_plan_gid)
    .bind(&params.group_id)
    .bind(&params.plan_name)
    .bind(&params.merchant_code)
    .bind(&params.description)
    .bind(params.deposit_percent)
    .bind(params.balance_due_days)
    .fetch_one(pool)
    .await?;

    Ok(plan)
}

/// Get all active plans for a shop, newest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn get_plans_by_shop(
    pool: &PgPool,
    shop_domain: &str,
) -> Result<Vec<DepositPlan>, RepositoryError> {
    let plans = sqlx::query_as::<_, DepositPlan>(
        r"
        SELECT * FROM deposit_plans
        WHERE shop_domain = $1 AND is_active = TRUE
        ORDER BY created_at DESC
        ",
    )
    .bind(shop_domain)
    .fetch_all(pool)
    .await?;

    Ok(plans)
}

/// Look up a plan by the selling plan gid a line item references.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn get_plan_by_selling_plan_gid(
    pool: &PgPool,
    shop_domain: &str,
    selling_plan_gid: &str,
) -> Result<Option<DepositPlan>, RepositoryError> {
    let plan = sqlx::query_as::<_, DepositPlan>(
        r"
        SELECT * FROM deposit_plans
        WHERE shop_domain = $1 AND selling_plan_gid = $2
        ",
    )
    .bind(shop_domain)
    .bind(selling_plan_gid)
    .fetch_optional(pool)
    .await?;

    Ok(plan)
}

/// Look up a plan by numeric selling plan id.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn get_plan_by_selling_plan_id(
    pool: &PgPool,
    shop_domain: &str,
    selling_plan_id: &str,
) -> Result<Option<DepositPlan>, RepositoryError> {
    let plan = sqlx::query_as::<_, DepositPlan>(
        r"
        SELECT * FROM deposit_plans
        WHERE shop_domain = $1 AND selling_plan_id = $2
        ",
    )
    .bind(shop_domain)
    .bind(selling_plan_id)
    .fetch_optional(pool)
    .await?;

    Ok(plan)
}

/// Look up a plan by its internal id.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn get_plan_by_id(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<DepositPlan>, RepositoryError> {
    let plan = sqlx::query_as::<_, DepositPlan>("SELECT * FROM deposit_plans WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(plan)
}

/// Update a plan's merchant-editable fields.
///
/// # Errors
///
/// Returns an error if the update fails.
pub async fn update_deposit_plan(
    pool: &PgPool,
    id: Uuid,
    params: CreateDepositPlan,
) -> Result<DepositPlan, RepositoryError> {
    let plan = sqlx::query_as::<_, DepositPlan>(
        r"
        UPDATE deposit_plans
        SET plan_name = $2,
            merchant_code = $3,
            description = $4,
            deposit_percent = $5,
            balance_due_days = $6,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        ",
    )
    .bind(id)
    .bind(&params.plan_name)
    .bind(&params.merchant_code)
    .bind(&params.description)
    .bind(params.deposit_percent)
    .bind(params.balance_due_days)
    .fetch_one(pool)
    .await?;

    Ok(plan)
}

/// Soft-delete a plan. Historical orders keep referencing the row.
///
/// # Errors
///
/// Returns an error if the update fails.
pub async fn deactivate_plan(pool: &PgPool, id: Uuid) -> Result<(), RepositoryError> {
    sqlx::query(
        r"
        UPDATE deposit_plans
        SET is_active = FALSE, updated_at = NOW()
        WHERE id = $1
        ",
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete every plan for a shop. Used only by the uninstall cleanup.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub async fn delete_plans_for_shop(
    pool: &PgPool,
    shop_domain: &str,
) -> Result<u64, RepositoryError> {
    let result = sqlx::query("DELETE FROM deposit_plans WHERE shop_domain = $1")
        .bind(shop_domain)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
