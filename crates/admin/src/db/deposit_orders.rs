//! Database operations for tracked deposit orders.
//!
//! Rows are created exactly once by the order-created webhook and mutated
//! only by balance-status updates and the collection action. The schema's
//! (shop_domain, order_id) unique constraint backs the idempotency guard:
//! a redelivered webhook's insert becomes a no-op instead of a duplicate.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::RepositoryError;

/// An order tracked against a deposit plan.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DepositOrder {
    pub id: Uuid,
    pub shop_domain: String,
    /// Platform order ID (numeric form).
    pub order_id: String,
    /// Platform order ID (gid form).
    pub order_gid: String,
    /// Display number, e.g. "#1042".
    pub order_number: String,
    pub customer_email: Option<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub tour_name: Option<String>,
    pub travelers: Option<i32>,
    pub arrival_date: Option<DateTime<Utc>>,
    pub pickup_address: Option<String>,
    pub camp_category: Option<String>,
    pub total_amount: Decimal,
    pub deposit_amount: Decimal,
    pub balance_amount: Decimal,
    /// ISO 4217 currency code of the order.
    pub currency: String,
    /// Always true at creation - the deposit was charged at checkout.
    pub deposit_paid: bool,
    pub balance_paid: bool,
    pub balance_due_date: DateTime<Utc>,
    /// Numeric selling plan id linking back to the deposit plan.
    pub selling_plan_id: String,
    /// Correlation id of an outstanding balance-collection request.
    pub collection_request_id: Option<Uuid>,
    pub collection_requested_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Parameters for creating a deposit order.
#[derive(Debug, Clone)]
pub struct CreateDepositOrder {
    pub shop_domain: String,
    pub order_id: String,
    pub order_gid: String,
    pub order_number: String,
    pub customer_email: Option<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub tour_name: Option<String>,
    pub travelers: Option<i32>,
    pub arrival_date: Option<DateTime<Utc>>,
    pub pickup_address: Option<String>,
    pub camp_category: Option<String>,
    pub total_amount: Decimal,
    pub deposit_amount: Decimal,
    pub balance_amount: Decimal,
    pub currency: String,
    pub balance_due_date: DateTime<Utc>,
    pub selling_plan_id: String,
}

/// Insert a deposit order, treating a duplicate as a no-op.
///
/// Returns `None` when a row for (shop, order) already exists - the caller
/// treats that as "already processed", which keeps the order-created webhook
/// idempotent under redelivery.
///
/// # Errors
///
/// Returns an error if the insert fails for any reason other than the
/// uniqueness conflict.
pub async fn create_deposit_order(
    pool: &PgPool,
    params: CreateDepositOrder,
) -> Result<Option<DepositOrder>, RepositoryError> {
    let order = sqlx::query_as::<_, DepositOrder>(
        r"
        INSERT INTO deposit_orders (
            shop_domain, order_id, order_gid, order_number,
            customer_email, customer_name, customer_phone,
            tour_name, travelers, arrival_date, pickup_address, camp_category,
            total_amount, deposit_amount, balance_amount, currency,
            deposit_paid, balance_paid, balance_due_date, selling_plan_id
        )
        VALUES (
            $1, $2, $3, $4,
            $5, $6, $7,
            $8, $9, $10, $11, $12,
            $13, $14, $15, $16,
            TRUE, FALSE, $17, $18
        )
        ON CONFLICT (shop_domain, order_id) DO NOTHING
        RETURNING *
        ",
    )
    .bind(&params.shop_domain)
    .bind(&params.order_id)
    .bind(&params.order_gid)
    .bind(&params.order_number)
    .bind(&params.customer_email)
    .bind(&params.customer_name)
    .bind(&params.customer_phone)
    .bind(&params.tour_name)
    .bind(params.travelers)
    .bind(params.arrival_date)
    .bind(&params.pickup_address)
    .bind(&params.camp_category)
    .bind(params.total_amount)
    .bind(params.deposit_amount)
    .bind(params.balance_amount)
    .bind(&params.currency)
    .bind(params.balance_due_date)
    .bind(&params.selling_plan_id)
    .fetch_optional(pool)
    .await?;

    Ok(order)
}

/// Look up a tracked order by platform order id, accepting either form.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn get_by_platform_order_id(
    pool: &PgPool,
    shop_domain: &str,
    order_id: &str,
) -> Result<Option<DepositOrder>, RepositoryError> {
    let order = sqlx::query_as::<_, DepositOrder>(
        r"
        SELECT * FROM deposit_orders
        WHERE shop_domain = $1 AND (order_id = $2 OR order_gid = $2)
        ",
    )
    .bind(shop_domain)
    .bind(order_id)
    .fetch_optional(pool)
    .await?;

    Ok(order)
}

/// Get all tracked orders for a shop, soonest arrival first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn get_orders_by_shop(
    pool: &PgPool,
    shop_domain: &str,
) -> Result<Vec<DepositOrder>, RepositoryError> {
    let orders = sqlx::query_as::<_, DepositOrder>(
        r"
        SELECT * FROM deposit_orders
        WHERE shop_domain = $1
        ORDER BY arrival_date DESC NULLS LAST, created_at DESC
        ",
    )
    .bind(shop_domain)
    .fetch_all(pool)
    .await?;

    Ok(orders)
}

/// Flip the balance-paid flag for a tracked order.
///
/// Returns the number of rows touched; zero means the order is not tracked.
///
/// # Errors
///
/// Returns an error if the update fails.
pub async fn set_balance_paid(
    pool: &PgPool,
    shop_domain: &str,
    order_id: &str,
    balance_paid: bool,
) -> Result<u64, RepositoryError> {
    let result = sqlx::query(
        r"
        UPDATE deposit_orders
        SET balance_paid = $3, updated_at = NOW()
        WHERE shop_domain = $1 AND (order_id = $2 OR order_gid = $2)
        ",
    )
    .bind(shop_domain)
    .bind(order_id)
    .bind(balance_paid)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Record that a balance-collection request was sent for an order.
///
/// The stored correlation id is what the order-paid webhook matches against
/// the `deposit_collection_request` note attribute.
///
/// # Errors
///
/// Returns an error if the update fails.
pub async fn set_collection_request(
    pool: &PgPool,
    shop_domain: &str,
    order_id: &str,
    request_id: Uuid,
) -> Result<(), RepositoryError> {
    sqlx::query(
        r"
        UPDATE deposit_orders
        SET collection_request_id = $3,
            collection_requested_at = NOW(),
            updated_at = NOW()
        WHERE shop_domain = $1 AND (order_id = $2 OR order_gid = $2)
        ",
    )
    .bind(shop_domain)
    .bind(order_id)
    .bind(request_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Count tracked orders and pending balances for the dashboard.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn shop_summary(
    pool: &PgPool,
    shop_domain: &str,
) -> Result<(i64, i64, Decimal), RepositoryError> {
    let row: (i64, i64, Option<Decimal>) = sqlx::query_as(
        r"
        SELECT
            COUNT(*),
            COUNT(*) FILTER (WHERE NOT balance_paid),
            SUM(balance_amount) FILTER (WHERE NOT balance_paid)
        FROM deposit_orders
        WHERE shop_domain = $1
        ",
    )
    .bind(shop_domain)
    .fetch_one(pool)
    .await?;

    Ok((row.0, row.1, row.2.unwrap_or_default()))
}

/// Delete every tracked order for a shop. Used only by the uninstall cleanup.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub async fn delete_orders_for_shop(
    pool: &PgPool,
    shop_domain: &str,
) -> Result<u64, RepositoryError> {
    let result = sqlx::query("DELETE FROM deposit_orders WHERE shop_domain = $1")
        .bind(shop_domain)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
