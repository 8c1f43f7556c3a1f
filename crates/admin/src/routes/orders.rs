//! Order listing and manual balance collection.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use deposit_pro_core::types::CustomAttribute;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::db;
use crate::deposit::{self, COLLECTION_REQUEST_ATTR, OrderSnapshot};
use crate::error::AppError;
use crate::shopify::orders::DEPOSIT_ORDER_SEARCH;
use crate::state::AppState;

/// Processing fee charged on balance collection.
const FEE_RATE: Decimal = Decimal::from_parts(3, 0, 0, false, 2);

const FEE_ITEM_TITLE: &str = "Processing Fee (3%)";

const PLATFORM_PAGE: i64 = 250;

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: Uuid,
    pub order_id: String,
    pub order_number: String,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub tour_name: Option<String>,
    pub travelers: Option<i32>,
    pub arrival_date: Option<DateTime<Utc>>,
    pub total_amount: Decimal,
    pub deposit_amount: Decimal,
    pub balance_amount: Decimal,
    pub currency: String,
    pub balance_paid: bool,
    pub balance_due_date: DateTime<Utc>,
    pub collection_requested_at: Option<DateTime<Utc>>,
    /// Name of the plan the order was purchased under, when still known.
    pub plan_name: Option<String>,
}

impl From<db::deposit_orders::DepositOrder> for OrderResponse {
    fn from(order: db::deposit_orders::DepositOrder) -> Self {
        Self {
            id: order.id,
            order_id: order.order_id,
            order_number: order.order_number,
            customer_name: order.customer_name,
            customer_email: order.customer_email,
            tour_name: order.tour_name,
            travelers: order.travelers,
            arrival_date: order.arrival_date,
            total_amount: order.total_amount,
            deposit_amount: order.deposit_amount,
            balance_amount: order.balance_amount,
            currency: order.currency,
            balance_paid: order.balance_paid,
            balance_due_date: order.balance_due_date,
            collection_requested_at: order.collection_requested_at,
            plan_name: None,
        }
    }
}

/// GET /orders - tracked deposit orders, with their plan names.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<OrderResponse>>, AppError> {
    let shop = &state.config().shopify.store;
    let orders = db::deposit_orders::get_orders_by_shop(state.pool(), shop).await?;
    let plans = db::deposit_plans::get_plans_by_shop(state.pool(), shop).await?;

    let response = orders
        .into_iter()
        .map(|order| {
            let plan_name = plans
                .iter()
                .find(|p| p.selling_plan_id == order.selling_plan_id)
                .map(|p| p.plan_name.clone());
            let mut response = OrderResponse::from(order);
            response.plan_name = plan_name;
            response
        })
        .collect();

    Ok(Json(response))
}

#[derive(Debug, Serialize)]
pub struct PlatformOrderResponse {
    pub order_gid: String,
    pub order_number: String,
    pub financial_status: String,
    pub total: Decimal,
    pub currency: String,
    pub deposit: Option<Decimal>,
    pub deposit_estimated: bool,
    pub balance: Decimal,
    pub balance_paid: bool,
    pub tracked: bool,
}

/// GET /orders/platform - live view reconciled from the platform.
///
/// Lists every order the search heuristic can reach, whether or not this
/// app tracked it, with deposit figures reconstructed from transactions
/// and the attribute/tag fallback chain.
pub async fn list_platform(
    State(state): State<AppState>,
) -> Result<Json<Vec<PlatformOrderResponse>>, AppError> {
    let shop = state.config().shopify.store.clone();
    let gateway = state.gateway_for(&shop).await?;

    let orders = gateway
        .search_orders(DEPOSIT_ORDER_SEARCH, PLATFORM_PAGE)
        .await?;
    let tracked = db::deposit_orders::get_orders_by_shop(state.pool(), &shop).await?;

    let response = orders
        .iter()
        .map(|order| {
            let snapshot = OrderSnapshot::from(order);
            let breakdown = deposit::payment_breakdown(&snapshot);
            let resolution = deposit::resolve_deposit(&snapshot);

            let deposit = breakdown.deposit.or_else(|| {
                resolution.exists.then_some(resolution.amount)
            });

            PlatformOrderResponse {
                order_gid: order.id.clone(),
                order_number: order.name.clone(),
                financial_status: format!("{:?}", order.financial_status()),
                total: snapshot.total_price,
                currency: snapshot.currency.clone(),
                deposit,
                deposit_estimated: breakdown.deposit.is_none() && resolution.estimated,
                balance: breakdown.balance,
                balance_paid: breakdown.balance_paid,
                tracked: tracked.iter().any(|t| t.order_gid == order.id),
            }
        })
        .collect();

    Ok(Json(response))
}

#[derive(Debug, Serialize)]
pub struct CollectBalanceResponse {
    pub order_id: String,
    pub collection_request_id: Uuid,
    pub fee_amount: Decimal,
    pub balance_amount: Decimal,
}

/// POST /orders/{id}/collect-balance - request the outstanding balance.
///
/// Runs an order-edit session that adds the processing fee and commits
/// with customer notification, which makes the platform send its payment
/// request email. The generated request id is stored locally and written
/// onto the order as a note attribute so the order-paid webhook can match
/// the confirmation without string heuristics.
pub async fn collect_balance(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CollectBalanceResponse>, AppError> {
    let shop = state.config().shopify.store.clone();

    let tracked = db::deposit_orders::get_by_platform_order_id(state.pool(), &shop, &id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order {id}")))?;

    if tracked.balance_paid {
        return Err(AppError::BadRequest(
            "Balance has already been collected".to_string(),
        ));
    }

    let gateway = state.gateway_for(&shop).await?;
    let request_id = Uuid::new_v4();
    let fee = (tracked.balance_amount * FEE_RATE).round_dp(2);

    let calculated_order_id = gateway.order_edit_begin(&tracked.order_gid).await?;
    gateway
        .order_edit_add_custom_item(
            &calculated_order_id,
            FEE_ITEM_TITLE,
            fee,
            &tracked.currency,
            1,
        )
        .await?;
    let staff_note = format!(
        "Balance collection requested: {} {} outstanding plus {} {} processing fee",
        tracked.balance_amount, tracked.currency, fee, tracked.currency
    );
    gateway
        .order_edit_commit(&calculated_order_id, true, Some(&staff_note))
        .await?;

    db::deposit_orders::set_collection_request(state.pool(), &shop, &id, request_id).await?;

    // Correlation attribute is best effort; the string heuristics in the
    // webhook still fire if this write fails.
    if let Err(err) = write_correlation_attribute(&gateway, &tracked.order_gid, request_id).await {
        tracing::warn!(
            order_id = %tracked.order_id,
            error = %err,
            "Failed to write collection-request attribute"
        );
    }

    tracing::info!(
        order_id = %tracked.order_id,
        request_id = %request_id,
        fee = %fee,
        "Balance collection requested"
    );

    Ok(Json(CollectBalanceResponse {
        order_id: tracked.order_id,
        collection_request_id: request_id,
        fee_amount: fee,
        balance_amount: tracked.balance_amount,
    }))
}

async fn write_correlation_attribute(
    gateway: &crate::shopify::AdminClient,
    order_gid: &str,
    request_id: Uuid,
) -> Result<(), AppError> {
    // orderUpdate replaces the attribute list, so merge with what is there.
    let mut attributes = gateway
        .get_order(order_gid)
        .await?
        .map(|o| o.custom_attributes)
        .unwrap_or_default();

    attributes.retain(|a| !a.key.eq_ignore_ascii_case(COLLECTION_REQUEST_ATTR));
    attributes.push(CustomAttribute::new(
        COLLECTION_REQUEST_ATTR,
        request_id.to_string(),
    ));

    gateway.set_order_attributes(order_gid, &attributes).await?;
    Ok(())
}
