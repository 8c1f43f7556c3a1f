//! Order-updated webhook: same balance transition as order-paid, minus
//! the platform-side tagging.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};

use crate::db;
use crate::deposit::{BalanceUpdate, plan_balance_update};
use crate::error::AppError;
use crate::state::AppState;

use super::payload::OrderStatusPayload;
use super::verify_and_parse;

pub(super) async fn handle(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let (shop_domain, payload) =
        match verify_and_parse::<OrderStatusPayload>(&state, &headers, &body) {
            Ok(parsed) => parsed,
            Err(status) => return status,
        };

    if let Err(err) = process(&state, &shop_domain, &payload).await {
        tracing::error!(
            shop = %shop_domain,
            order_id = payload.id,
            error = %err,
            "Order-updated processing failed"
        );
        sentry::capture_error(&err);
    }

    StatusCode::OK
}

async fn process(
    state: &AppState,
    shop_domain: &str,
    payload: &OrderStatusPayload,
) -> Result<(), AppError> {
    let order_id = payload.id.to_string();
    let Some(tracked) =
        db::deposit_orders::get_by_platform_order_id(state.pool(), shop_domain, &order_id).await?
    else {
        return Ok(());
    };

    let snapshot = payload.to_snapshot();
    let decision = plan_balance_update(
        &snapshot,
        tracked.balance_paid,
        tracked.collection_request_id,
    );

    if decision == BalanceUpdate::MarkPaid {
        db::deposit_orders::set_balance_paid(state.pool(), shop_domain, &order_id, true).await?;
        tracing::info!(shop = %shop_domain, order_id = payload.id, "Balance marked paid");
    }

    Ok(())
}
