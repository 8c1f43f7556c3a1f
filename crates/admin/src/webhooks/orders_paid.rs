//! Order-paid webhook: flip the balance flag and tag the platform order.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};

use crate::deposit::{BalanceUpdate, plan_balance_update};
use crate::error::AppError;
use crate::state::AppState;
use crate::db;

use super::payload::OrderStatusPayload;
use super::verify_and_parse;

/// Tags appended to the platform order once the balance is collected.
const COMPLETION_TAGS: &[&str] = &["balance-paid", "deposit-order-complete"];

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
            "Order-paid processing failed"
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
        tracing::debug!(shop = %shop_domain, order_id = payload.id, "Order not tracked, skipping");
        return Ok(());
    };

    let snapshot = payload.to_snapshot();
    let decision = plan_balance_update(
        &snapshot,
        tracked.balance_paid,
        tracked.collection_request_id,
    );

    if decision != BalanceUpdate::MarkPaid {
        return Ok(());
    }

    db::deposit_orders::set_balance_paid(state.pool(), shop_domain, &order_id, true).await?;
    tracing::info!(shop = %shop_domain, order_id = payload.id, "Balance marked paid");

    // Tagging is best effort. The local flag is authoritative; a tag
    // failure must not unwind it.
    match state.gateway_for(shop_domain).await {
        Ok(gateway) => {
            if let Err(err) = gateway
                .add_order_tags(&tracked.order_gid, COMPLETION_TAGS)
                .await
            {
                tracing::warn!(
                    shop = %shop_domain,
                    order_id = payload.id,
                    error = %err,
                    "Failed to tag order after balance collection"
                );
            }
        }
        Err(err) => {
            tracing::warn!(shop = %shop_domain, error = %err, "No gateway for completion tags");
        }
    }

    Ok(())
}
