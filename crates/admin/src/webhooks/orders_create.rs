//! Order-created webhook: materialize a tracked deposit order.

use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use deposit_pro_core::types::order_gid;

use crate::deposit::{self, IngestDecision};
use crate::shopify::{AdminClient, GatewayError, types::Order};
use crate::state::AppState;
use crate::{db, error::AppError};

use super::payload::OrderCreatePayload;
use super::verify_and_parse;

const FETCH_ATTEMPTS: u32 = 5;
const FETCH_INITIAL_BACKOFF: Duration = Duration::from_millis(500);

/// Fetch an order, retrying on "not there yet".
///
/// Webhook delivery routinely beats Shopify's own read replicas, so the
/// first fetch may legitimately return nothing for an order that exists.
/// Backoff doubles per attempt from 500ms.
async fn fetch_order_with_retry(
    gateway: &AdminClient,
    gid: &str,
) -> Result<Option<Order>, GatewayError> {
    let mut backoff = FETCH_INITIAL_BACKOFF;
    for attempt in 1..=FETCH_ATTEMPTS {
        match gateway.get_order(gid).await? {
            Some(order) => return Ok(Some(order)),
            None if attempt < FETCH_ATTEMPTS => {
                tracing::debug!(order_id = %gid, attempt, "Order not visible yet, backing off");
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }
            None => {}
        }
    }
    Ok(None)
}

pub(super) async fn handle(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let (shop_domain, payload) =
        match verify_and_parse::<OrderCreatePayload>(&state, &headers, &body) {
            Ok(parsed) => parsed,
            Err(status) => return status,
        };

    // Processing failures answer 200 so Shopify does not redeliver a
    // permanently failing event forever.
    if let Err(err) = process(&state, &shop_domain, payload.id).await {
        tracing::error!(
            shop = %shop_domain,
            order_id = payload.id,
            error = %err,
            "Order-created processing failed"
        );
        sentry::capture_error(&err);
    }

    StatusCode::OK
}

async fn process(state: &AppState, shop_domain: &str, order_id: i64) -> Result<(), AppError> {
    let gateway = state.gateway_for(shop_domain).await?;
    let gid = order_gid(order_id);

    let Some(order) = fetch_order_with_retry(&gateway, &gid).await? else {
        tracing::warn!(shop = %shop_domain, order_id, "Order never became visible, dropping event");
        return Ok(());
    };

    let plan = match deposit::deposit_line_item(&order)
        .and_then(|item| item.selling_plan.as_ref())
        .and_then(|sp| sp.selling_plan_id.as_deref())
    {
        Some(selling_plan_gid) => {
            db::deposit_plans::get_plan_by_selling_plan_gid(state.pool(), shop_domain, selling_plan_gid)
                .await?
        }
        None => None,
    };

    let already_tracked =
        db::deposit_orders::get_by_platform_order_id(state.pool(), shop_domain, &order_id.to_string())
            .await?
            .is_some();

    match deposit::plan_ingest(&order, plan.as_ref(), already_tracked) {
        IngestDecision::SkipNoSellingPlan => {
            tracing::debug!(shop = %shop_domain, order_id, "No selling plan line item, skipping");
        }
        IngestDecision::SkipNoMatchingPlan => {
            tracing::debug!(shop = %shop_domain, order_id, "No matching deposit plan, skipping");
        }
        IngestDecision::SkipAlreadyTracked => {
            tracing::debug!(shop = %shop_domain, order_id, "Order already tracked, skipping");
        }
        IngestDecision::Ingest => {
            // plan_ingest returned Ingest, so the plan exists.
            let Some(plan) = plan else { return Ok(()) };
            let Some(params) = deposit::build_deposit_order(shop_domain, &order, &plan) else {
                return Ok(());
            };

            match db::deposit_orders::create_deposit_order(state.pool(), params).await? {
                Some(row) => {
                    tracing::info!(
                        shop = %shop_domain,
                        order_id,
                        deposit = %row.deposit_amount,
                        balance = %row.balance_amount,
                        "Tracked new deposit order"
                    );
                }
                // A concurrent redelivery inserted first.
                None => {
                    tracing::debug!(shop = %shop_domain, order_id, "Duplicate insert, skipping");
                }
            }
        }
    }

    Ok(())
}
