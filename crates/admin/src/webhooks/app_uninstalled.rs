//! App-uninstalled webhook: purge every row for the shop.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};

use crate::db;
use crate::error::AppError;
use crate::state::AppState;

use super::payload::AppUninstalledPayload;
use super::verify_and_parse;

pub(super) async fn handle(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let (shop_domain, _payload) =
        match verify_and_parse::<AppUninstalledPayload>(&state, &headers, &body) {
            Ok(parsed) => parsed,
            Err(status) => return status,
        };

    if let Err(err) = process(&state, &shop_domain).await {
        tracing::error!(
            shop = %shop_domain,
            error = %err,
            "Uninstall cleanup failed"
        );
        sentry::capture_error(&err);
    }

    StatusCode::OK
}

async fn process(state: &AppState, shop_domain: &str) -> Result<(), AppError> {
    let pool = state.pool();

    let plans = db::deposit_plans::delete_plans_for_shop(pool, shop_domain).await?;
    let orders = db::deposit_orders::delete_orders_for_shop(pool, shop_domain).await?;
    let configs = db::selling_plan_configs::delete_configs_for_shop(pool, shop_domain).await?;
    let token_removed = db::shop_tokens::delete(pool, shop_domain).await?;

    tracing::info!(
        shop = %shop_domain,
        plans,
        orders,
        configs,
        token_removed,
        "Removed all data for uninstalled shop"
    );

    Ok(())
}
