//! Dashboard summary.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::db;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub shop_domain: String,
    pub active_plans: usize,
    pub tracked_orders: i64,
    pub orders_awaiting_balance: i64,
    pub outstanding_balance: Decimal,
}

/// GET / - headline numbers for the landing screen.
pub async fn summary(
    State(state): State<AppState>,
) -> Result<Json<DashboardSummary>, AppError> {
    let shop = state.config().shopify.store.clone();

    let plans = db::deposit_plans::get_plans_by_shop(state.pool(), &shop).await?;
    let (tracked_orders, orders_awaiting_balance, outstanding_balance) =
        db::deposit_orders::shop_summary(state.pool(), &shop).await?;

    Ok(Json(DashboardSummary {
        shop_domain: shop,
        active_plans: plans.len(),
        tracked_orders,
        orders_awaiting_balance,
        outstanding_balance,
    }))
}
