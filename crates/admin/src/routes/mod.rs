//! JSON admin routes.
//!
//! The merchant-facing surface: dashboard summary, deposit plan CRUD,
//! order listing and balance collection, webhook subscription management.
//! All routes operate on the shop named in `SHOPIFY_STORE`; webhooks are
//! the only multi-shop entry points.

pub mod dashboard;
pub mod orders;
pub mod plans;
pub mod webhook_admin;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::summary))
        .route("/plans", get(plans::list).post(plans::create))
        .route("/plans/{id}", put(plans::update).delete(plans::remove))
        .route("/plans/{id}/products", post(plans::assign_products))
        .route("/orders", get(orders::list))
        .route("/orders/platform", get(orders::list_platform))
        .route("/orders/{id}/collect-balance", post(orders::collect_balance))
        .route("/webhooks/status", get(webhook_admin::status))
        .route("/webhooks/setup", post(webhook_admin::setup))
        .route("/webhooks/remove", delete(webhook_admin::remove))
}
