//! Deposit Pro admin service.
//!
//! Merchant-facing backend for selling tours and high-value products on a
//! deposit: partial payment at checkout through selling plans, webhook-driven
//! order tracking, and manual balance collection through order edits.
//!
//! # Architecture
//!
//! - Axum web framework serving a JSON admin API plus webhook receivers
//! - Shopify Admin GraphQL API for selling plans, orders, and order edits
//! - `PostgreSQL` for deposit plans, tracked orders, and shop tokens
//! - Pure decision functions in [`deposit`] keep the reconciliation policy
//!   testable without a database or network

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod deposit;
pub mod error;
pub mod routes;
pub mod shopify;
pub mod state;
pub mod webhooks;
