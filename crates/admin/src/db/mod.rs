//! Database operations for the deposit service.
//!
//! ## Tables
//!
//! - `deposit_plans` - Merchant-defined deposit payment plans
//! - `deposit_orders` - Orders tracked against a plan
//! - `selling_plan_configs` - Product/collection assignment per plan group
//! - `shop_tokens` - Per-shop Admin API access tokens
//!
//! No transaction spans multiple tables; every write is a single-row
//! create/update and (shop, natural key) uniqueness is enforced by the schema.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/admin/migrations/` and run via:
//! ```bash
//! cargo run -p deposit-pro-cli -- migrate
//! ```

pub mod deposit_orders;
pub mod deposit_plans;
pub mod selling_plan_configs;
pub mod shop_tokens;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
