//! Access token repository for database operations.
//!
//! This module stores the Admin API access token each installed shop
//! granted the app. Webhook handlers and admin routes look tokens up by
//! shop domain before talking to the platform.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use sqlx::PgPool;

use super::RepositoryError;

/// An Admin API access token for one shop.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct ShopToken {
    /// Shop domain (e.g., your-store.myshopify.com).
    pub shop_domain: String,
    /// Access token (HIGH PRIVILEGE - redacted in debug output).
    pub access_token: SecretString,
    /// Granted scopes.
    pub scopes: Vec<String>,
    pub obtained_at: DateTime<Utc>,
}

impl std::fmt::Debug for ShopToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopToken")
            .field("shop_domain", &self.shop_domain)
            .field("access_token", &"[REDACTED]")
            .field("scopes", &self.scopes)
            .field("obtained_at", &self.obtained_at)
            .finish()
    }
}

/// Internal row type for `PostgreSQL` queries.
#[derive(Debug, sqlx::FromRow)]
struct ShopTokenRow {
    shop_domain: String,
    access_token: String,
    scope: String,
    obtained_at: DateTime<Utc>,
}

impl From<ShopTokenRow> for ShopToken {
    fn from(row: ShopTokenRow) -> Self {
        let scopes = row
            .scope
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            shop_domain: row.shop_domain,
            access_token: SecretString::from(row.access_token),
            scopes,
            obtained_at: row.obtained_at,
        }
    }
}

/// Get the token for a shop.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get_by_shop(
    pool: &PgPool,
    shop_domain: &str,
) -> Result<Option<ShopToken>, RepositoryError> {
    let row = sqlx::query_as::<_, ShopTokenRow>(
        r"
        SELECT shop_domain, access_token, scope, obtained_at
        FROM shop_tokens
        WHERE shop_domain = $1
        ",
    )
    .bind(shop_domain)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(ShopToken::from))
}

/// Save or update the token for a shop.
///
/// Uses upsert to handle both new and existing tokens.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn save(
    pool: &PgPool,
    shop_domain: &str,
    access_token: &str,
    scopes: &[String],
) -> Result<(), RepositoryError> {
    let scope = scopes.join(",");

    sqlx::query(
        r"
        INSERT INTO shop_tokens (shop_domain, access_token, scope, obtained_at)
        VALUES ($1, $2, $3, NOW())
        ON CONFLICT (shop_domain) DO UPDATE SET
            access_token = EXCLUDED.access_token,
            scope = EXCLUDED.scope,
            obtained_at = EXCLUDED.obtained_at,
            updated_at = NOW()
        ",
    )
    .bind(shop_domain)
    .bind(access_token)
    .bind(scope)
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete the token for a shop.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn delete(pool: &PgPool, shop_domain: &str) -> Result<bool, RepositoryError> {
    let result = sqlx::query("DELETE FROM shop_tokens WHERE shop_domain = $1")
        .bind(shop_domain)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
