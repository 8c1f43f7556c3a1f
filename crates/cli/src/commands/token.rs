//! Shop access token management.
//!
//! Tokens arrive out of band (from the partner dashboard or a custom app
//! install) and are stored here for the admin service to use.

use deposit_pro_admin::db::shop_tokens;

use super::CommandError;

/// Store or replace a shop's Admin API access token.
///
/// # Errors
///
/// Returns an error if the database is unreachable or the write fails.
pub async fn set(shop: &str, token: &str, scopes: &str) -> Result<(), CommandError> {
    let pool = super::connect().await?;

    let scopes: Vec<String> = scopes
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();

    shop_tokens::save(&pool, shop, token, &scopes).await?;
    tracing::info!(shop = %shop, scopes = scopes.len(), "Token stored");
    Ok(())
}

/// Remove a shop's stored access token.
///
/// # Errors
///
/// Returns an error if the database is unreachable or the delete fails.
pub async fn remove(shop: &str) -> Result<(), CommandError> {
    let pool = super::connect().await?;

    if shop_tokens::delete(&pool, shop).await? {
        tracing::info!(shop = %shop, "Token removed");
    } else {
        tracing::warn!(shop = %shop, "No token stored for shop");
    }
    Ok(())
}
