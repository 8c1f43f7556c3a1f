//! Shared application state.

use std::sync::Arc;

use secrecy::SecretString;
use sqlx::PgPool;

use crate::config::AdminConfig;
use crate::db::shop_tokens;
use crate::error::AppError;
use crate::shopify::{AdminClient, GatewayError};

/// Application state handed to every route handler.
///
/// Cheap to clone; the inner state is shared behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    pool: PgPool,
    http: reqwest::Client,
}

impl AppState {
    #[must_use]
    pub fn new(config: AdminConfig, pool: PgPool) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                http: reqwest::Client::new(),
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Build an Admin API client for a shop using its stored token.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::NoAccessToken` (wrapped) when the shop never
    /// granted a token, or a database error from the lookup.
    pub async fn gateway_for(&self, shop_domain: &str) -> Result<AdminClient, AppError> {
        let token = shop_tokens::get_by_shop(&self.inner.pool, shop_domain)
            .await?
            .ok_or_else(|| GatewayError::NoAccessToken(shop_domain.to_string()))
            .map_err(AppError::Gateway)?;

        Ok(self.gateway_with_token(shop_domain, token.access_token))
    }

    /// Build an Admin API client with an explicit token.
    #[must_use]
    pub fn gateway_with_token(&self, shop_domain: &str, token: SecretString) -> AdminClient {
        AdminClient::new(
            self.inner.http.clone(),
            shop_domain,
            &self.inner.config.shopify.api_version,
            token,
        )
    }
}
