//! GraphQL transport for the Shopify Admin API.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::{GatewayError, GraphQLError};

/// Shopify Admin API GraphQL client for one shop.
///
/// Cheap to clone; the inner state is shared behind an `Arc`. Each
/// installed shop gets its own client carrying that shop's access token.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    shop_domain: String,
    api_version: String,
    access_token: SecretString,
}

impl std::fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminClient")
            .field("shop_domain", &self.inner.shop_domain)
            .field("api_version", &self.inner.api_version)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

/// GraphQL response wrapper.
#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLError>>,
}

impl AdminClient {
    /// Create a client for one shop.
    #[must_use]
    pub fn new(
        client: reqwest::Client,
        shop_domain: &str,
        api_version: &str,
        access_token: SecretString,
    ) -> Self {
        Self {
            inner: Arc::new(AdminClientInner {
                client,
                shop_domain: shop_domain.to_string(),
                api_version: api_version.to_string(),
                access_token,
            }),
        }
    }

    /// Get the shop domain this client talks to.
    #[must_use]
    pub fn shop_domain(&self) -> &str {
        &self.inner.shop_domain
    }

    /// Execute a GraphQL document and deserialize the `data` payload.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::RateLimited` on HTTP 429 (with the server's
    /// `Retry-After`), `GatewayError::Unauthorized` on HTTP 401, and
    /// `GatewayError::GraphQL` when the response carries top-level errors.
    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, GatewayError> {
        let endpoint = format!(
            "https://{}/admin/api/{}/graphql.json",
            self.inner.shop_domain, self.inner.api_version
        );

        let body = serde_json::json!({
            "query": query,
            "variables": variables,
        });

        let response = self
            .inner
            .client
            .post(&endpoint)
            .header(
                "X-Shopify-Access-Token",
                self.inner.access_token.expose_secret(),
            )
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(GatewayError::RateLimited(retry_after));
        }

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(GatewayError::Unauthorized(
                "Invalid or expired access token".to_string(),
            ));
        }

        let graphql_response: GraphQLResponse<T> = response.json().await?;

        if let Some(errors) = graphql_response.errors
            && !errors.is_empty()
        {
            return Err(GatewayError::GraphQL(errors));
        }

        graphql_response.data.ok_or_else(|| {
            GatewayError::GraphQL(vec![GraphQLError {
                message: "No data in response".to_string(),
                path: vec![],
            }])
        })
    }
}
