//! Webhook subscription management.

use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use super::types::{Connection, UserError, WebhookSubscription};
use super::{AdminClient, GatewayError, GraphQLError, check_user_errors, queries};

/// Topics the app needs, in GraphQL enum spelling.
pub const REQUIRED_TOPICS: &[&str] = &[
    "ORDERS_CREATE",
    "ORDERS_PAID",
    "ORDERS_UPDATED",
    "APP_UNINSTALLED",
];

/// Callback path for a topic, relative to the public base URL.
#[must_use]
pub fn callback_path(topic: &str) -> &'static str {
    match topic {
        "ORDERS_CREATE" => "/webhooks/orders/create",
        "ORDERS_PAID" => "/webhooks/orders/paid",
        "ORDERS_UPDATED" => "/webhooks/orders/updated",
        "APP_UNINSTALLED" => "/webhooks/app/uninstalled",
        _ => "/webhooks/unknown",
    }
}

#[derive(Deserialize)]
struct GetSubscriptionsData {
    #[serde(rename = "webhookSubscriptions")]
    webhook_subscriptions: Connection<WebhookSubscription>,
}

#[derive(Deserialize)]
struct CreateData {
    #[serde(rename = "webhookSubscriptionCreate")]
    payload: Option<CreatePayload>,
}

#[derive(Deserialize)]
struct CreatePayload {
    #[serde(rename = "webhookSubscription")]
    webhook_subscription: Option<WebhookSubscription>,
    #[serde(rename = "userErrors", default)]
    user_errors: Vec<UserError>,
}

#[derive(Deserialize)]
struct DeleteData {
    #[serde(rename = "webhookSubscriptionDelete")]
    payload: Option<DeletePayload>,
}

#[derive(Deserialize)]
struct DeletePayload {
    #[serde(rename = "deletedWebhookSubscriptionId")]
    deleted_webhook_subscription_id: Option<String>,
    #[serde(rename = "userErrors", default)]
    user_errors: Vec<UserError>,
}

impl AdminClient {
    /// List the shop's webhook subscriptions.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_webhook_subscriptions(
        &self,
    ) -> Result<Vec<WebhookSubscription>, GatewayError> {
        let data: GetSubscriptionsData = self
            .execute(queries::GET_WEBHOOK_SUBSCRIPTIONS, json!({ "first": 100 }))
            .await?;

        Ok(data.webhook_subscriptions.nodes)
    }

    /// Register a webhook subscription for a topic.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self), fields(topic = %topic))]
    pub async fn create_webhook_subscription(
        &self,
        topic: &str,
        callback_url: &str,
    ) -> Result<WebhookSubscription, GatewayError> {
        let data: CreateData = self
            .execute(
                queries::WEBHOOK_SUBSCRIPTION_CREATE,
                json!({
                    "topic": topic,
                    "webhookSubscription": {
                        "callbackUrl": callback_url,
                        "format": "JSON",
                    },
                }),
            )
            .await?;

        let payload = data.payload.ok_or_else(|| {
            GatewayError::GraphQL(vec![GraphQLError {
                message: "No payload returned from webhookSubscriptionCreate".to_string(),
                path: vec![],
            }])
        })?;
        check_user_errors(payload.user_errors)?;

        payload.webhook_subscription.ok_or_else(|| {
            GatewayError::GraphQL(vec![GraphQLError {
                message: "No subscription returned from webhookSubscriptionCreate".to_string(),
                path: vec![],
            }])
        })
    }

    /// Remove a webhook subscription.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self), fields(subscription_id = %id))]
    pub async fn delete_webhook_subscription(&self, id: &str) -> Result<String, GatewayError> {
        let data: DeleteData = self
            .execute(queries::WEBHOOK_SUBSCRIPTION_DELETE, json!({ "id": id }))
            .await?;

        let payload = data.payload.ok_or_else(|| {
            GatewayError::GraphQL(vec![GraphQLError {
                message: "No payload returned from webhookSubscriptionDelete".to_string(),
                path: vec![],
            }])
        })?;
        check_user_errors(payload.user_errors)?;

        payload.deleted_webhook_subscription_id.ok_or_else(|| {
            GatewayError::GraphQL(vec![GraphQLError {
                message: "Webhook subscription deletion failed".to_string(),
                path: vec![],
            }])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_required_topic_has_a_callback_path() {
        for topic in REQUIRED_TOPICS {
            assert_ne!(callback_path(topic), "/webhooks/unknown");
        }
    }
}
