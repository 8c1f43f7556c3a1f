//! Webhook subscription status and registration endpoints.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::error::AppError;
use crate::shopify::types::WebhookSubscription;
use crate::shopify::webhooks::{REQUIRED_TOPICS, callback_path};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TopicStatus {
    pub topic: String,
    pub callback_url: String,
    pub registered: bool,
    pub subscription_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WebhookStatusResponse {
    pub topics: Vec<TopicStatus>,
    pub all_registered: bool,
}

fn expected_url(base_url: &str, topic: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), callback_path(topic))
}

fn topic_statuses(base_url: &str, subscriptions: &[WebhookSubscription]) -> Vec<TopicStatus> {
    REQUIRED_TOPICS
        .iter()
        .map(|topic| {
            let url = expected_url(base_url, topic);
            let existing = subscriptions
                .iter()
                .find(|s| s.topic == *topic && s.callback_url() == Some(url.as_str()));
            TopicStatus {
                topic: (*topic).to_string(),
                callback_url: url,
                registered: existing.is_some(),
                subscription_id: existing.map(|s| s.id.clone()),
            }
        })
        .collect()
}

/// GET /webhooks/status - which required topics are registered.
pub async fn status(
    State(state): State<AppState>,
) -> Result<Json<WebhookStatusResponse>, AppError> {
    let shop = state.config().shopify.store.clone();
    let gateway = state.gateway_for(&shop).await?;

    let subscriptions = gateway.get_webhook_subscriptions().await?;
    let topics = topic_statuses(&state.config().base_url, &subscriptions);
    let all_registered = topics.iter().all(|t| t.registered);

    Ok(Json(WebhookStatusResponse {
        topics,
        all_registered,
    }))
}

#[derive(Debug, Serialize)]
pub struct WebhookSetupResponse {
    pub created: Vec<String>,
    pub already_registered: Vec<String>,
}

/// POST /webhooks/setup - register any missing subscriptions.
///
/// Idempotent: topics already pointing at this deployment's base URL are
/// left alone.
pub async fn setup(State(state): State<AppState>) -> Result<Json<WebhookSetupResponse>, AppError> {
    let shop = state.config().shopify.store.clone();
    let gateway = state.gateway_for(&shop).await?;

    let subscriptions = gateway.get_webhook_subscriptions().await?;
    let statuses = topic_statuses(&state.config().base_url, &subscriptions);

    let mut created = Vec::new();
    let mut already_registered = Vec::new();
    for status in statuses {
        if status.registered {
            already_registered.push(status.topic);
            continue;
        }
        gateway
            .create_webhook_subscription(&status.topic, &status.callback_url)
            .await?;
        tracing::info!(topic = %status.topic, url = %status.callback_url, "Registered webhook");
        created.push(status.topic);
    }

    Ok(Json(WebhookSetupResponse {
        created,
        already_registered,
    }))
}

#[derive(Debug, Serialize)]
pub struct WebhookRemoveResponse {
    pub removed: Vec<String>,
}

/// DELETE /webhooks/remove - drop every subscription owned by the app.
pub async fn remove(State(state): State<AppState>) -> Result<Json<WebhookRemoveResponse>, AppError> {
    let shop = state.config().shopify.store.clone();
    let gateway = state.gateway_for(&shop).await?;

    let subscriptions = gateway.get_webhook_subscriptions().await?;
    let mut removed = Vec::new();
    for subscription in subscriptions {
        gateway.delete_webhook_subscription(&subscription.id).await?;
        tracing::info!(topic = %subscription.topic, "Removed webhook");
        removed.push(subscription.id);
    }

    Ok(Json(WebhookRemoveResponse { removed }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subscription(topic: &str, url: &str) -> WebhookSubscription {
        WebhookSubscription {
            id: format!("gid://shopify/WebhookSubscription/{topic}"),
            topic: topic.to_string(),
            endpoint: Some(crate::shopify::types::WebhookEndpoint {
                callback_url: Some(url.to_string()),
            }),
        }
    }

    #[test]
    fn status_matches_on_topic_and_url() {
        let subs = vec![
            subscription("ORDERS_CREATE", "https://app.example.com/webhooks/orders/create"),
            subscription("ORDERS_PAID", "https://elsewhere.example.com/webhooks/orders/paid"),
        ];
        let statuses = topic_statuses("https://app.example.com", &subs);

        let create = statuses.iter().find(|t| t.topic == "ORDERS_CREATE");
        assert!(create.is_some_and(|t| t.registered));
        // Same topic at a different host does not count.
        let paid = statuses.iter().find(|t| t.topic == "ORDERS_PAID");
        assert!(paid.is_some_and(|t| !t.registered));
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        assert_eq!(
            expected_url("https://app.example.com/", "ORDERS_PAID"),
            "https://app.example.com/webhooks/orders/paid"
        );
    }
}
