//! Shopify Admin API GraphQL client (HIGH PRIVILEGE).
//!
//! # Security
//!
//! **CRITICAL: This module handles per-shop Admin API access tokens.**
//!
//! The Admin API has full access to orders, selling plans, and shop
//! settings. Tokens are loaded from the database per shop and never
//! logged.
//!
//! # Architecture
//!
//! - Hand-written GraphQL documents in [`queries`], typed responses
//!   deserialized with serde
//! - Direct API calls to Shopify (webhook payloads are re-fetched from
//!   the API rather than trusted for money math)
//! - Rate limiting surfaced as [`GatewayError::RateLimited`]

mod client;
pub mod order_editing;
pub mod orders;
pub mod queries;
pub mod selling_plans;
pub mod types;
pub mod webhooks;

pub use client::AdminClient;

use thiserror::Error;

use types::UserError;

/// Errors that can occur when interacting with the Shopify Admin API.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication/authorization failed.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// No access token stored for the shop.
    #[error("No access token for shop {0}")]
    NoAccessToken(String),

    /// User errors from a mutation (e.g., invalid input).
    #[error("User errors: {}", format_user_errors(.0))]
    UserErrors(Vec<UserError>),
}

/// A GraphQL error returned by the Shopify Admin API.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Path to the error in the response.
    #[serde(default)]
    pub path: Vec<serde_json::Value>,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(|e| e.message.clone())
        .collect::<Vec<_>>()
        .join("; ")
}

fn format_user_errors(errors: &[UserError]) -> String {
    errors
        .iter()
        .map(|e| {
            let field = e.field.as_ref().map_or_else(String::new, |f| f.join("."));
            if field.is_empty() {
                e.message.clone()
            } else {
                format!("{}: {}", field, e.message)
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Fail a mutation when its payload carries user errors.
///
/// # Errors
///
/// Returns `GatewayError::UserErrors` when `errors` is non-empty.
pub(crate) fn check_user_errors(errors: Vec<UserError>) -> Result<(), GatewayError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(GatewayError::UserErrors(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_error_display() {
        let err = GatewayError::NotFound("order-123".to_string());
        assert_eq!(err.to_string(), "Not found: order-123");
    }

    #[test]
    fn graphql_error_formatting() {
        let errors = vec![
            GraphQLError {
                message: "Field not found".to_string(),
                path: vec![],
            },
            GraphQLError {
                message: "Invalid ID".to_string(),
                path: vec![],
            },
        ];
        let err = GatewayError::GraphQL(errors);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: Field not found; Invalid ID"
        );
    }

    #[test]
    fn rate_limited_error_display() {
        let err = GatewayError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
    }

    #[test]
    fn user_errors_include_field_paths() {
        let err = GatewayError::UserErrors(vec![
            UserError {
                field: Some(vec!["input".to_string(), "name".to_string()]),
                message: "can't be blank".to_string(),
            },
            UserError {
                field: None,
                message: "invalid".to_string(),
            },
        ]);
        assert_eq!(err.to_string(), "User errors: input.name: can't be blank; invalid");
    }

    #[test]
    fn check_user_errors_passes_empty() {
        assert!(check_user_errors(vec![]).is_ok());
    }
}
