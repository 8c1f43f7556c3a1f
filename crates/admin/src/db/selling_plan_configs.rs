//! Database operations for selling plan product assignments.
//!
//! Each row mirrors one selling plan group on the platform and remembers
//! which products or collections the merchant assigned to it so the admin
//! UI can redisplay the assignment without a platform round trip. Product
//! and collection id lists are stored as JSON text, matching the shape the
//! platform hands back.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::RepositoryError;

/// Stored product assignment for one selling plan group.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SellingPlanConfig {
    pub id: Uuid,
    pub shop_domain: String,
    pub selling_plan_group_id: String,
    /// Numeric selling plan id inside the group.
    pub selling_plan_id: String,
    /// One of "specific", "collection", or "all".
    pub assignment_mode: String,
    /// JSON array of product gids.
    pub product_ids: String,
    /// JSON array of collection gids.
    pub collection_ids: String,
    pub products_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Parameters for saving a product assignment.
#[derive(Debug, Clone)]
pub struct SaveSellingPlanConfig {
    pub shop_domain: String,
    pub selling_plan_group_id: String,
    pub selling_plan_id: String,
    pub assignment_mode: String,
    pub product_ids: Vec<String>,
    pub collection_ids: Vec<String>,
    pub products_count: i32,
}

/// Serialize an id list for storage.
///
/// Serializing a `Vec<String>` cannot fail, so this is infallible.
#[must_use]
pub fn encode_id_list(ids: &[String]) -> String {
    serde_json::to_string(ids).unwrap_or_else(|_| "[]".to_string())
}

/// Deserialize a stored id list, tolerating legacy or corrupt values.
#[must_use]
pub fn decode_id_list(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

/// Upsert the product assignment for a selling plan group.
///
/// # Errors
///
/// Returns an error if the upsert fails.
pub async fn save_config(
    pool: &PgPool,
    params: SaveSellingPlanConfig,
) -> Result<SellingPlanConfig, RepositoryError> {
    let config = sqlx::query_as::<_, SellingPlanConfig>(
        r"
        INSERT INTO selling_plan_configs (
            shop_domain, selling_plan_group_id, selling_plan_id,
            assignment_mode, product_ids, collection_ids, products_count
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (selling_plan_group_id) DO UPDATE SET
            selling_plan_id = EXCLUDED.selling_plan_id,
            assignment_mode = EXCLUDED.assignment_mode,
            product_ids = EXCLUDED.product_ids,
            collection_ids = EXCLUDED.collection_ids,
            products_count = EXCLUDED.products_count,
            updated_at = NOW()
        RETURNING *
        ",
    )
    .bind(&params.shop_domain)
    .bind(&params.selling_plan_group_id)
    .bind(&params.selling_plan_id)
    .bind(&params.assignment_mode)
    .bind(encode_id_list(&params.product_ids))
    .bind(encode_id_list(&params.collection_ids))
    .bind(params.products_count)
    .fetch_one(pool)
    .await?;

    Ok(config)
}

/// Look up the stored assignment for a selling plan group.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn get_config(
    pool: &PgPool,
    selling_plan_group_id: &str,
) -> Result<Option<SellingPlanConfig>, RepositoryError> {
    let config = sqlx::query_as::<_, SellingPlanConfig>(
        "SELECT * FROM selling_plan_configs WHERE selling_plan_group_id = $1",
    )
    .bind(selling_plan_group_id)
    .fetch_optional(pool)
    .await?;

    Ok(config)
}

/// Get every stored assignment for a shop.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn get_configs_by_shop(
    pool: &PgPool,
    shop_domain: &str,
) -> Result<Vec<SellingPlanConfig>, RepositoryError> {
    let configs = sqlx::query_as::<_, SellingPlanConfig>(
        r"
        SELECT * FROM selling_plan_configs
        WHERE shop_domain = $1
        ORDER BY created_at DESC
        ",
    )
    .bind(shop_domain)
    .fetch_all(pool)
    .await?;

    Ok(configs)
}

/// Delete the stored assignment for a selling plan group.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub async fn delete_config(
    pool: &PgPool,
    selling_plan_group_id: &str,
) -> Result<u64, RepositoryError> {
    let result = sqlx::query("DELETE FROM selling_plan_configs WHERE selling_plan_group_id = $1")
        .bind(selling_plan_group_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Delete every stored assignment for a shop. Used only by the uninstall
/// cleanup.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub async fn delete_configs_for_shop(
    pool: &PgPool,
    shop_domain: &str,
) -> Result<u64, RepositoryError> {
    let result = sqlx::query("DELETE FROM selling_plan_configs WHERE shop_domain = $1")
        .bind(shop_domain)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_list_round_trips() {
        let ids = vec![
            "gid://shopify/Product/111".to_string(),
            "gid://shopify/Product/222".to_string(),
        ];
        assert_eq!(decode_id_list(&encode_id_list(&ids)), ids);
    }

    #[test]
    fn empty_id_list_round_trips() {
        let ids: Vec<String> = vec![];
        assert_eq!(encode_id_list(&ids), "[]");
        assert!(decode_id_list("[]").is_empty());
    }

    #[test]
    fn corrupt_id_list_decodes_to_empty() {
        assert!(decode_id_list("not json").is_empty());
        assert!(decode_id_list("{\"a\":1}").is_empty());
    }
}
