//! Shopify global ID helpers.
//!
//! The Admin API identifies resources by global IDs of the form
//! `gid://shopify/Order/12345`, while webhook payloads and merchant-facing
//! URLs carry the bare numeric ID. Both forms are stored side by side on
//! persisted records, so conversions live here.

/// Build an order global ID from a numeric ID.
#[must_use]
pub fn order_gid(id: impl std::fmt::Display) -> String {
    format!("gid://shopify/Order/{id}")
}

/// Extract the trailing numeric ID from a global ID.
///
/// Returns the input unchanged when it is not in gid form, so callers can
/// pass either representation.
#[must_use]
pub fn numeric_id(gid: &str) -> &str {
    gid.rsplit('/').next().unwrap_or(gid)
}

/// Normalize an order identifier to gid form.
#[must_use]
pub fn ensure_order_gid(id: &str) -> String {
    if id.starts_with("gid://") {
        id.to_string()
    } else {
        order_gid(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_gid_roundtrip() {
        let gid = order_gid("6123456789");
        assert_eq!(gid, "gid://shopify/Order/6123456789");
        assert_eq!(numeric_id(&gid), "6123456789");
    }

    #[test]
    fn test_order_gid_from_numeric_payload_id() {
        assert_eq!(order_gid(6_123_456_789_i64), "gid://shopify/Order/6123456789");
    }

    #[test]
    fn test_numeric_id_passthrough() {
        assert_eq!(numeric_id("6123456789"), "6123456789");
    }

    #[test]
    fn test_ensure_order_gid() {
        assert_eq!(ensure_order_gid("42"), "gid://shopify/Order/42");
        assert_eq!(
            ensure_order_gid("gid://shopify/Order/42"),
            "gid://shopify/Order/42"
        );
    }
}
