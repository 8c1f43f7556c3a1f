//! Free-form key/value attributes attached to orders and line items.
//!
//! Checkout apps write booking metadata (arrival date, traveler count, pickup
//! address) as custom attributes with no agreed-upon key spelling. Lookups are
//! therefore case-insensitive over a prioritized list of known spellings, and
//! the first match wins - values are never merged across spellings.

use serde::{Deserialize, Serialize};

/// A single key/value pair attached to an order or line item at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomAttribute {
    pub key: String,
    pub value: String,
}

impl CustomAttribute {
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Find the first attribute whose key matches one of `keys`, case-insensitively.
///
/// Priority follows the order of `keys`: all attributes are checked against
/// the first spelling before the second spelling is considered.
#[must_use]
pub fn find_attribute<'a>(attrs: &'a [CustomAttribute], keys: &[&str]) -> Option<&'a str> {
    for key in keys {
        if let Some(attr) = attrs.iter().find(|a| a.key.eq_ignore_ascii_case(key)) {
            return Some(attr.value.as_str());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs() -> Vec<CustomAttribute> {
        vec![
            CustomAttribute::new("Pickup Address", "Airport"),
            CustomAttribute::new("arrival_date", "2026-09-01"),
            CustomAttribute::new("travelers", "4"),
        ]
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let attrs = attrs();
        assert_eq!(
            find_attribute(&attrs, &["ARRIVAL_DATE"]),
            Some("2026-09-01")
        );
        assert_eq!(find_attribute(&attrs, &["pickup address"]), Some("Airport"));
    }

    #[test]
    fn test_lookup_priority_follows_key_order() {
        let attrs = vec![
            CustomAttribute::new("delivery_date", "2026-10-01"),
            CustomAttribute::new("arrival_date", "2026-09-01"),
        ];
        // arrival_date comes first in the spelling list, so it wins even
        // though delivery_date appears earlier in the attribute list.
        assert_eq!(
            find_attribute(&attrs, &["arrival_date", "delivery_date"]),
            Some("2026-09-01")
        );
    }

    #[test]
    fn test_lookup_missing_returns_none() {
        assert_eq!(find_attribute(&attrs(), &["camp_category"]), None);
        assert_eq!(find_attribute(&[], &["arrival_date"]), None);
    }
}
