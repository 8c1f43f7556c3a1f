//! Webhook payload shapes.
//!
//! REST-shaped payloads, distinct from the GraphQL shapes in
//! `crate::shopify::types`. Only the fields the handlers read are
//! declared; everything else in the delivery is ignored.

use deposit_pro_core::types::{CustomAttribute, FinancialStatus};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::deposit::OrderSnapshot;

/// Order-created delivery. Only the id is trusted; the full order is
/// re-fetched from the Admin API before any money math.
#[derive(Debug, Deserialize)]
pub struct OrderCreatePayload {
    pub id: i64,
}

/// Order-paid / order-updated delivery.
#[derive(Debug, Deserialize)]
pub struct OrderStatusPayload {
    pub id: i64,
    #[serde(default)]
    pub financial_status: Option<FinancialStatus>,
    #[serde(default)]
    pub total_price: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub line_items: Vec<PayloadLineItem>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub note_attributes: Vec<NoteAttribute>,
    /// Comma-separated in REST payloads.
    #[serde(default)]
    pub tags: String,
}

#[derive(Debug, Deserialize)]
pub struct PayloadLineItem {
    pub name: String,
}

/// REST spells note attributes as name/value rather than key/value.
#[derive(Debug, Deserialize)]
pub struct NoteAttribute {
    pub name: String,
    pub value: String,
}

impl OrderStatusPayload {
    /// Build a reconciliation snapshot from the delivery alone.
    #[must_use]
    pub fn to_snapshot(&self) -> OrderSnapshot {
        OrderSnapshot {
            custom_attributes: self
                .note_attributes
                .iter()
                .map(|a| CustomAttribute::new(a.name.clone(), a.value.clone()))
                .collect(),
            tags: self
                .tags
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(ToString::to_string)
                .collect(),
            financial_status: self.financial_status.unwrap_or_default(),
            total_price: self
                .total_price
                .as_deref()
                .and_then(deposit_pro_core::types::parse_amount)
                .unwrap_or(Decimal::ZERO),
            currency: self.currency.clone().unwrap_or_default(),
            successful_sales: Vec::new(),
            line_item_titles: self.line_items.iter().map(|i| i.name.clone()).collect(),
            note: self.note.clone(),
        }
    }
}

/// App-uninstalled delivery; the shop comes from the header, so nothing
/// in the body is required.
#[derive(Debug, Deserialize)]
pub struct AppUninstalledPayload {
    #[serde(default)]
    pub domain: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_payload_snapshot_splits_tags_and_maps_attributes() {
        let raw = serde_json::json!({
            "id": 4242,
            "financial_status": "paid",
            "total_price": "1000.00",
            "currency": "USD",
            "line_items": [{"name": "Desert Tour"}, {"name": "Processing Fee (3%)"}],
            "note": null,
            "note_attributes": [{"name": "arrival_date", "value": "2026-09-15"}],
            "tags": "deposit, vip",
        });
        let payload: OrderStatusPayload = serde_json::from_value(raw).unwrap();
        let snap = payload.to_snapshot();

        assert_eq!(snap.tags, vec!["deposit".to_string(), "vip".to_string()]);
        assert_eq!(snap.custom_attributes.len(), 1);
        assert_eq!(snap.custom_attributes[0].key, "arrival_date");
        assert_eq!(snap.line_item_titles.len(), 2);
        assert_eq!(
            snap.financial_status,
            deposit_pro_core::types::FinancialStatus::Paid
        );
    }

    #[test]
    fn status_payload_tolerates_sparse_deliveries() {
        let payload: OrderStatusPayload = serde_json::from_value(serde_json::json!({
            "id": 1,
        }))
        .unwrap();
        let snap = payload.to_snapshot();
        assert!(snap.tags.is_empty());
        assert_eq!(snap.total_price, Decimal::ZERO);
    }
}
