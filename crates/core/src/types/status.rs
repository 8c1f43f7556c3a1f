//! Status enums for orders and plan assignments.

use serde::{Deserialize, Serialize};

/// Order financial status.
///
/// The GraphQL Admin API reports `displayFinancialStatus` in screaming-snake
/// form (`PARTIALLY_PAID`) while REST webhook payloads use lowercase
/// (`partially_paid`). Parsing is case-insensitive to cover both; anything
/// unrecognized maps to [`FinancialStatus::Unknown`] rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", from = "String")]
pub enum FinancialStatus {
    #[default]
    Pending,
    Authorized,
    PartiallyPaid,
    Paid,
    PartiallyRefunded,
    Refunded,
    Voided,
    Expired,
    Unknown,
}

impl FinancialStatus {
    /// Parse either the GraphQL or the webhook spelling.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => Self::Pending,
            "authorized" => Self::Authorized,
            "partially_paid" => Self::PartiallyPaid,
            "paid" => Self::Paid,
            "partially_refunded" => Self::PartiallyRefunded,
            "refunded" => Self::Refunded,
            "voided" => Self::Voided,
            "expired" => Self::Expired,
            _ => Self::Unknown,
        }
    }

    /// True when only part of the order total has been captured.
    #[must_use]
    pub const fn is_partial(self) -> bool {
        matches!(self, Self::PartiallyPaid)
    }

    /// True for the states the balance-collected heuristic accepts.
    #[must_use]
    pub const fn is_paid_or_partial(self) -> bool {
        matches!(self, Self::Paid | Self::PartiallyPaid)
    }
}

impl From<String> for FinancialStatus {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

/// How a selling plan is assigned to the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentMode {
    /// Hand-picked product IDs.
    Specific,
    /// All products in selected collections.
    Collection,
    /// Every product in the catalog.
    All,
}

impl AssignmentMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Specific => "specific",
            Self::Collection => "collection",
            Self::All => "all",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "specific" => Some(Self::Specific),
            "collection" => Some(Self::Collection),
            "all" => Some(Self::All),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_financial_status_parses_both_spellings() {
        assert_eq!(
            FinancialStatus::parse("PARTIALLY_PAID"),
            FinancialStatus::PartiallyPaid
        );
        assert_eq!(
            FinancialStatus::parse("partially_paid"),
            FinancialStatus::PartiallyPaid
        );
        assert_eq!(FinancialStatus::parse("paid"), FinancialStatus::Paid);
        assert_eq!(FinancialStatus::parse("PAID"), FinancialStatus::Paid);
    }

    #[test]
    fn test_financial_status_unknown_never_fails() {
        assert_eq!(
            FinancialStatus::parse("definitely_not_a_status"),
            FinancialStatus::Unknown
        );
        assert_eq!(FinancialStatus::parse(""), FinancialStatus::Unknown);
    }

    #[test]
    fn test_paid_or_partial() {
        assert!(FinancialStatus::Paid.is_paid_or_partial());
        assert!(FinancialStatus::PartiallyPaid.is_paid_or_partial());
        assert!(!FinancialStatus::Pending.is_paid_or_partial());
        assert!(!FinancialStatus::Refunded.is_paid_or_partial());
    }

    #[test]
    fn test_assignment_mode_roundtrip() {
        for mode in [
            AssignmentMode::Specific,
            AssignmentMode::Collection,
            AssignmentMode::All,
        ] {
            assert_eq!(AssignmentMode::parse(mode.as_str()), Some(mode));
        }
        assert_eq!(AssignmentMode::parse("everything"), None);
    }
}
