//! Decimal-string money parsing.
//!
//! The Admin API serializes money amounts as decimal strings ("1000.00").
//! All arithmetic uses `rust_decimal::Decimal`; rounding happens only at
//! formatting boundaries.

use rust_decimal::Decimal;

/// Parse a decimal-string amount leniently.
///
/// Surrounding whitespace and a thousands-separator-free decimal format are
/// accepted. Returns `None` for anything else - absence of money data is a
/// degraded state, never an error.
#[must_use]
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    raw.trim().parse::<Decimal>().ok()
}

/// Format an amount to two decimal places for display and API inputs.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1000.00"), Decimal::from_str("1000").ok());
        assert_eq!(parse_amount(" 120.50 "), Decimal::from_str("120.50").ok());
        assert_eq!(parse_amount("0"), Some(Decimal::ZERO));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("abc"), None);
    }

    #[test]
    fn test_format_amount_rounds_at_boundary() {
        let amount = Decimal::from_str("30.456").unwrap();
        assert_eq!(format_amount(amount), "30.46");
        assert_eq!(format_amount(Decimal::from(150)), "150.00");
    }
}
