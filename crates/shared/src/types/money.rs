//! Money rounding and currency labels.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Every amount is a `rust_decimal::Decimal`, rounded half-to-even at
//! two decimal places.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of decimal places kept for every monetary amount.
pub const MONEY_SCALE: u32 = 2;

/// Rounds an amount to [`MONEY_SCALE`] places using banker's rounding.
///
/// The result always carries exactly two decimal places, so `995` becomes `995.00`.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven);
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// Returns `percentage` percent of `amount`, rounded with [`round_money`].
#[must_use]
pub fn percent_of(amount: Decimal, percentage: Decimal) -> Decimal {
    round_money(amount * percentage / Decimal::ONE_HUNDRED)
}

/// Error returned when a currency label is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid currency code '{0}': expected three ASCII letters")]
pub struct CurrencyError(pub String);

/// ISO 4217-style currency label.
///
/// The engine performs no FX logic; the code is stored and copied as a label only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self("USD".to_string())
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = CurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Self(code))
        } else {
            Err(CurrencyError(s.to_string()))
        }
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = CurrencyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[rstest]
    #[case(dec!(20.01), dec!(20.01))]
    #[case(dec!(29.985), dec!(29.98))]
    #[case(dec!(29.975), dec!(29.98))]
    #[case(dec!(0.125), dec!(0.12))]
    #[case(dec!(0.135), dec!(0.14))]
    #[case(dec!(-1.005), dec!(-1.00))]
    fn test_round_money_half_even(#[case] input: Decimal, #[case] expected: Decimal) {
        assert_eq!(round_money(input), expected);
    }

    #[test]
    fn test_round_money_pads_scale() {
        assert_eq!(round_money(dec!(995)).to_string(), "995.00");
        assert_eq!(round_money(dec!(0.5)).to_string(), "0.50");
    }

    #[test]
    fn test_percent_of() {
        assert_eq!(percent_of(dec!(1000), dec!(10)), dec!(100.00));
        assert_eq!(percent_of(dec!(900), dec!(5)), dec!(45.00));
        assert_eq!(percent_of(dec!(10.10), dec!(12.5)), dec!(1.26));
        assert_eq!(percent_of(dec!(123.45), Decimal::ZERO), dec!(0.00));
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!(CurrencyCode::from_str("usd").unwrap().as_str(), "USD");
        assert_eq!(CurrencyCode::from_str(" INR ").unwrap().as_str(), "INR");
        assert!(CurrencyCode::from_str("").is_err());
        assert!(CurrencyCode::from_str("EURO").is_err());
        assert!(CurrencyCode::from_str("U$D").is_err());
    }

    #[test]
    fn test_currency_default_and_display() {
        assert_eq!(CurrencyCode::default().to_string(), "USD");
    }

    #[test]
    fn test_currency_serde_rejects_malformed() {
        let ok: CurrencyCode = serde_json::from_str("\"eur\"").unwrap();
        assert_eq!(ok.as_str(), "EUR");
        assert!(serde_json::from_str::<CurrencyCode>("\"12\"").is_err());
        assert_eq!(serde_json::to_string(&ok).unwrap(), "\"EUR\"");
    }
}
