//! Payment state and request types.

use chrono::{DateTime, Utc};
use procura_shared::types::{PaymentId, round_money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Full or partial settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
    /// Pays the whole remaining balance.
    Full,
    /// Pays part of the remaining balance.
    Partial,
}

impl PaymentKind {
    /// Returns the string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Partial => "partial",
        }
    }

    /// Parse from string (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "full" => Some(Self::Full),
            "partial" => Some(Self::Partial),
            _ => None,
        }
    }
}

impl std::fmt::Display for PaymentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One applied payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Unique id.
    pub id: PaymentId,
    /// Full or partial.
    pub kind: PaymentKind,
    /// Amount applied, rounded to cents.
    pub amount: Decimal,
    /// Receipt supplied with the payment.
    pub receipt_reference: Option<String>,
    /// When the payment was made.
    pub paid_at: DateTime<Utc>,
}

/// Running payment position of an invoice.
///
/// `paid_amount + remaining_amount` equals the frozen total once the invoice is issued.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentState {
    /// Sum of applied payments.
    pub paid_amount: Decimal,
    /// Balance still owed.
    pub remaining_amount: Decimal,
    /// Most recent receipt.
    pub receipt_reference: Option<String>,
    /// Applied payments, oldest first.
    pub payments: Vec<PaymentRecord>,
}

impl PaymentState {
    /// Resets the balance against a newly frozen total, keeping what has been paid.
    pub(crate) fn initialize(&mut self, total: Decimal) {
        self.remaining_amount = round_money((total - self.paid_amount).max(Decimal::ZERO));
    }

    /// Returns true once nothing remains to be paid.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.remaining_amount <= Decimal::ZERO
    }
}

/// Payment to apply to an invoice.
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    /// Full or partial.
    pub kind: PaymentKind,
    /// Amount. Required for partial payments; must equal the balance if given for a full one.
    pub amount: Option<Decimal>,
    /// Receipt reference. Required for partial payments.
    pub receipt_reference: Option<String>,
    /// When the payment was made.
    pub paid_at: DateTime<Utc>,
}

impl PaymentRequest {
    /// A full payment of whatever remains.
    #[must_use]
    pub fn full() -> Self {
        Self {
            kind: PaymentKind::Full,
            amount: None,
            receipt_reference: None,
            paid_at: Utc::now(),
        }
    }

    /// A partial payment backed by a receipt.
    #[must_use]
    pub fn partial(amount: Decimal, receipt_reference: impl Into<String>) -> Self {
        Self {
            kind: PaymentKind::Partial,
            amount: Some(amount),
            receipt_reference: Some(receipt_reference.into()),
            paid_at: Utc::now(),
        }
    }

    /// Set the amount.
    #[must_use]
    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Set the receipt reference.
    #[must_use]
    pub fn with_receipt(mut self, receipt_reference: impl Into<String>) -> Self {
        self.receipt_reference = Some(receipt_reference.into());
        self
    }

    /// Set the payment time.
    #[must_use]
    pub fn at(mut self, paid_at: DateTime<Utc>) -> Self {
        self.paid_at = paid_at;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_initialize_keeps_paid_amount() {
        let mut state = PaymentState {
            paid_amount: dec!(100),
            ..PaymentState::default()
        };
        state.initialize(dec!(945));
        assert_eq!(state.remaining_amount, dec!(845.00));
        assert!(!state.is_settled());
    }

    #[test]
    fn test_initialize_never_goes_negative() {
        let mut state = PaymentState {
            paid_amount: dec!(1000),
            ..PaymentState::default()
        };
        state.initialize(dec!(945));
        assert_eq!(state.remaining_amount, dec!(0.00));
        assert!(state.is_settled());
    }

    #[test]
    fn test_payment_kind_parse() {
        assert_eq!(PaymentKind::parse("FULL"), Some(PaymentKind::Full));
        assert_eq!(PaymentKind::parse("partial"), Some(PaymentKind::Partial));
        assert_eq!(PaymentKind::parse("some"), None);
    }

    #[test]
    fn test_request_builders() {
        let request = PaymentRequest::full().with_amount(dec!(10)).with_receipt("RCPT-1");
        assert_eq!(request.kind, PaymentKind::Full);
        assert_eq!(request.amount, Some(dec!(10)));
        assert_eq!(request.receipt_reference.as_deref(), Some("RCPT-1"));
    }
}
