//! Property-based tests for TotalsService.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::service::TotalsService;
use super::types::FinancialAdjustments;

/// Amounts from 0.00 to 10,000,000.00.
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Percentages from 0.00 to 100.00.
fn percentage() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000i64).prop_map(|hundredths| Decimal::new(hundredths, 2))
}

fn adjustments() -> impl Strategy<Value = FinancialAdjustments> {
    (percentage(), amount(), percentage())
        .prop_map(|(d, c, t)| FinancialAdjustments::new(d, c, t))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Identical inputs give identical outputs.
    #[test]
    fn prop_compute_is_idempotent(subtotal in amount(), adj in adjustments()) {
        let first = TotalsService::compute(subtotal, &adj).unwrap();
        let second = TotalsService::compute(subtotal, &adj).unwrap();
        prop_assert_eq!(first, second);
    }

    /// The parts always add up to the total and every amount has two decimals.
    #[test]
    fn prop_components_add_up(subtotal in amount(), adj in adjustments()) {
        let totals = TotalsService::compute(subtotal, &adj).unwrap();
        prop_assert_eq!(totals.after_discount, totals.subtotal - totals.discount_amount);
        prop_assert_eq!(
            totals.total_amount,
            totals.after_discount + totals.additional_charges + totals.tax_amount
        );
        prop_assert!(totals.discount_amount <= totals.subtotal);
        prop_assert!(totals.total_amount >= Decimal::ZERO);
        for value in [
            totals.subtotal,
            totals.discount_amount,
            totals.after_discount,
            totals.tax_amount,
            totals.total_amount,
        ] {
            prop_assert_eq!(value.scale(), 2);
        }
    }

    /// Percentages above 100 are always rejected.
    #[test]
    fn prop_rejects_percentage_over_hundred(
        subtotal in amount(),
        excess in 1i64..1_000_000i64,
    ) {
        let tax = Decimal::ONE_HUNDRED + Decimal::new(excess, 2);
        let adj = FinancialAdjustments::new(Decimal::ZERO, Decimal::ZERO, tax);
        prop_assert!(TotalsService::compute(subtotal, &adj).is_err());
    }
}
