//! Property-based tests for LineItemSet.

use proptest::prelude::*;
use procura_shared::types::round_money;
use rust_decimal::Decimal;

use super::item::LineItem;
use super::set::LineItemSet;

/// Quantities from 0.001 to 10,000.000.
fn quantity() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|thousandths| Decimal::new(thousandths, 3))
}

/// Prices from 0.001 to 100,000.000, deliberately finer than cents.
fn price() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|thousandths| Decimal::new(thousandths, 3))
}

fn lines() -> impl Strategy<Value = Vec<(Decimal, Decimal)>> {
    prop::collection::vec((quantity(), price()), 1..20)
}

fn build(lines: &[(Decimal, Decimal)]) -> LineItemSet {
    LineItemSet::from_lines(
        lines
            .iter()
            .enumerate()
            .map(|(i, (q, p))| LineItem::new(format!("Item {i}"), *q).with_unit_price(*p)),
    )
    .expect("non-negative lines are accepted")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The set subtotal equals rounding each line, then summing, in exact decimal arithmetic.
    #[test]
    fn prop_subtotal_matches_fixed_point_reference(lines in lines()) {
        let set = build(&lines);

        let mut reference_cents: i128 = 0;
        for (q, p) in &lines {
            let line_total = round_money(*q * *p);
            reference_cents += line_total.mantissa();
        }
        let reference = Decimal::from_i128_with_scale(reference_cents, 2);

        prop_assert_eq!(set.subtotal(), reference);
        prop_assert_eq!(set.subtotal().scale(), 2);
    }

    /// Serials stay contiguous after any removal.
    #[test]
    fn prop_serials_contiguous_after_removal(lines in lines(), pick in any::<prop::sample::Index>()) {
        prop_assume!(lines.len() > 1);
        let mut set = build(&lines);
        let index = pick.index(set.len());

        set.remove_line(index).expect("more than one line");

        let serials: Vec<u32> = set.iter().map(|l| l.serial).collect();
        let expected: Vec<u32> = (1..=u32::try_from(set.len()).unwrap()).collect();
        prop_assert_eq!(serials, expected);
    }

    /// Computing the subtotal twice yields the same value.
    #[test]
    fn prop_subtotal_idempotent(lines in lines()) {
        let set = build(&lines);
        prop_assert_eq!(set.subtotal(), set.subtotal());
    }
}
