//! Ordered collection of document lines.

use procura_shared::types::round_money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::item::LineItem;
use super::rules::LineRules;
use crate::error::{EngineError, EngineResult};

/// Serial-numbered lines of a document.
///
/// Serials are always `1..=N` with no gaps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineItemSet {
    lines: Vec<LineItem>,
}

impl LineItemSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from lines, validating each and assigning serials.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if any line has a negative quantity or price.
    pub fn from_lines(lines: impl IntoIterator<Item = LineItem>) -> EngineResult<Self> {
        let mut set = Self::new();
        for line in lines {
            set.add_line(line)?;
        }
        Ok(set)
    }

    /// Appends a line and assigns the next serial number.
    ///
    /// Negative quantities and prices are rejected, never clamped.
    ///
    /// # Errors
    ///
    /// Returns `Validation` naming the offending field.
    pub fn add_line(&mut self, mut line: LineItem) -> EngineResult<()> {
        let index = self.lines.len();
        if line.quantity < Decimal::ZERO {
            return Err(EngineError::validation(
                format!("items[{index}].quantity"),
                format!("quantity must not be negative, got {}", line.quantity),
            ));
        }
        if let Some(price) = line.unit_price
            && price < Decimal::ZERO
        {
            return Err(EngineError::validation(
                format!("items[{index}].unit_price"),
                format!("unit price must not be negative, got {price}"),
            ));
        }

        line.serial = next_serial(index);
        self.lines.push(line);
        Ok(())
    }

    /// Removes the line at `index` (0-based) and renumbers the rest.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the index is out of range or the set would become empty.
    pub fn remove_line(&mut self, index: usize) -> EngineResult<LineItem> {
        if index >= self.lines.len() {
            return Err(EngineError::validation(
                "items",
                format!(
                    "line index {index} is out of range for {} lines",
                    self.lines.len()
                ),
            ));
        }
        if self.lines.len() == 1 {
            return Err(EngineError::validation(
                "items",
                "a document must keep at least one line",
            ));
        }

        let removed = self.lines.remove(index);
        self.renumber();
        Ok(removed)
    }

    /// Reassigns serials `1..=N` in current order.
    pub fn renumber(&mut self) {
        for (index, line) in self.lines.iter_mut().enumerate() {
            line.serial = next_serial(index);
        }
    }

    /// Sum of the rounded line subtotals. Lines without a price contribute zero.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        round_money(
            self.lines
                .iter()
                .filter_map(LineItem::subtotal)
                .sum::<Decimal>(),
        )
    }

    /// Checks the lines against submission requirements.
    ///
    /// # Errors
    ///
    /// Returns `Validation` naming the first failing field, e.g. `items[2].unit_price`.
    pub fn validate_for_submission(&self, rules: LineRules) -> EngineResult<()> {
        if self.lines.is_empty() {
            return Err(EngineError::validation(
                "items",
                "at least one line item is required",
            ));
        }

        for (index, line) in self.lines.iter().enumerate() {
            if line.product_name.trim().is_empty() {
                return Err(EngineError::validation(
                    format!("items[{index}].product_name"),
                    "product name is required",
                ));
            }
            if rules.require_unit_of_measure
                && line
                    .unit_of_measure
                    .as_deref()
                    .is_none_or(|u| u.trim().is_empty())
            {
                return Err(EngineError::validation(
                    format!("items[{index}].unit_of_measure"),
                    "unit of measure is required",
                ));
            }
            if rules.require_quantity && line.quantity <= Decimal::ZERO {
                return Err(EngineError::validation(
                    format!("items[{index}].quantity"),
                    format!("quantity must be greater than zero, got {}", line.quantity),
                ));
            }
            if rules.require_unit_price {
                match line.unit_price {
                    Some(price) if price > Decimal::ZERO => {}
                    Some(price) => {
                        return Err(EngineError::validation(
                            format!("items[{index}].unit_price"),
                            format!("unit price must be greater than zero, got {price}"),
                        ));
                    }
                    None => {
                        return Err(EngineError::validation(
                            format!("items[{index}].unit_price"),
                            "unit price is required",
                        ));
                    }
                }
            }
        }

        Ok(())
    }

    /// Returns the lines in order.
    #[must_use]
    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    /// Mutable access to a line. Serials cannot be changed through it meaningfully:
    /// they are rewritten by the next [`renumber`](Self::renumber).
    pub fn line_mut(&mut self, index: usize) -> Option<&mut LineItem> {
        self.lines.get_mut(index)
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns true if there are no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Iterates over the lines.
    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.lines.iter()
    }
}

impl<'a> IntoIterator for &'a LineItemSet {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

fn next_serial(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentKind;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn priced(name: &str, quantity: Decimal, price: Decimal) -> LineItem {
        LineItem::new(name, quantity)
            .with_unit_price(price)
            .with_unit_of_measure("pcs")
    }

    fn serials(set: &LineItemSet) -> Vec<u32> {
        set.iter().map(|l| l.serial).collect()
    }

    fn failing_field(result: EngineResult<()>) -> String {
        match result {
            Err(EngineError::Validation { field, .. }) => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_add_line_assigns_serials() {
        let mut set = LineItemSet::new();
        set.add_line(priced("A", dec!(1), dec!(1))).unwrap();
        set.add_line(priced("B", dec!(1), dec!(1))).unwrap();
        set.add_line(priced("C", dec!(1), dec!(1))).unwrap();
        assert_eq!(serials(&set), vec![1, 2, 3]);
    }

    #[test]
    fn test_add_line_rejects_negative_values() {
        let mut set = LineItemSet::new();
        let err = set
            .add_line(LineItem::new("A", dec!(-1)))
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation { ref field, .. } if field == "items[0].quantity"));

        let err = set
            .add_line(LineItem::new("A", dec!(1)).with_unit_price(dec!(-0.01)))
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation { ref field, .. } if field == "items[0].unit_price"));
        assert!(set.is_empty());
    }

    #[test]
    fn test_remove_line_renumbers() {
        let mut set = LineItemSet::from_lines([
            priced("A", dec!(1), dec!(1)),
            priced("B", dec!(1), dec!(1)),
            priced("C", dec!(1), dec!(1)),
        ])
        .unwrap();

        let removed = set.remove_line(1).unwrap();
        assert_eq!(removed.product_name, "B");
        assert_eq!(serials(&set), vec![1, 2]);
        assert_eq!(set.lines()[1].product_name, "C");
    }

    #[test]
    fn test_remove_last_line_fails() {
        let mut set = LineItemSet::from_lines([priced("A", dec!(1), dec!(1))]).unwrap();
        assert!(matches!(
            set.remove_line(0),
            Err(EngineError::Validation { .. })
        ));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_remove_out_of_range_fails() {
        let mut set =
            LineItemSet::from_lines([priced("A", dec!(1), dec!(1)), priced("B", dec!(1), dec!(1))])
                .unwrap();
        assert!(matches!(
            set.remove_line(2),
            Err(EngineError::Validation { .. })
        ));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_subtotal_rounds_per_line() {
        let set = LineItemSet::from_lines([
            priced("A", dec!(2), dec!(10.005)),
            priced("B", dec!(3), dec!(9.995)),
        ])
        .unwrap();
        // 20.01 + 29.98
        assert_eq!(set.subtotal(), dec!(49.99));
    }

    #[test]
    fn test_subtotal_ignores_unpriced_lines() {
        let set = LineItemSet::from_lines([
            priced("A", dec!(2), dec!(5)),
            LineItem::new("B", dec!(3)).with_unit_of_measure("kg"),
        ])
        .unwrap();
        assert_eq!(set.subtotal(), dec!(10.00));
        assert_eq!(LineItemSet::new().subtotal(), dec!(0.00));
    }

    #[test]
    fn test_validate_empty_set() {
        let rules = LineRules::for_kind(DocumentKind::Rfq);
        assert_eq!(
            failing_field(LineItemSet::new().validate_for_submission(rules)),
            "items"
        );
    }

    #[rstest]
    #[case(DocumentKind::Invoice, LineItem::new("A", dec!(1)), "items[1].unit_price")]
    #[case(
        DocumentKind::Invoice,
        LineItem::new("A", dec!(1)).with_unit_price(dec!(0)),
        "items[1].unit_price"
    )]
    #[case(
        DocumentKind::Rfq,
        LineItem::new("A", dec!(0)).with_unit_of_measure("pcs"),
        "items[1].quantity"
    )]
    #[case(DocumentKind::Rfq, LineItem::new("A", dec!(1)), "items[1].unit_of_measure")]
    #[case(
        DocumentKind::PurchaseOrder,
        LineItem::new("  ", dec!(1)).with_unit_price(dec!(1)).with_unit_of_measure("pcs"),
        "items[1].product_name"
    )]
    fn test_validate_names_failing_field(
        #[case] kind: DocumentKind,
        #[case] bad_line: LineItem,
        #[case] expected_field: &str,
    ) {
        let set = LineItemSet::from_lines([priced("Good", dec!(1), dec!(1)), bad_line]).unwrap();
        assert_eq!(
            failing_field(set.validate_for_submission(LineRules::for_kind(kind))),
            expected_field
        );
    }

    #[test]
    fn test_validate_unpriced_kind_accepts_missing_price() {
        let set = LineItemSet::from_lines([
            LineItem::new("Steel rods", dec!(100)).with_unit_of_measure("kg")
        ])
        .unwrap();
        assert!(set
            .validate_for_submission(LineRules::for_kind(DocumentKind::DeliveryNote))
            .is_ok());
    }

    #[test]
    fn test_serde_is_transparent() {
        let set = LineItemSet::from_lines([priced("A", dec!(1), dec!(2))]).unwrap();
        let json = serde_json::to_value(&set).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["serial"], 1);
    }
}
