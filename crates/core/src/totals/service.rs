//! Totals computation.

use procura_shared::types::{percent_of, round_money};
use rust_decimal::Decimal;

use super::types::{FinancialAdjustments, Totals};
use crate::error::{EngineError, EngineResult};
use crate::line_items::LineItemSet;

/// Stateless service for computing document totals.
///
/// Rounding is applied once per intermediate (discount, tax) and once for
/// the total, so repeated recomputation never drifts.
pub struct TotalsService;

impl TotalsService {
    /// Computes totals from a subtotal and adjustments.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the subtotal is negative or an adjustment is out of range.
    pub fn compute(subtotal: Decimal, adjustments: &FinancialAdjustments) -> EngineResult<Totals> {
        if subtotal < Decimal::ZERO {
            return Err(EngineError::validation(
                "subtotal",
                format!("subtotal must not be negative, got {subtotal}"),
            ));
        }
        adjustments.validate()?;

        let subtotal = round_money(subtotal);
        let discount_amount = percent_of(subtotal, adjustments.discount_percentage);
        let after_discount = subtotal - discount_amount;
        let tax_amount = percent_of(after_discount, adjustments.tax_percentage);
        let additional_charges = round_money(adjustments.additional_charges);
        let total_amount = round_money(after_discount + additional_charges + tax_amount);

        Ok(Totals {
            subtotal,
            discount_amount,
            after_discount,
            tax_amount,
            additional_charges,
            total_amount,
        })
    }

    /// Computes totals from discrete parameters.
    ///
    /// # Errors
    ///
    /// Same as [`compute`](Self::compute).
    pub fn compute_with(
        subtotal: Decimal,
        discount_percentage: Decimal,
        additional_charges: Decimal,
        tax_percentage: Decimal,
    ) -> EngineResult<Totals> {
        Self::compute(
            subtotal,
            &FinancialAdjustments::new(discount_percentage, additional_charges, tax_percentage),
        )
    }

    /// Computes totals for a set of line items.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if an adjustment is out of range.
    pub fn compute_for_items(
        items: &LineItemSet,
        adjustments: &FinancialAdjustments,
    ) -> EngineResult<Totals> {
        Self::compute(items.subtotal(), adjustments)
    }
}
