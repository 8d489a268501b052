//! Totals domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Discount, charges and tax applied to a document's own subtotal.
///
/// Copied by value when a document is derived from another, then edited
/// independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialAdjustments {
    /// Discount as a percentage of the subtotal, 0..=100.
    pub discount_percentage: Decimal,
    /// Flat charges (freight, handling) added after discount, >= 0.
    pub additional_charges: Decimal,
    /// Tax as a percentage of the discounted amount, 0..=100.
    pub tax_percentage: Decimal,
}

impl FinancialAdjustments {
    /// Creates adjustments from discount %, additional charges and tax %.
    #[must_use]
    pub fn new(
        discount_percentage: Decimal,
        additional_charges: Decimal,
        tax_percentage: Decimal,
    ) -> Self {
        Self {
            discount_percentage,
            additional_charges,
            tax_percentage,
        }
    }

    /// Checks ranges.
    ///
    /// # Errors
    ///
    /// Returns `Validation` naming the first out-of-range field.
    pub fn validate(&self) -> EngineResult<()> {
        validate_percentage("discount_percentage", self.discount_percentage)?;
        if self.additional_charges < Decimal::ZERO {
            return Err(EngineError::validation(
                "additional_charges",
                format!(
                    "additional charges must not be negative, got {}",
                    self.additional_charges
                ),
            ));
        }
        validate_percentage("tax_percentage", self.tax_percentage)
    }
}

fn validate_percentage(field: &str, value: Decimal) -> EngineResult<()> {
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err(EngineError::validation(
            field,
            format!("percentage must be between 0 and 100, got {value}"),
        ));
    }
    Ok(())
}

/// Result of a totals computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    /// Sum of line subtotals.
    pub subtotal: Decimal,
    /// `round2(subtotal × discount% / 100)`.
    pub discount_amount: Decimal,
    /// `subtotal − discount_amount`.
    pub after_discount: Decimal,
    /// `round2(after_discount × tax% / 100)`.
    pub tax_amount: Decimal,
    /// Flat charges carried from the adjustments.
    pub additional_charges: Decimal,
    /// `round2(after_discount + additional_charges + tax_amount)`.
    pub total_amount: Decimal,
}
