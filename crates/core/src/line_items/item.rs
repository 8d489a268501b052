//! A single document line.

use procura_shared::types::round_money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Packing details carried by packing list lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Packaging {
    /// Number of packages.
    pub package_count: Option<u32>,
    /// Package type (carton, pallet, crate...).
    pub package_type: Option<String>,
    /// Gross weight in kilograms.
    pub gross_weight: Option<Decimal>,
    /// Net weight in kilograms.
    pub net_weight: Option<Decimal>,
    /// Dimensions as written on the package.
    pub dimensions: Option<String>,
    /// Shipping marks.
    pub marks: Option<String>,
}

/// A product or service line.
///
/// The line subtotal is never stored: [`LineItem::subtotal`] recomputes it
/// from quantity and unit price every time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// 1-based position within the document. Assigned by the owning set.
    pub serial: u32,
    /// Product or service name.
    pub product_name: String,
    /// Free-text description.
    pub description: Option<String>,
    /// Stock keeping unit.
    pub sku: Option<String>,
    /// Harmonized System of Nomenclature code.
    pub hsn_code: Option<String>,
    /// Unit of measure (pcs, kg, m...).
    pub unit_of_measure: Option<String>,
    /// Ordered quantity.
    pub quantity: Decimal,
    /// Price per unit. Absent on unpriced documents.
    pub unit_price: Option<Decimal>,
    /// Packing details (packing lists only).
    pub packaging: Option<Packaging>,
}

impl LineItem {
    /// Creates a line with a product name and quantity. Serial is assigned on insertion.
    #[must_use]
    pub fn new(product_name: impl Into<String>, quantity: Decimal) -> Self {
        Self {
            serial: 0,
            product_name: product_name.into(),
            description: None,
            sku: None,
            hsn_code: None,
            unit_of_measure: None,
            quantity,
            unit_price: None,
            packaging: None,
        }
    }

    /// Set the unit price.
    #[must_use]
    pub fn with_unit_price(mut self, unit_price: Decimal) -> Self {
        self.unit_price = Some(unit_price);
        self
    }

    /// Set the unit of measure.
    #[must_use]
    pub fn with_unit_of_measure(mut self, unit: impl Into<String>) -> Self {
        self.unit_of_measure = Some(unit.into());
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the SKU.
    #[must_use]
    pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }

    /// Set the HSN code.
    #[must_use]
    pub fn with_hsn_code(mut self, hsn_code: impl Into<String>) -> Self {
        self.hsn_code = Some(hsn_code.into());
        self
    }

    /// Set packaging details.
    #[must_use]
    pub fn with_packaging(mut self, packaging: Packaging) -> Self {
        self.packaging = Some(packaging);
        self
    }

    /// `round2(quantity × unit_price)`, or `None` for unpriced lines.
    #[must_use]
    pub fn subtotal(&self) -> Option<Decimal> {
        self.unit_price
            .map(|price| round_money(self.quantity * price))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_subtotal_is_rounded_half_even() {
        let line = LineItem::new("Bolt", dec!(2)).with_unit_price(dec!(10.005));
        assert_eq!(line.subtotal(), Some(dec!(20.01)));

        let line = LineItem::new("Nut", dec!(3)).with_unit_price(dec!(9.995));
        assert_eq!(line.subtotal(), Some(dec!(29.98)));
    }

    #[test]
    fn test_subtotal_absent_without_price() {
        let line = LineItem::new("Washer", dec!(5)).with_unit_of_measure("pcs");
        assert_eq!(line.subtotal(), None);
    }

    #[test]
    fn test_subtotal_follows_edits() {
        let mut line = LineItem::new("Cable", dec!(4)).with_unit_price(dec!(2.50));
        assert_eq!(line.subtotal(), Some(dec!(10.00)));
        line.quantity = dec!(6);
        assert_eq!(line.subtotal(), Some(dec!(15.00)));
    }
}
