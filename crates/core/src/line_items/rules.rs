//! Per-type line requirements.

use crate::document::DocumentKind;

/// Which line fields must be filled before a document can leave its editable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRules {
    /// Quantity must be greater than zero.
    pub require_quantity: bool,
    /// Unit of measure must be non-empty.
    pub require_unit_of_measure: bool,
    /// Unit price must be present and greater than zero.
    pub require_unit_price: bool,
}

impl LineRules {
    /// Rules for the given document type.
    #[must_use]
    pub fn for_kind(kind: DocumentKind) -> Self {
        match kind {
            DocumentKind::Rfq | DocumentKind::DeliveryNote | DocumentKind::PackingList => Self {
                require_quantity: true,
                require_unit_of_measure: true,
                require_unit_price: false,
            },
            DocumentKind::Quotation | DocumentKind::Contract | DocumentKind::Invoice => Self {
                require_quantity: true,
                require_unit_of_measure: false,
                require_unit_price: true,
            },
            DocumentKind::PurchaseOrder => Self {
                require_quantity: true,
                require_unit_of_measure: true,
                require_unit_price: true,
            },
        }
    }
}
