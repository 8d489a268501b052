//! Document types and the side of the deal that issues each one.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The seven procurement document types.
///
/// The set is closed: the engine is not a general workflow engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Request for Quotation, the buyer's initial solicitation.
    Rfq,
    /// Seller's priced answer to an RFQ.
    Quotation,
    /// Agreement drawn up from an accepted quotation.
    Contract,
    /// Buyer's order against a contract or quotation.
    PurchaseOrder,
    /// Seller's dispatch notice for a purchase order.
    DeliveryNote,
    /// Seller's packing details for a purchase order.
    PackingList,
    /// Seller's bill for a purchase order.
    Invoice,
}

/// One side of a buyer/seller relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The purchasing organization.
    Buyer,
    /// The supplying organization.
    Seller,
}

impl Side {
    /// Returns the string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buyer => "buyer",
            Self::Seller => "seller",
        }
    }

    /// Returns the other side.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Buyer => Self::Seller,
            Self::Seller => Self::Buyer,
        }
    }
}

impl DocumentKind {
    /// All document types in chain order.
    pub const ALL: [Self; 7] = [
        Self::Rfq,
        Self::Quotation,
        Self::Contract,
        Self::PurchaseOrder,
        Self::DeliveryNote,
        Self::PackingList,
        Self::Invoice,
    ];

    /// Returns the string representation of the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rfq => "rfq",
            Self::Quotation => "quotation",
            Self::Contract => "contract",
            Self::PurchaseOrder => "purchase_order",
            Self::DeliveryNote => "delivery_note",
            Self::PackingList => "packing_list",
            Self::Invoice => "invoice",
        }
    }

    /// Parses a kind from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "rfq" => Some(Self::Rfq),
            "quotation" => Some(Self::Quotation),
            "contract" => Some(Self::Contract),
            "purchase_order" => Some(Self::PurchaseOrder),
            "delivery_note" => Some(Self::DeliveryNote),
            "packing_list" => Some(Self::PackingList),
            "invoice" => Some(Self::Invoice),
            _ => None,
        }
    }

    /// Prefix of the human-readable reference id (e.g. `PO` in `PO-2026-000001`).
    #[must_use]
    pub fn reference_prefix(&self) -> &'static str {
        match self {
            Self::Rfq => "RFQ",
            Self::Quotation => "QUO",
            Self::Contract => "CON",
            Self::PurchaseOrder => "PO",
            Self::DeliveryNote => "DN",
            Self::PackingList => "PL",
            Self::Invoice => "INV",
        }
    }

    /// The side that authors documents of this type.
    #[must_use]
    pub fn issuer_side(&self) -> Side {
        match self {
            Self::Rfq | Self::PurchaseOrder => Side::Buyer,
            Self::Quotation
            | Self::Contract
            | Self::DeliveryNote
            | Self::PackingList
            | Self::Invoice => Side::Seller,
        }
    }

    /// Returns true if lines of this type carry unit prices and the document has totals.
    #[must_use]
    pub fn is_priced(&self) -> bool {
        matches!(
            self,
            Self::Quotation | Self::Contract | Self::PurchaseOrder | Self::Invoice
        )
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_parse() {
        for kind in DocumentKind::ALL {
            assert_eq!(DocumentKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(
            DocumentKind::parse("PURCHASE_ORDER"),
            Some(DocumentKind::PurchaseOrder)
        );
        assert_eq!(DocumentKind::parse("receipt"), None);
    }

    #[test]
    fn test_issuer_sides() {
        assert_eq!(DocumentKind::Rfq.issuer_side(), Side::Buyer);
        assert_eq!(DocumentKind::PurchaseOrder.issuer_side(), Side::Buyer);
        assert_eq!(DocumentKind::Quotation.issuer_side(), Side::Seller);
        assert_eq!(DocumentKind::Invoice.issuer_side(), Side::Seller);
        assert_eq!(Side::Buyer.opposite(), Side::Seller);
    }

    #[test]
    fn test_priced_kinds() {
        let priced: Vec<_> = DocumentKind::ALL
            .into_iter()
            .filter(DocumentKind::is_priced)
            .collect();
        assert_eq!(
            priced,
            vec![
                DocumentKind::Quotation,
                DocumentKind::Contract,
                DocumentKind::PurchaseOrder,
                DocumentKind::Invoice
            ]
        );
    }
}
