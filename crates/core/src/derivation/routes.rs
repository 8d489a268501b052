//! The derivation mapping table.

use crate::document::DocumentKind;

/// How source lines become target lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinePolicy {
    /// Copy lines; missing prices become zero for the seller to fill in.
    PriceDefaultsToZero,
    /// Copy lines with their prices. Every source line must be priced.
    CopyWithPrice,
    /// Copy lines without prices.
    DropPrice,
    /// Copy lines without prices and attach empty packaging details.
    DropPriceAddPackaging,
}

/// One supported derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    /// Source document type.
    pub from: DocumentKind,
    /// Target document type.
    pub to: DocumentKind,
    /// Line mapping.
    pub lines: LinePolicy,
    /// Whether the source adjustments are copied by value.
    pub copy_adjustments: bool,
}

const fn route(from: DocumentKind, to: DocumentKind, lines: LinePolicy, copy_adjustments: bool) -> Route {
    Route {
        from,
        to,
        lines,
        copy_adjustments,
    }
}

/// Every supported `(source, target)` pair. Anything else is unsupported.
pub const ROUTES: &[Route] = &[
    route(DocumentKind::Rfq, DocumentKind::Quotation, LinePolicy::PriceDefaultsToZero, false),
    route(DocumentKind::Quotation, DocumentKind::Contract, LinePolicy::CopyWithPrice, true),
    route(DocumentKind::Quotation, DocumentKind::PurchaseOrder, LinePolicy::CopyWithPrice, true),
    route(DocumentKind::Contract, DocumentKind::PurchaseOrder, LinePolicy::CopyWithPrice, true),
    route(DocumentKind::PurchaseOrder, DocumentKind::Invoice, LinePolicy::CopyWithPrice, true),
    route(DocumentKind::PurchaseOrder, DocumentKind::DeliveryNote, LinePolicy::DropPrice, false),
    route(DocumentKind::PurchaseOrder, DocumentKind::PackingList, LinePolicy::DropPriceAddPackaging, false),
];

impl Route {
    /// Looks up the route for a pair.
    #[must_use]
    pub fn find(from: DocumentKind, to: DocumentKind) -> Option<&'static Route> {
        ROUTES.iter().find(|r| r.from == from && r.to == to)
    }

    /// Returns true if the target needs counterparty addresses.
    #[must_use]
    pub fn requires_address(&self) -> bool {
        matches!(
            self.to,
            DocumentKind::Invoice | DocumentKind::DeliveryNote | DocumentKind::PackingList
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes_are_unique() {
        for r in ROUTES {
            let count = ROUTES
                .iter()
                .filter(|o| o.from == r.from && o.to == r.to)
                .count();
            assert_eq!(count, 1, "duplicate route {:?} -> {:?}", r.from, r.to);
        }
    }

    #[test]
    fn test_priced_targets_copy_prices() {
        for r in ROUTES {
            let keeps_price = matches!(
                r.lines,
                LinePolicy::CopyWithPrice | LinePolicy::PriceDefaultsToZero
            );
            assert_eq!(keeps_price, r.to.is_priced(), "{:?} -> {:?}", r.from, r.to);
            if r.copy_adjustments {
                assert!(r.from.is_priced() && r.to.is_priced());
            }
        }
    }

    #[test]
    fn test_find() {
        assert!(Route::find(DocumentKind::Contract, DocumentKind::PurchaseOrder).is_some());
        assert!(Route::find(DocumentKind::Rfq, DocumentKind::Invoice).is_none());
        assert!(Route::find(DocumentKind::Invoice, DocumentKind::PurchaseOrder).is_none());
    }
}
