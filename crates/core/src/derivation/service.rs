//! Builds derived drafts from source documents.

use rust_decimal::Decimal;

use super::routes::{LinePolicy, Route};
use crate::document::{Document, DocumentBody, DocumentKind, Side};
use crate::error::{EngineError, EngineResult};
use crate::line_items::{LineItem, LineItemSet, Packaging};

/// Stateless service for document derivation.
pub struct DerivationService;

impl DerivationService {
    /// Derives an unsaved draft of type `target` from `source`.
    ///
    /// Parties and currency are copied by value, lines and adjustments per
    /// the route, and the target's link field points at the source.
    ///
    /// # Errors
    ///
    /// * `UnsupportedDerivation` if no route exists for the pair
    /// * `MissingSourceData` if the source has no lines, lacks a required
    ///   party field, or lacks a price the target needs
    pub fn derive_from(source: &Document, target: DocumentKind) -> EngineResult<Document> {
        let from = source.kind();
        let route = Route::find(from, target)
            .ok_or(EngineError::UnsupportedDerivation { from, to: target })?;
        let source_id = source.id();

        if source.items().is_empty() {
            return Err(EngineError::missing_source_data(source_id, "items"));
        }
        for side in [Side::Buyer, Side::Seller] {
            if let Some(field) = source
                .party(side)
                .first_missing_field(route.requires_address())
            {
                return Err(EngineError::missing_source_data(
                    source_id,
                    format!("{}.{field}", side.as_str()),
                ));
            }
        }

        let lines = source
            .items()
            .iter()
            .enumerate()
            .map(|(index, line)| map_line(source, index, line, route.lines))
            .collect::<EngineResult<Vec<_>>>()?;

        let mut derived = Document::new(target, source.buyer().clone(), source.seller().clone());
        derived.currency = source.currency().clone();
        derived.items = LineItemSet::from_lines(lines)?;

        if route.copy_adjustments
            && let Some(adjustments) = source.body().adjustments()
            && let Some(slot) = derived.body.adjustments_mut()
        {
            *slot = *adjustments;
        }

        match &mut derived.body {
            DocumentBody::Quotation(body) => body.rfq_id = Some(source_id),
            DocumentBody::Contract(body) => body.quotation_id = Some(source_id),
            DocumentBody::PurchaseOrder(body) => match from {
                DocumentKind::Contract => body.contract_id = Some(source_id),
                _ => body.quotation_id = Some(source_id),
            },
            DocumentBody::Invoice(body) => body.purchase_order_id = Some(source_id),
            DocumentBody::DeliveryNote(body) => body.purchase_order_id = Some(source_id),
            DocumentBody::PackingList(body) => body.purchase_order_id = Some(source_id),
            DocumentBody::Rfq(_) => {}
        }

        Ok(derived)
    }

    /// Derives from a caller-supplied list that must hold exactly one source.
    ///
    /// # Errors
    ///
    /// * `Validation` if the list is empty
    /// * `AmbiguousSource` if it holds more than one document
    /// * anything [`derive_from`](Self::derive_from) returns
    pub fn derive_from_sources(
        sources: &[&Document],
        target: DocumentKind,
    ) -> EngineResult<Document> {
        match sources {
            [] => Err(EngineError::validation(
                "sources",
                "at least one source document is required",
            )),
            [source] => Self::derive_from(source, target),
            many => Err(EngineError::AmbiguousSource {
                sources: many.iter().map(|d| d.id()).collect(),
            }),
        }
    }

    /// Checks that a purchase order links to at most one of a contract and a quotation.
    ///
    /// # Errors
    ///
    /// Returns `AmbiguousSource` naming both links.
    pub fn check_links(document: &Document) -> EngineResult<()> {
        if let DocumentBody::PurchaseOrder(body) = document.body()
            && let (Some(contract_id), Some(quotation_id)) = (body.contract_id, body.quotation_id)
        {
            return Err(EngineError::AmbiguousSource {
                sources: vec![contract_id, quotation_id],
            });
        }
        Ok(())
    }
}

fn map_line(
    source: &Document,
    index: usize,
    line: &LineItem,
    policy: LinePolicy,
) -> EngineResult<LineItem> {
    let mut mapped = line.clone();
    match policy {
        LinePolicy::PriceDefaultsToZero => {
            mapped.unit_price = Some(line.unit_price.unwrap_or(Decimal::ZERO));
        }
        LinePolicy::CopyWithPrice => {
            if line.unit_price.is_none() {
                return Err(EngineError::missing_source_data(
                    source.id(),
                    format!("items[{index}].unit_price"),
                ));
            }
        }
        LinePolicy::DropPrice => {
            mapped.unit_price = None;
            mapped.packaging = None;
        }
        LinePolicy::DropPriceAddPackaging => {
            mapped.unit_price = None;
            mapped.packaging = Some(Packaging::default());
        }
    }
    Ok(mapped)
}
