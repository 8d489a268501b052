//! Flattened, render-ready view of a document.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::document::{Document, DocumentBody, PartySnapshot};
use crate::error::EngineResult;
use crate::payment::PaymentState;
use crate::totals::Totals;

/// One rendered line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineView<'a> {
    /// Serial number.
    pub serial: u32,
    /// Product name.
    pub product_name: &'a str,
    /// Description.
    pub description: Option<&'a str>,
    /// Quantity.
    pub quantity: Decimal,
    /// Unit of measure.
    pub unit_of_measure: Option<&'a str>,
    /// Unit price.
    pub unit_price: Option<Decimal>,
    /// Rounded line subtotal, computed at render time.
    pub subtotal: Option<Decimal>,
}

/// Everything a renderer needs, with totals already resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentView<'a> {
    /// Document type.
    pub kind: &'static str,
    /// Reference id, if saved.
    pub reference: Option<&'a str>,
    /// Status wire name.
    pub status: &'static str,
    /// Status display label.
    pub status_label: &'static str,
    /// Buyer snapshot.
    pub buyer: &'a PartySnapshot,
    /// Seller snapshot.
    pub seller: &'a PartySnapshot,
    /// Currency label.
    pub currency: &'a str,
    /// Lines in serial order.
    pub lines: Vec<LineView<'a>>,
    /// Frozen or freshly computed totals. `None` for unpriced types.
    pub totals: Option<Totals>,
    /// Payment position. Invoices only.
    pub payment: Option<&'a PaymentState>,
    /// Notes.
    pub notes: Option<&'a str>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl<'a> DocumentView<'a> {
    /// Builds the view, resolving totals.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if totals must be computed and the adjustments are invalid.
    pub fn from_document(document: &'a Document) -> EngineResult<Self> {
        let status = document.status();
        let lines = document
            .items()
            .iter()
            .map(|line| LineView {
                serial: line.serial,
                product_name: &line.product_name,
                description: line.description.as_deref(),
                quantity: line.quantity,
                unit_of_measure: line.unit_of_measure.as_deref(),
                unit_price: line.unit_price,
                subtotal: line.subtotal(),
            })
            .collect();
        let payment = match document.body() {
            DocumentBody::Invoice(body) => Some(body.payment()),
            _ => None,
        };

        Ok(Self {
            kind: document.kind().as_str(),
            reference: document.reference(),
            status: status.as_str(),
            status_label: status.label(),
            buyer: document.buyer(),
            seller: document.seller(),
            currency: document.currency().as_str(),
            lines,
            totals: document.resolved_totals()?,
            payment,
            notes: document.notes(),
            created_at: document.created_at(),
            updated_at: document.updated_at(),
        })
    }
}
