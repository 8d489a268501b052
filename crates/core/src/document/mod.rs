//! Procurement documents.
//!
//! A [`Document`] is a shared header (parties, currency, lines, history)
//! plus a [`DocumentBody`] with one variant per type. The type is read off
//! the body, so a status can never belong to another type.

pub mod body;
pub mod kind;
pub mod model;
pub mod party;
pub mod reference;

pub use body::{
    ContractBody, DeliveryNoteBody, DocumentBody, InvoiceBody, PackingListBody,
    PurchaseOrderBody, QuotationBody, RfqBody,
};
pub use kind::{DocumentKind, Side};
pub use model::Document;
pub use party::PartySnapshot;
pub use reference::format_reference;
