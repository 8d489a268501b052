//! Document lifecycle management for Procura.
//!
//! This module implements the per-type status machines and the service
//! that applies actions to documents.
//!
//! # Modules
//!
//! - `status` - One status enum per document type, plus [`DocumentStatus`]
//! - `machine` - Transition tables and the [`Lifecycle`] trait
//! - `types` - Actions, entitled parties and audit records
//! - `service` - Guarded transitions with freeze side effects

pub mod machine;
pub mod service;
pub mod status;
pub mod types;

#[cfg(test)]
mod service_props;

pub use machine::{Lifecycle, Transition};
pub use service::WorkflowService;
pub use status::{
    ContractStatus, DeliveryNoteStatus, DocumentStatus, InvoiceStatus, PackingListStatus,
    PurchaseOrderStatus, QuotationStatus, RfqStatus,
};
pub use types::{Action, Party, TransitionRecord, TransitionRequest};
