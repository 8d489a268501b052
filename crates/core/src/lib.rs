//! Core business logic for Procura.
//!
//! Procurement document lifecycle and financial derivation engine. This
//! crate has ZERO web or database dependencies: persistence, file storage
//! and rendering are ports implemented by adapters.
//!
//! # Modules
//!
//! - `document` - The seven document types, parties and reference ids
//! - `line_items` - Serial-numbered lines and submission validation
//! - `totals` - Discount, tax and charge computation
//! - `workflow` - Per-type status machines and guarded transitions
//! - `derivation` - Building one document from another
//! - `payment` - Invoice payment tracking
//! - `repository` - Persistence port and in-memory adapter
//! - `storage` - File store port and OpenDAL adapter
//! - `attachment` - Signatures and receipts recorded on documents
//! - `render` - Rendering port and JSON renderer
//! - `engine` - The facade tying the above together

pub mod attachment;
pub mod derivation;
pub mod document;
pub mod engine;
pub mod error;
pub mod line_items;
pub mod payment;
pub mod render;
pub mod repository;
pub mod storage;
pub mod totals;
pub mod workflow;

pub use document::{Document, DocumentKind, PartySnapshot};
pub use engine::{PaymentCommand, ProcurementEngine, TransitionCommand};
pub use error::{EngineError, EngineResult};
