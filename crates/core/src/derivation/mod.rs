//! Derivation of one document from another.
//!
//! Each supported `(source, target)` pair has a named route describing how
//! lines and adjustments carry over. Derived documents are unsaved drafts in
//! the target's initial state; the source is never touched.

pub mod routes;
pub mod service;

pub use routes::{LinePolicy, ROUTES, Route};
pub use service::DerivationService;
