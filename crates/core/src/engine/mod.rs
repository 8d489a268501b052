//! Engine facade.
//!
//! [`ProcurementEngine`] is the inbound surface: it loads documents through
//! the repository, runs the pure services over them, stores uploads through
//! the file store and saves the result with a version check.

pub mod service;
pub mod types;

pub use service::ProcurementEngine;
pub use types::{PaymentCommand, TransitionCommand};
