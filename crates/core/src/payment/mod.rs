//! Invoice payment tracking.
//!
//! Payments are only accepted on invoices that are PENDING or OVERDUE.
//! A full payment settles the balance and moves the invoice to PAID.

pub mod ledger;
pub mod types;

#[cfg(test)]
mod ledger_props;

pub use ledger::PaymentLedger;
pub use types::{PaymentKind, PaymentRecord, PaymentRequest, PaymentState};
