//! Financial totals derived from line items.
//!
//! Pure, stateless computation: discount, tax, additional charges and the
//! grand total, each rounded half-to-even at two decimal places.

pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use service::TotalsService;
pub use types::{FinancialAdjustments, Totals};
