//! Line items shared by every document type.
//!
//! # Modules
//!
//! - `item` - A single product/service line and its packaging details
//! - `set` - Ordered, serial-numbered collection of lines
//! - `rules` - Per-type requirements checked at submission

pub mod item;
pub mod rules;
pub mod set;

#[cfg(test)]
mod set_props;

pub use item::{LineItem, Packaging};
pub use rules::LineRules;
pub use set::LineItemSet;
