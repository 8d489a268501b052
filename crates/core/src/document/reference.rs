//! Human-readable reference ids.
//!
//! References have the form `{prefix}-{year}-{sequence}`, e.g. `PO-2026-000042`.
//! They are assigned once, on first persist, and never change afterwards.

use super::kind::DocumentKind;

/// Formats a reference id for the given kind, year and sequence number.
#[must_use]
pub fn format_reference(kind: DocumentKind, year: i32, sequence: u64, padding: usize) -> String {
    format!(
        "{}-{}-{:0>width$}",
        kind.reference_prefix(),
        year,
        sequence,
        width = padding
    )
}
