//! Document rendering port.
//!
//! The engine resolves totals and hands renderers a flat [`DocumentView`].
//! Layout and output format belong to the renderer.

pub mod json;
pub mod view;

pub use json::JsonRenderer;
pub use view::{DocumentView, LineView};

use crate::document::Document;
use crate::error::EngineResult;

/// Turns a document into bytes (PDF, HTML, JSON, ...).
pub trait DocumentRenderer: Send + Sync {
    /// MIME type of the output.
    fn content_type(&self) -> &'static str;

    /// Renders `document`.
    ///
    /// # Errors
    ///
    /// Returns `Render` if the output cannot be produced.
    fn render(&self, document: &Document) -> EngineResult<Vec<u8>>;
}
