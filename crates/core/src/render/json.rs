//! JSON renderer.

use super::DocumentRenderer;
use super::view::DocumentView;
use crate::document::Document;
use crate::error::{EngineError, EngineResult};

/// Renders documents as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer {
    pretty: bool,
}

impl JsonRenderer {
    /// Creates a compact renderer.
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: false }
    }

    /// Creates a renderer that indents its output.
    #[must_use]
    pub const fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl DocumentRenderer for JsonRenderer {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn render(&self, document: &Document) -> EngineResult<Vec<u8>> {
        let view = DocumentView::from_document(document)?;
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(&view)
        } else {
            serde_json::to_vec(&view)
        };
        bytes.map_err(|e| EngineError::Render(e.to_string()))
    }
}
