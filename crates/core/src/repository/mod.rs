//! Document persistence port.
//!
//! The engine never talks to a database directly. It loads and saves
//! documents through [`DocumentRepository`]; [`InMemoryDocumentRepository`]
//! is the adapter used by tests and the seeder.

pub mod filter;
pub mod memory;

use std::future::Future;

use procura_shared::types::DocumentId;

pub use filter::DocumentFilter;
pub use memory::InMemoryDocumentRepository;

use crate::document::{Document, DocumentKind};
use crate::error::EngineResult;

/// Storage for documents with optimistic concurrency.
pub trait DocumentRepository: Send + Sync {
    /// Loads a document of the given type.
    ///
    /// Fails with `NotFound` if no document of that type has the id.
    fn load(
        &self,
        kind: DocumentKind,
        id: DocumentId,
    ) -> impl Future<Output = EngineResult<Document>> + Send;

    /// Persists a document and returns it with its new version.
    ///
    /// The stored version must equal `document.version()`, otherwise the
    /// write fails with `Conflict`. A reference is assigned on first save.
    fn save(&self, document: Document) -> impl Future<Output = EngineResult<Document>> + Send;

    /// Returns every stored document matching `filter`, oldest first.
    fn query(
        &self,
        filter: DocumentFilter,
    ) -> impl Future<Output = EngineResult<Vec<Document>>> + Send;
}
