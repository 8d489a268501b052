//! In-memory document repository.

use std::future::Future;

use chrono::Datelike;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use procura_shared::config::EngineConfig;
use procura_shared::types::DocumentId;
use tracing::{debug, warn};

use super::{DocumentFilter, DocumentRepository};
use crate::document::{Document, DocumentKind, format_reference};
use crate::error::{EngineError, EngineResult};

/// Default zero-padding of reference sequence numbers.
const DEFAULT_REFERENCE_PADDING: usize = 6;

/// Repository backed by concurrent hash maps.
///
/// Saves of the same document are serialized by the map's entry lock, so
/// two writers holding the same version cannot both succeed.
#[derive(Debug)]
pub struct InMemoryDocumentRepository {
    documents: DashMap<DocumentId, Document>,
    sequences: DashMap<(DocumentKind, i32), u64>,
    reference_padding: usize,
}

impl Default for InMemoryDocumentRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDocumentRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            documents: DashMap::new(),
            sequences: DashMap::new(),
            reference_padding: DEFAULT_REFERENCE_PADDING,
        }
    }

    /// Creates an empty repository using the configured reference padding.
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new().with_reference_padding(config.reference_padding)
    }

    /// Set the zero-padding of reference sequence numbers.
    #[must_use]
    pub fn with_reference_padding(mut self, padding: usize) -> Self {
        self.reference_padding = padding;
        self
    }

    /// Number of stored documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns true if nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn next_reference(&self, kind: DocumentKind, year: i32) -> String {
        let mut sequence = self.sequences.entry((kind, year)).or_insert(0);
        *sequence += 1;
        format_reference(kind, year, *sequence, self.reference_padding)
    }

    fn load_now(&self, kind: DocumentKind, id: DocumentId) -> EngineResult<Document> {
        self.documents
            .get(&id)
            .filter(|doc| doc.kind() == kind)
            .map(|doc| doc.clone())
            .ok_or(EngineError::NotFound { kind, id })
    }

    fn save_now(&self, mut document: Document) -> EngineResult<Document> {
        let document_id = document.id();
        let expected = document.version();

        match self.documents.entry(document_id) {
            Entry::Occupied(mut slot) => {
                let actual = slot.get().version();
                if actual != expected {
                    warn!(%document_id, expected, actual, "Rejected stale document write");
                    return Err(EngineError::Conflict {
                        document_id,
                        expected,
                        actual,
                    });
                }
                let reference = match slot.get().reference() {
                    Some(existing) => existing.to_string(),
                    None => self.next_reference(document.kind(), document.created_at().year()),
                };
                document.mark_persisted(reference, actual + 1);
                slot.insert(document.clone());
            }
            Entry::Vacant(slot) => {
                if expected != 0 {
                    warn!(%document_id, expected, "Rejected write of unknown document");
                    return Err(EngineError::Conflict {
                        document_id,
                        expected,
                        actual: 0,
                    });
                }
                let reference = self.next_reference(document.kind(), document.created_at().year());
                document.mark_persisted(reference, 1);
                slot.insert(document.clone());
            }
        }

        debug!(
            %document_id,
            reference = document.reference().unwrap_or_default(),
            version = document.version(),
            "Document saved"
        );
        Ok(document)
    }

    fn query_now(&self, filter: &DocumentFilter) -> Vec<Document> {
        let mut found: Vec<Document> = self
            .documents
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        found.sort_by_key(|doc| (doc.created_at(), doc.id()));
        found
    }
}

impl DocumentRepository for InMemoryDocumentRepository {
    fn load(
        &self,
        kind: DocumentKind,
        id: DocumentId,
    ) -> impl Future<Output = EngineResult<Document>> + Send {
        std::future::ready(self.load_now(kind, id))
    }

    fn save(&self, document: Document) -> impl Future<Output = EngineResult<Document>> + Send {
        std::future::ready(self.save_now(document))
    }

    fn query(
        &self,
        filter: DocumentFilter,
    ) -> impl Future<Output = EngineResult<Vec<Document>>> + Send {
        std::future::ready(Ok(self.query_now(&filter)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::PartySnapshot;
    use crate::workflow::RfqStatus;
    use procura_shared::types::OrganizationId;
    use std::sync::Arc;

    fn rfq() -> Document {
        Document::new(
            DocumentKind::Rfq,
            PartySnapshot::new(OrganizationId::new(), "Buyer Co"),
            PartySnapshot::new(OrganizationId::new(), "Seller Co"),
        )
    }

    #[tokio::test]
    async fn test_first_save_assigns_reference_and_version() {
        let repo = InMemoryDocumentRepository::new();
        let doc = rfq();
        let year = doc.created_at().year();

        let saved = repo.save(doc).await.unwrap();
        assert_eq!(saved.version(), 1);
        assert_eq!(saved.reference(), Some(format!("RFQ-{year}-000001").as_str()));

        let second = repo.save(rfq()).await.unwrap();
        assert_eq!(second.reference(), Some(format!("RFQ-{year}-000002").as_str()));
        assert_eq!(repo.len(), 2);
    }

    #[tokio::test]
    async fn test_resave_keeps_reference() {
        let repo = InMemoryDocumentRepository::new().with_reference_padding(3);
        let saved = repo.save(rfq()).await.unwrap();
        let reference = saved.reference().map(str::to_string);

        let resaved = repo.save(saved).await.unwrap();
        assert_eq!(resaved.version(), 2);
        assert_eq!(resaved.reference().map(str::to_string), reference);
        assert!(reference.unwrap().ends_with("-001"));
    }

    #[tokio::test]
    async fn test_stale_write_conflicts() {
        let repo = InMemoryDocumentRepository::new();
        let saved = repo.save(rfq()).await.unwrap();
        let stale = saved.clone();

        repo.save(saved).await.unwrap();
        let err = repo.save(stale).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Conflict {
                expected: 1,
                actual: 2,
                ..
            }
        ));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_load_checks_kind() {
        let repo = InMemoryDocumentRepository::new();
        let saved = repo.save(rfq()).await.unwrap();

        let loaded = repo.load(DocumentKind::Rfq, saved.id()).await.unwrap();
        assert_eq!(loaded, saved);

        let err = repo.load(DocumentKind::Invoice, saved.id()).await.unwrap_err();
        assert!(matches!(err, EngineError::NotFound { kind: DocumentKind::Invoice, .. }));
    }

    #[tokio::test]
    async fn test_query_filters() {
        let repo = InMemoryDocumentRepository::new();
        let first = repo.save(rfq()).await.unwrap();
        repo.save(rfq()).await.unwrap();

        let all = repo
            .query(DocumentFilter::new().with_status(RfqStatus::Draft.into()))
            .await
            .unwrap();
        assert_eq!(all.len(), 2);

        let mine = repo
            .query(DocumentFilter::new().with_organization(first.buyer().organization_id))
            .await
            .unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id(), first.id());
    }

    #[tokio::test]
    async fn test_concurrent_saves_of_same_version() {
        let repo = Arc::new(InMemoryDocumentRepository::new());
        let saved = repo.save(rfq()).await.unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repo = Arc::clone(&repo);
                let copy = saved.clone();
                tokio::spawn(async move { repo.save(copy).await })
            })
            .collect();

        let mut succeeded = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                succeeded += 1;
            }
        }
        assert_eq!(succeeded, 1);
        let stored = repo.load(DocumentKind::Rfq, saved.id()).await.unwrap();
        assert_eq!(stored.version(), 2);
    }
}
