//! Query filters for stored documents.

use procura_shared::types::{DocumentId, OrganizationId};
use serde::{Deserialize, Serialize};

use crate::document::{Document, DocumentKind};
use crate::workflow::DocumentStatus;

/// Filter for document queries. Empty criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFilter {
    /// Only documents of this type.
    pub kind: Option<DocumentKind>,
    /// Only documents in this status.
    pub status: Option<DocumentStatus>,
    /// Only documents where this organization is buyer or seller.
    pub organization_id: Option<OrganizationId>,
    /// Only documents derived from this source.
    pub linked_to: Option<DocumentId>,
}

impl DocumentFilter {
    /// Creates a new empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to one document type.
    #[must_use]
    pub const fn with_kind(mut self, kind: DocumentKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Restricts to one status.
    #[must_use]
    pub const fn with_status(mut self, status: DocumentStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts to documents involving an organization.
    #[must_use]
    pub const fn with_organization(mut self, organization_id: OrganizationId) -> Self {
        self.organization_id = Some(organization_id);
        self
    }

    /// Restricts to documents derived from `source_id`.
    #[must_use]
    pub const fn linked_to(mut self, source_id: DocumentId) -> Self {
        self.linked_to = Some(source_id);
        self
    }

    /// Returns true if the filter is empty (matches everything).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.status.is_none()
            && self.organization_id.is_none()
            && self.linked_to.is_none()
    }

    /// Returns true if `document` satisfies every criterion.
    #[must_use]
    pub fn matches(&self, document: &Document) -> bool {
        self.kind.is_none_or(|k| document.kind() == k)
            && self.status.is_none_or(|s| document.status() == s)
            && self.organization_id.is_none_or(|org| {
                document.buyer().organization_id == org || document.seller().organization_id == org
            })
            && self
                .linked_to
                .is_none_or(|id| document.body().linked_sources().contains(&id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::PartySnapshot;
    use crate::workflow::RfqStatus;

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = DocumentFilter::new();
        assert!(filter.is_empty());
        let doc = Document::new(
            DocumentKind::Rfq,
            PartySnapshot::new(OrganizationId::new(), "Buyer Co"),
            PartySnapshot::new(OrganizationId::new(), "Seller Co"),
        );
        assert!(filter.matches(&doc));
    }

    #[test]
    fn test_criteria_combine() {
        let buyer = OrganizationId::new();
        let doc = Document::new(
            DocumentKind::Rfq,
            PartySnapshot::new(buyer, "Buyer Co"),
            PartySnapshot::new(OrganizationId::new(), "Seller Co"),
        );

        let filter = DocumentFilter::new()
            .with_kind(DocumentKind::Rfq)
            .with_status(RfqStatus::Draft.into())
            .with_organization(buyer);
        assert!(!filter.is_empty());
        assert!(filter.matches(&doc));

        assert!(!filter.clone().with_organization(OrganizationId::new()).matches(&doc));
        assert!(!filter.clone().with_kind(DocumentKind::Invoice).matches(&doc));
        assert!(!filter.linked_to(DocumentId::new()).matches(&doc));
    }
}
