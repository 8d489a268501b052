//! Attachment service implementation.

use std::sync::Arc;

use chrono::Utc;
use procura_shared::types::{AttachmentId, DocumentId, OrganizationId};

use super::types::{AttachmentRef, FileUpload};
use crate::storage::{FileStore, StorageError, UploadRequest};

/// Writes uploads to the file store and hands back document-side references.
pub struct AttachmentService<F: FileStore> {
    store: Arc<F>,
}

impl<F: FileStore> Clone for AttachmentService<F> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<F: FileStore> AttachmentService<F> {
    /// Create a new attachment service.
    #[must_use]
    pub fn new(store: Arc<F>) -> Self {
        Self { store }
    }

    /// Store an upload for a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the file store rejects the file or fails.
    pub async fn upload(
        &self,
        organization_id: OrganizationId,
        document_id: Option<DocumentId>,
        upload: FileUpload,
    ) -> Result<AttachmentRef, StorageError> {
        let attachment_id = AttachmentId::new();
        let purpose = upload.purpose;
        let filename = upload.filename.clone();

        let stored = self
            .store
            .store(UploadRequest {
                organization_id,
                document_id,
                attachment_id,
                filename: upload.filename,
                content_type: upload.content_type,
                bytes: upload.bytes,
            })
            .await?;

        Ok(AttachmentRef {
            id: attachment_id,
            purpose,
            reference: stored.reference,
            storage_key: stored.storage_key,
            filename,
            content_type: stored.content_type,
            size: stored.size,
            uploaded_by: organization_id,
            uploaded_at: Utc::now(),
        })
    }

    /// Read back the contents of an attachment.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the file is gone from the store.
    pub async fn download(&self, attachment: &AttachmentRef) -> Result<Vec<u8>, StorageError> {
        self.store.fetch(&attachment.storage_key).await
    }

    /// Remove a file whose document was never saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails to delete it.
    pub async fn discard(&self, attachment: &AttachmentRef) -> Result<(), StorageError> {
        self.store.remove(&attachment.storage_key).await
    }
}
