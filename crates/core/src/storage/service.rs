//! Storage service implementation using Apache OpenDAL.

use std::future::Future;

use opendal::{Operator, services};
use procura_shared::types::{AttachmentId, DocumentId, OrganizationId};
use tracing::debug;

use super::config::StorageConfig;
use super::error::StorageError;
use procura_shared::config::StorageBackend;

/// A file to write to the store.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Organization uploading the file.
    pub organization_id: OrganizationId,
    /// Document the file belongs to, if any.
    pub document_id: Option<DocumentId>,
    /// Attachment ID.
    pub attachment_id: AttachmentId,
    /// Original filename.
    pub filename: String,
    /// Content type (MIME type).
    pub content_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl UploadRequest {
    /// File size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Result of a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Storage key inside the backend.
    pub storage_key: String,
    /// Backend-qualified reference recorded on the document.
    pub reference: String,
    /// File size in bytes.
    pub size: u64,
    /// Content type.
    pub content_type: String,
}

/// File-store collaborator: write bytes, get back a reference.
pub trait FileStore: Send + Sync {
    /// Store a file and return its reference.
    fn store(
        &self,
        upload: UploadRequest,
    ) -> impl Future<Output = Result<StoredFile, StorageError>> + Send;

    /// Read back the bytes stored under `key`.
    fn fetch(&self, key: &str) -> impl Future<Output = Result<Vec<u8>, StorageError>> + Send;

    /// Remove the file stored under `key`. Removing a missing key succeeds.
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// Storage service for signatures and receipts.
pub struct StorageService {
    operator: Operator,
    config: StorageConfig,
}

impl StorageService {
    /// Create a new storage service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.backend)?;
        Ok(Self { operator, config })
    }

    /// Create an in-memory store with default limits.
    ///
    /// # Errors
    ///
    /// Returns an error if the memory backend cannot be initialized.
    pub fn in_memory() -> Result<Self, StorageError> {
        Self::from_config(StorageConfig::new(StorageBackend::Memory))
    }

    /// Create OpenDAL operator from backend config.
    fn create_operator(backend: &StorageBackend) -> Result<Operator, StorageError> {
        let operator = match backend {
            StorageBackend::Memory => Operator::new(services::Memory::default())?.finish(),
            StorageBackend::LocalFs { root } => {
                let root = root
                    .to_str()
                    .ok_or_else(|| StorageError::configuration("invalid path"))?;
                Operator::new(services::Fs::default().root(root))?.finish()
            }
            StorageBackend::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);
                Operator::new(builder)?.finish()
            }
        };
        Ok(operator)
    }

    /// Validate an upload against config constraints.
    ///
    /// # Errors
    ///
    /// Returns an error if file size or MIME type is invalid.
    pub fn validate_upload(&self, content_type: &str, size: u64) -> Result<(), StorageError> {
        if size > self.config.max_file_size {
            return Err(StorageError::file_too_large(
                size,
                self.config.max_file_size,
            ));
        }

        if !self.config.is_mime_type_allowed(content_type) {
            return Err(StorageError::invalid_mime_type(content_type));
        }

        Ok(())
    }

    /// Generate storage key for an upload.
    ///
    /// Format: `{org_id}/{document_id}/{attachment_id}/{sanitized_filename}`
    #[must_use]
    pub fn generate_storage_key(req: &UploadRequest) -> String {
        let sanitized_filename = sanitize_filename(&req.filename);
        let document_part = req
            .document_id
            .map_or_else(|| "orphan".to_string(), |id| id.to_string());

        format!(
            "{}/{}/{}/{}",
            req.organization_id, document_part, req.attachment_id, sanitized_filename
        )
    }

    /// Backend-qualified reference for a storage key.
    #[must_use]
    pub fn reference_for(&self, key: &str) -> String {
        match &self.config.backend {
            StorageBackend::S3 { bucket, .. } => format!("s3://{bucket}/{key}"),
            StorageBackend::LocalFs { root } => format!("file://{}/{key}", root.display()),
            StorageBackend::Memory => format!("memory://{key}"),
        }
    }

    /// Get the storage backend name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.config.backend.name()
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }
}

impl FileStore for StorageService {
    async fn store(&self, upload: UploadRequest) -> Result<StoredFile, StorageError> {
        if upload.bytes.is_empty() {
            return Err(StorageError::EmptyFile {
                filename: upload.filename,
            });
        }
        let size = upload.size();
        self.validate_upload(&upload.content_type, size)?;

        let key = Self::generate_storage_key(&upload);
        self.operator
            .write(&key, upload.bytes)
            .await
            .map_err(StorageError::from)?;

        debug!(
            storage_key = %key,
            size,
            content_type = %upload.content_type,
            backend = self.provider_name(),
            "Stored file"
        );

        Ok(StoredFile {
            reference: self.reference_for(&key),
            storage_key: key,
            size,
            content_type: upload.content_type,
        })
    }

    async fn fetch(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let buffer = self.operator.read(key).await?;
        Ok(buffer.to_vec())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.operator.delete(key).await?;
        debug!(storage_key = %key, backend = self.provider_name(), "Removed file");
        Ok(())
    }
}

/// Sanitize filename for storage key.
///
/// Only allows ASCII alphanumeric characters, dots, hyphens, and underscores.
fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
