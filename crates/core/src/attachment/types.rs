//! Attachment types and data structures.

use chrono::{DateTime, Utc};
use procura_shared::types::{AttachmentId, OrganizationId};
use serde::{Deserialize, Serialize};

/// What an attached file evidences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentPurpose {
    /// Signed contract.
    Signature,
    /// Proof of payment.
    Receipt,
    /// Any other supporting file.
    #[default]
    Other,
}

impl AttachmentPurpose {
    /// Returns the string representation of the purpose.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Signature => "signature",
            Self::Receipt => "receipt",
            Self::Other => "other",
        }
    }

    /// Parses a purpose from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "signature" => Some(Self::Signature),
            "receipt" => Some(Self::Receipt),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// A file supplied by a caller alongside a transition or payment.
#[derive(Debug, Clone)]
pub struct FileUpload {
    /// Original filename.
    pub filename: String,
    /// MIME type.
    pub content_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
    /// What the file evidences.
    pub purpose: AttachmentPurpose,
}

impl FileUpload {
    /// Creates an upload.
    #[must_use]
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
        purpose: AttachmentPurpose,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            bytes,
            purpose,
        }
    }
}

/// Reference to a stored file, as recorded on a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentRef {
    /// Unique identifier.
    pub id: AttachmentId,
    /// What the file evidences.
    pub purpose: AttachmentPurpose,
    /// Reference returned by the file store.
    pub reference: String,
    /// Key of the file inside the store.
    pub storage_key: String,
    /// Original filename.
    pub filename: String,
    /// MIME type.
    pub content_type: String,
    /// File size in bytes.
    pub size: u64,
    /// Organization that uploaded the file.
    pub uploaded_by: OrganizationId,
    /// Upload timestamp.
    pub uploaded_at: DateTime<Utc>,
}
