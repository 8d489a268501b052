//! Engine error types.
//!
//! Every fallible engine operation returns [`EngineError`]. Variants carry
//! the document id, attempted action and current state where they apply so
//! callers can render a precise message.

use procura_shared::types::{DocumentId, OrganizationId};
use thiserror::Error;

use crate::document::DocumentKind;
use crate::storage::StorageError;
use crate::workflow::{Action, DocumentStatus};

/// Result type alias using `EngineError`.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur during engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    // ========== Input Errors ==========
    /// Malformed or out-of-range input.
    #[error("Validation failed for {field}: {message}")]
    Validation {
        /// Path of the failing field (e.g. `items[1].quantity`).
        field: String,
        /// Human-readable description.
        message: String,
    },

    // ========== Lifecycle Errors ==========
    /// Action is not legal from the document's current state.
    #[error("Cannot {action} {kind} {document_id} in status {status}")]
    InvalidTransition {
        /// The document the action was attempted on.
        document_id: DocumentId,
        /// The document type.
        kind: DocumentKind,
        /// The current status.
        status: DocumentStatus,
        /// The attempted action.
        action: Action,
    },

    /// Actor is not entitled to perform the action.
    #[error("Organization {actor} is not allowed to {action} document {document_id}")]
    UnauthorizedAction {
        /// The document the action was attempted on.
        document_id: DocumentId,
        /// The attempted action.
        action: Action,
        /// The acting organization.
        actor: OrganizationId,
    },

    /// Document has left its editable state.
    #[error("Document {document_id} cannot be edited in status {status}")]
    NotEditable {
        /// The document.
        document_id: DocumentId,
        /// The current status.
        status: DocumentStatus,
    },

    // ========== Derivation Errors ==========
    /// Source document lacks data the target type requires.
    #[error("Source document {source_id} is missing required data: {field}")]
    MissingSourceData {
        /// The source document.
        source_id: DocumentId,
        /// The missing field.
        field: String,
    },

    /// More than one source was supplied where exactly one is allowed.
    #[error("Derivation requires exactly one source document, got {}", .sources.len())]
    AmbiguousSource {
        /// The conflicting sources.
        sources: Vec<DocumentId>,
    },

    /// No mapping exists between the two document types.
    #[error("Cannot derive {to} from {from}")]
    UnsupportedDerivation {
        /// Source document type.
        from: DocumentKind,
        /// Requested target type.
        to: DocumentKind,
    },

    // ========== Persistence Errors ==========
    /// Document not found.
    #[error("{kind} {id} not found")]
    NotFound {
        /// The requested document type.
        kind: DocumentKind,
        /// The requested id.
        id: DocumentId,
    },

    /// Stale write detected by the repository.
    #[error("Document {document_id} was modified concurrently: expected version {expected}, found {actual}")]
    Conflict {
        /// The document.
        document_id: DocumentId,
        /// Version the caller loaded.
        expected: u64,
        /// Version currently stored.
        actual: u64,
    },

    // ========== Collaborator Errors ==========
    /// File store failure.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Renderer failure.
    #[error("Render error: {0}")]
    Render(String),
}

impl EngineError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a missing source data error.
    #[must_use]
    pub fn missing_source_data(source_id: DocumentId, field: impl Into<String>) -> Self {
        Self::MissingSourceData {
            source_id,
            field: field.into(),
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::UnauthorizedAction { .. } => "UNAUTHORIZED_ACTION",
            Self::NotEditable { .. } => "DOCUMENT_NOT_EDITABLE",
            Self::MissingSourceData { .. } => "MISSING_SOURCE_DATA",
            Self::AmbiguousSource { .. } => "AMBIGUOUS_SOURCE",
            Self::UnsupportedDerivation { .. } => "UNSUPPORTED_DERIVATION",
            Self::NotFound { .. } => "DOCUMENT_NOT_FOUND",
            Self::Conflict { .. } => "CONFLICT",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Render(_) => "RENDER_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::Validation { .. } => 400,

            // 403 Forbidden - permission errors
            Self::UnauthorizedAction { .. } => 403,

            // 404 Not Found
            Self::NotFound { .. } => 404,

            // 409 Conflict - state and concurrency errors
            Self::InvalidTransition { .. } | Self::NotEditable { .. } | Self::Conflict { .. } => {
                409
            }

            // 422 Unprocessable - derivation preconditions
            Self::MissingSourceData { .. }
            | Self::AmbiguousSource { .. }
            | Self::UnsupportedDerivation { .. } => 422,

            // 500 Internal Server Error
            Self::Storage(_) | Self::Render(_) => 500,
        }
    }

    /// Returns true if the caller should reload the document and retry.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}
