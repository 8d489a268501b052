//! Signature and receipt attachments.
//!
//! An upload is validated and written through a [`FileStore`](crate::storage::FileStore);
//! the document keeps only the resulting [`AttachmentRef`].

mod service;
mod types;

pub use service::AttachmentService;
pub use types::{AttachmentPurpose, AttachmentRef, FileUpload};
