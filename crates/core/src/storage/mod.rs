//! File store for signatures and payment receipts using Apache OpenDAL.
//!
//! The engine never keeps raw bytes: uploads go through a [`FileStore`]
//! and only the returned reference is recorded on the document.
//!
//! # Backends
//!
//! - In-process memory (tests, local walkthroughs)
//! - Local filesystem (development only)
//! - S3-compatible: Cloudflare R2, Supabase Storage, AWS S3
//!
//! ```text
//! sign / partial payment with a file
//!   │
//!   ├─ dry-run the action ──────────── rejected: nothing is stored
//!   ├─ FileStore::store  ──► {org}/{document}/{attachment}/{file}
//!   ├─ apply the action, save
//!   │     └─ save fails ──► FileStore::remove(key)
//!   └─ AttachmentRef { reference, storage_key } kept on the document
//! ```

mod config;
mod error;
mod service;

pub use config::StorageConfig;
pub use error::StorageError;
pub use procura_shared::config::StorageBackend;
pub use service::{FileStore, StorageService, StoredFile, UploadRequest};
