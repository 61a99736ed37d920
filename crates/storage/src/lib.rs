//! Blob storage for document attachments.
//!
//! Files live in a single bucket, keyed by the document's filename. The
//! [`BlobStore`] trait is the seam the API depends on; [`S3BlobStore`] talks to
//! an S3-compatible endpoint and [`MemoryBlobStore`] backs tests.

pub mod memory;
pub mod s3;

use async_trait::async_trait;

pub use memory::MemoryBlobStore;
pub use s3::{S3BlobStore, S3Settings};

/// Bucket used when none is configured.
pub const DEFAULT_BUCKET: &str = "documentos_ingenieria";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// A downloaded object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn exists(&self, name: &str) -> Result<bool, StorageError>;

    /// Store `bytes` under `name`, replacing any existing object.
    async fn upload(&self, name: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), StorageError>;

    async fn download(&self, name: &str) -> Result<Blob, StorageError>;
}
