//! In-process blob store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{Blob, BlobStore, StorageError};

#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    objects: Arc<RwLock<HashMap<String, Blob>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn exists(&self, name: &str) -> Result<bool, StorageError> {
        Ok(self.objects.read().await.contains_key(name))
    }

    async fn upload(&self, name: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), StorageError> {
        let blob = Blob {
            bytes,
            content_type: Some(content_type.to_string()),
        };
        self.objects.write().await.insert(name.to_string(), blob);
        Ok(())
    }

    async fn download(&self, name: &str) -> Result<Blob, StorageError> {
        self.objects
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upload_overwrites() {
        let store = MemoryBlobStore::new();
        assert!(!store.exists("a.pdf").await.unwrap());

        store.upload("a.pdf", b"one".to_vec(), "application/pdf").await.unwrap();
        store.upload("a.pdf", b"two".to_vec(), "application/pdf").await.unwrap();

        assert!(store.exists("a.pdf").await.unwrap());
        assert_eq!(store.len().await, 1);
        let blob = store.download("a.pdf").await.unwrap();
        assert_eq!(blob.bytes, b"two");
        assert_eq!(blob.content_type.as_deref(), Some("application/pdf"));
    }

    #[tokio::test]
    async fn missing_object_is_not_found() {
        let store = MemoryBlobStore::new();
        assert!(matches!(
            store.download("missing.dwg").await,
            Err(StorageError::NotFound(name)) if name == "missing.dwg"
        ));
    }
}
