use std::path::PathBuf;

use async_trait::async_trait;

use crate::errors::ServiceError;

/// Metadata of a written blob.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredBlob {
    pub key: String,
    pub size: u64,
}

/// Storage backend trait.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, key: &str, data: &[u8]) -> Result<StoredBlob, ServiceError>;
}

/// Local filesystem storage; files are served back by the HTTP layer's static route.
pub struct LocalBlobStore {
    base_path: PathBuf,
}

impl LocalBlobStore {
    pub fn new<P: Into<PathBuf>>(base_path: P) -> Self {
        Self { base_path: base_path.into() }
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, key: &str, data: &[u8]) -> Result<StoredBlob, ServiceError> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(ServiceError::Storage(format!("invalid blob key: {key}")));
        }
        tokio::fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| ServiceError::Storage(format!("failed to create directory: {e}")))?;
        let path = self.base_path.join(key);
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| ServiceError::Storage(format!("failed to write file: {e}")))?;
        Ok(StoredBlob { key: key.to_string(), size: data.len() as u64 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_under_base_path() -> Result<(), anyhow::Error> {
        let dir = std::env::temp_dir().join(format!("blob_store_{}", uuid::Uuid::new_v4()));
        let store = LocalBlobStore::new(&dir);

        let blob = store.put("a.png", b"\x89PNG").await?;
        assert_eq!(blob.size, 4);
        assert_eq!(tokio::fs::read(dir.join("a.png")).await?, b"\x89PNG");

        assert!(store.put("../escape.png", b"x").await.is_err());
        assert!(store.put(".hidden", b"x").await.is_err());

        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }
}
