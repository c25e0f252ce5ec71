use std::path::Path;
use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use super::storage::BlobStore;
use crate::errors::ServiceError;

/// One uploaded multipart file
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

pub struct UploadService<S: BlobStore + ?Sized> {
    store: Arc<S>,
    max_bytes: usize,
    public_base_url: Option<String>,
    /// listener address, for requests that carry no `Host`
    fallback_base_url: String,
}

impl<S: BlobStore + ?Sized> UploadService<S> {
    pub fn new(store: Arc<S>, max_bytes: usize, public_base_url: Option<String>, fallback_base_url: String) -> Self {
        Self { store, max_bytes, public_base_url, fallback_base_url }
    }

    /// Store the file and return its absolute URL.
    ///
    /// The base is the configured public URL, else `request_base` (e.g. `http://host:3000`),
    /// else the listener address.
    #[instrument(skip(self, file, request_base))]
    pub async fn store(&self, file: Option<UploadFile>, request_base: Option<&str>) -> Result<String, ServiceError> {
        let file = file.ok_or_else(|| ServiceError::Validation("No file uploaded".into()))?;
        if file.bytes.is_empty() {
            return Err(ServiceError::Validation("Uploaded file is empty".into()));
        }
        if file.bytes.len() > self.max_bytes {
            return Err(ServiceError::Validation(format!("File too large (max {} bytes)", self.max_bytes)));
        }
        let key = format!("{}{}", Uuid::new_v4(), extension_of(file.file_name.as_deref()));
        let blob = self.store.put(&key, &file.bytes).await?;
        let base = self
            .public_base_url
            .as_deref()
            .or(request_base)
            .unwrap_or(self.fallback_base_url.as_str())
            .trim_end_matches('/');
        let url = format!("{base}/uploads/{}", blob.key);
        info!(key = %blob.key, size = blob.size, content_type = ?file.content_type, "file_uploaded");
        Ok(url)
    }
}

/// `.ext` from the client file name when short and alphanumeric, else empty.
fn extension_of(file_name: Option<&str>) -> String {
    file_name
        .and_then(|n| Path::new(n).extension())
        .and_then(|e| e.to_str())
        .filter(|e| (1..=8).contains(&e.len()) && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::storage::StoredBlob;
    use std::sync::Mutex;

    const LISTENER: &str = "http://127.0.0.1:3000";

    #[derive(Default)]
    struct RecordingStore {
        keys: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl BlobStore for RecordingStore {
        async fn put(&self, key: &str, data: &[u8]) -> Result<StoredBlob, ServiceError> {
            self.keys.lock().unwrap().push(key.to_string());
            Ok(StoredBlob { key: key.to_string(), size: data.len() as u64 })
        }
    }

    fn file(name: &str, bytes: &[u8]) -> Option<UploadFile> {
        Some(UploadFile { file_name: Some(name.into()), content_type: Some("image/jpeg".into()), bytes: bytes.to_vec() })
    }

    #[test]
    fn extension_is_sanitized() {
        assert_eq!(extension_of(Some("photo.JPG")), ".jpg");
        assert_eq!(extension_of(Some("archive.tar.gz")), ".gz");
        assert_eq!(extension_of(Some("noext")), "");
        assert_eq!(extension_of(Some("x.p$p")), "");
        assert_eq!(extension_of(None), "");
    }

    #[tokio::test]
    async fn rejects_missing_empty_and_oversize() {
        let svc = UploadService::new(Arc::new(RecordingStore::default()), 4, None, LISTENER.into());
        assert!(matches!(svc.store(None, None).await, Err(ServiceError::Validation(_))));
        assert!(matches!(svc.store(file("a.jpg", b""), None).await, Err(ServiceError::Validation(_))));
        assert!(matches!(svc.store(file("a.jpg", b"12345"), None).await, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn url_prefers_configured_base() {
        let store = Arc::new(RecordingStore::default());
        let svc = UploadService::new(store.clone(), 1024, Some("https://cdn.example.org".into()), LISTENER.into());
        let url = svc.store(file("a.jpg", b"abc"), Some("http://ignored:3000")).await.unwrap();
        let key = store.keys.lock().unwrap()[0].clone();
        assert!(key.ends_with(".jpg"));
        assert_eq!(url, format!("https://cdn.example.org/uploads/{key}"));

        let svc = UploadService::new(Arc::new(RecordingStore::default()), 1024, None, LISTENER.into());
        let url = svc.store(file("b.png", b"abc"), Some("http://10.0.2.2:3000/")).await.unwrap();
        assert!(url.starts_with("http://10.0.2.2:3000/uploads/"));
        assert!(url.ends_with(".png"));
    }

    #[tokio::test]
    async fn url_without_host_uses_listener_address() {
        let svc = UploadService::new(Arc::new(RecordingStore::default()), 1024, None, LISTENER.into());
        let url = svc.store(file("c.gif", b"abc"), None).await.unwrap();
        assert!(url.starts_with("http://127.0.0.1:3000/uploads/"), "{url}");
        assert!(url.ends_with(".gif"));
    }
}
