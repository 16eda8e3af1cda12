//! Blob store seam: the trait the pipeline talks to, plus two bundled
//! implementations.
//!
//! The pipeline never names a cloud SDK. Everything it needs from storage is
//! three synchronous calls — existence check, download, upload — so the host
//! platform passes in whatever implements [`BlobStore`]: one of the bundled
//! stores below, or its own adapter over a cloud client. All blob I/O is
//! blocking from the orchestrator's perspective; only the remote delegation
//! call is awaited.
//!
//! * [`MemoryBlobStore`] — mutex-guarded map. Used by the test suite and by
//!   embedders that stage bytes in process.
//! * [`LocalBlobStore`] — one directory per container under a root path.
//!   Uploads write a temporary sibling and rename it into place so a
//!   half-written destination blob is never observable.

use crate::error::StoreError;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

/// Byte-blob storage addressed by (container, key).
pub trait BlobStore: Send + Sync {
    /// Whether the blob exists.
    fn exists(&self, container: &str, key: &str) -> Result<bool, StoreError>;

    /// Download the full blob contents.
    fn download(&self, container: &str, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Create or overwrite the blob.
    fn upload(
        &self,
        container: &str,
        key: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<(), StoreError>;
}

/// In-memory [`BlobStore`] keyed by (container, key).
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<(String, String), (Vec<u8>, String)>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a blob directly, bypassing the trait.
    pub fn insert(&self, container: &str, key: &str, bytes: Vec<u8>) {
        self.blobs.lock().unwrap().insert(
            (container.to_string(), key.to_string()),
            (bytes, "application/octet-stream".to_string()),
        );
    }

    /// Fetch a blob's bytes, if present.
    pub fn get(&self, container: &str, key: &str) -> Option<Vec<u8>> {
        self.blobs
            .lock()
            .unwrap()
            .get(&(container.to_string(), key.to_string()))
            .map(|(bytes, _)| bytes.clone())
    }

    /// Content type recorded at upload time, if the blob exists.
    pub fn content_type(&self, container: &str, key: &str) -> Option<String> {
        self.blobs
            .lock()
            .unwrap()
            .get(&(container.to_string(), key.to_string()))
            .map(|(_, ct)| ct.clone())
    }
}

impl BlobStore for MemoryBlobStore {
    fn exists(&self, container: &str, key: &str) -> Result<bool, StoreError> {
        Ok(self
            .blobs
            .lock()
            .unwrap()
            .contains_key(&(container.to_string(), key.to_string())))
    }

    fn download(&self, container: &str, key: &str) -> Result<Vec<u8>, StoreError> {
        self.get(container, key)
            .ok_or_else(|| StoreError::NotFound { key: key.to_string() })
    }

    fn upload(
        &self,
        container: &str,
        key: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<(), StoreError> {
        self.blobs.lock().unwrap().insert(
            (container.to_string(), key.to_string()),
            (bytes.to_vec(), content_type.to_string()),
        );
        Ok(())
    }
}

/// Filesystem-backed [`BlobStore`]: `<root>/<container>/<key>`.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn blob_path(&self, container: &str, key: &str) -> PathBuf {
        self.root.join(container).join(key)
    }
}

impl BlobStore for LocalBlobStore {
    fn exists(&self, container: &str, key: &str) -> Result<bool, StoreError> {
        Ok(self.blob_path(container, key).is_file())
    }

    fn download(&self, container: &str, key: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.blob_path(container, key);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound { key: key.to_string() })
            }
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn upload(
        &self,
        container: &str,
        key: &str,
        bytes: &[u8],
        _content_type: &str,
    ) -> Result<(), StoreError> {
        let path = self.blob_path(container, key);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Atomic write: write to a temp sibling, then rename.
        let tmp = path.with_extension("blob.tmp");
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}
