//! Input resolution: locate the source blob and pull its bytes.
//!
//! A [`SpreadsheetReference`] is the immutable identity of one source file.
//! The derived names live here too, because they are pure functions of the
//! key: the destination document swaps the spreadsheet suffix for `.json`,
//! and the error log swaps it for `_error.log`, so every artifact of one
//! source file sits next to it in the same container.

use crate::error::ConvertError;
use crate::store::BlobStore;
use tracing::debug;

/// Identity of one source spreadsheet blob. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpreadsheetReference {
    pub container: String,
    pub key: String,
}

impl SpreadsheetReference {
    pub fn new(container: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            key: key.into(),
        }
    }

    /// Key of the destination JSON document.
    pub fn destination_key(&self) -> String {
        replace_suffix(&self.key, ".json")
    }

    /// Key of the per-source error log blob.
    pub fn error_log_key(&self) -> String {
        replace_suffix(&self.key, "_error.log")
    }
}

/// Swap a recognised spreadsheet suffix for `replacement`; keys without one
/// get the replacement appended so derived names are always distinct from
/// the source key.
fn replace_suffix(key: &str, replacement: &str) -> String {
    if let Some(stem) = key.strip_suffix(".xlsx") {
        format!("{stem}{replacement}")
    } else if let Some(stem) = key.strip_suffix(".xls") {
        format!("{stem}{replacement}")
    } else {
        format!("{key}{replacement}")
    }
}

/// Fetch the source bytes, enforcing the existence and non-empty contracts.
pub fn fetch(store: &dyn BlobStore, source: &SpreadsheetReference) -> Result<Vec<u8>, ConvertError> {
    let exists = store
        .exists(&source.container, &source.key)
        .map_err(|e| ConvertError::Store {
            key: source.key.clone(),
            source: e,
        })?;
    if !exists {
        return Err(ConvertError::NotFound {
            container: source.container.clone(),
            key: source.key.clone(),
        });
    }

    let bytes = store
        .download(&source.container, &source.key)
        .map_err(|e| ConvertError::Store {
            key: source.key.clone(),
            source: e,
        })?;

    if bytes.is_empty() {
        return Err(ConvertError::EmptySource {
            key: source.key.clone(),
        });
    }

    debug!("Downloaded {} bytes for '{}'", bytes.len(), source.key);
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryBlobStore;

    #[test]
    fn destination_key_replaces_either_suffix() {
        let xlsx = SpreadsheetReference::new("c", "reports/q1.xlsx");
        assert_eq!(xlsx.destination_key(), "reports/q1.json");

        let xls = SpreadsheetReference::new("c", "legacy.xls");
        assert_eq!(xls.destination_key(), "legacy.json");
    }

    #[test]
    fn error_log_key_replaces_either_suffix() {
        let xlsx = SpreadsheetReference::new("c", "q1.xlsx");
        assert_eq!(xlsx.error_log_key(), "q1_error.log");

        let xls = SpreadsheetReference::new("c", "q1.xls");
        assert_eq!(xls.error_log_key(), "q1_error.log");
    }

    #[test]
    fn fetch_missing_blob_is_not_found() {
        let store = MemoryBlobStore::new();
        let source = SpreadsheetReference::new("c", "absent.xlsx");
        let err = fetch(&store, &source).unwrap_err();
        assert!(matches!(err, ConvertError::NotFound { .. }));
    }

    #[test]
    fn fetch_zero_byte_blob_is_empty_source() {
        let store = MemoryBlobStore::new();
        store.insert("c", "empty.xlsx", Vec::new());
        let source = SpreadsheetReference::new("c", "empty.xlsx");
        let err = fetch(&store, &source).unwrap_err();
        assert!(matches!(err, ConvertError::EmptySource { .. }));
    }

    #[test]
    fn fetch_returns_bytes() {
        let store = MemoryBlobStore::new();
        store.insert("c", "data.xlsx", vec![1, 2, 3]);
        let source = SpreadsheetReference::new("c", "data.xlsx");
        assert_eq!(fetch(&store, &source).unwrap(), vec![1, 2, 3]);
    }
}
