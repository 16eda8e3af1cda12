//! Append-only error log kept next to the source file.
//!
//! Every failed conversion leaves a human-readable trace in a per-source log
//! blob (`<key>_error.log`), one UTC-timestamped line per failure. The blob
//! store only offers whole-blob writes, so appending is read-modify-write:
//! download the existing log if present, add the line, upload the whole
//! thing. Concurrent invocations of the same source file can interleave on
//! that window and lose lines — an accepted limitation of the storage
//! contract, not something this type papers over.

use crate::error::StoreError;
use crate::store::BlobStore;
use chrono::Utc;
use tracing::error;

/// Handle to one source file's error log blob.
pub struct ErrorLog<'a> {
    store: &'a dyn BlobStore,
    container: &'a str,
    key: String,
}

impl<'a> ErrorLog<'a> {
    /// `key` is the log blob's own key (see
    /// [`crate::pipeline::input::SpreadsheetReference::error_log_key`]).
    pub fn new(store: &'a dyn BlobStore, container: &'a str, key: String) -> Self {
        Self { store, container, key }
    }

    /// Append one message line, creating the log blob if absent.
    pub fn append(&self, message: &str) -> Result<(), StoreError> {
        error!("{message}");

        let mut log = if self.store.exists(self.container, &self.key)? {
            String::from_utf8_lossy(&self.store.download(self.container, &self.key)?).into_owned()
        } else {
            String::new()
        };

        let stamp = Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
        log.push_str(&format!("{stamp} {message}\n"));

        self.store
            .upload(self.container, &self.key, log.as_bytes(), "text/plain")
    }
}
