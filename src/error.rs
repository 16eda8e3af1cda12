//! Error types for the xlsx2json library.
//!
//! Two distinct error types reflect two distinct layers:
//!
//! * [`StoreError`] — a blob store operation failed. Returned by
//!   [`crate::store::BlobStore`] implementations and wrapped into
//!   [`ConvertError::Store`] when it surfaces inside the pipeline.
//!
//! * [`ConvertError`] — the conversion of one source file failed. Returned
//!   as `Err(ConvertError)` from [`crate::convert::convert`]. The
//!   [`crate::convert::process`] boundary collapses every variant into the
//!   generic failure message and an error-log line; callers of the typed API
//!   get the full variant instead.
//!
//! A failed remote delegation is deliberately **not** represented here: it is
//! non-fatal by contract and only produces a `tracing::warn!` before the
//! pipeline falls back to local parsing.

use thiserror::Error;

/// Errors raised by [`crate::store::BlobStore`] implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested blob does not exist in the container.
    #[error("blob not found: '{key}'")]
    NotFound { key: String },

    /// The underlying storage backend failed.
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// All errors returned by the conversion pipeline.
#[derive(Debug, Error)]
pub enum ConvertError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Source blob was not found in the container.
    #[error("file '{key}' does not exist in container '{container}'")]
    NotFound { container: String, key: String },

    /// Source blob exists but holds zero bytes.
    #[error("downloaded file '{key}' is empty")]
    EmptySource { key: String },

    /// The key ends in neither `.xls` nor `.xlsx`, so no decode engine
    /// can be selected for it.
    #[error("key '{key}' has no recognised spreadsheet suffix (.xls / .xlsx)")]
    UnknownFormat { key: String },

    // ── Decode errors ─────────────────────────────────────────────────────
    /// The selected engine could not decode the workbook bytes.
    #[error("failed to decode '{key}': {detail}")]
    Format { key: String, detail: String },

    // ── Conversion errors ─────────────────────────────────────────────────
    /// A single sheet failed to convert. Fatal for the whole file: no
    /// partial output is written.
    #[error("error processing sheet '{sheet}': {detail}")]
    SheetFailed { sheet: String, detail: String },

    /// Every sheet was empty after dropping all-null rows and columns.
    #[error("no valid data found in '{key}'")]
    NoData { key: String },

    // ── Storage errors ────────────────────────────────────────────────────
    /// A blob store call failed mid-pipeline.
    #[error("blob store operation failed for '{key}': {source}")]
    Store {
        key: String,
        #[source]
        source: StoreError,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),
}
