//! # xlsx2json
//!
//! Convert XLS/XLSX workbooks held in a blob store into record-oriented JSON
//! documents persisted back to the same store.
//!
//! ## Why this crate?
//!
//! Plain tabular extraction breaks on spreadsheets people actually upload —
//! merged title cells, template-driven report sheets, half-filled grids. This
//! crate runs a single parse-or-forward pipeline: workbooks that look simple
//! are converted locally, workbooks that look structurally complex are handed
//! to a remote layout-aware parser, and a remote failure quietly falls back
//! to the local path so one flaky service never blocks a conversion that
//! would have worked anyway.
//!
//! ## Pipeline Overview
//!
//! ```text
//! blob (.xls/.xlsx)
//!  │
//!  ├─ 1. Input       existence + non-empty checks, download bytes
//!  ├─ 2. Decode      engine from key suffix (calamine xls / xlsx)
//!  ├─ 3. Complexity  missing cells or structured-report sheet names?
//!  ├─ 4. Remote      complex → POST to the layout parser, fall back on error
//!  ├─ 5. Tabular     header row 0, drop all-null columns/rows, skip empties
//!  └─ 6. Output      JSON to `<key>.json`, failures to `<key>_error.log`
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use xlsx2json::{convert, ConversionConfig, LocalBlobStore, SpreadsheetReference};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = LocalBlobStore::new("/var/blobs");
//!     let source = SpreadsheetReference::new("uploads", "q1/report.xlsx");
//!     let config = ConversionConfig::default();
//!     let output = convert(&source, &config, &store).await?;
//!     println!("{:?}", output.outcome);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `xlsx2json` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! xlsx2json = { version = "0.3", default-features = false }
//! ```
//!
//! ## Hosting
//!
//! The crate carries no storage SDK and no HTTP server. Storage is the
//! [`BlobStore`] trait (two local implementations are bundled; cloud adapters
//! are the host's); the [`trigger`] handlers are plain request→response
//! values the hosting platform wires behind its own event and HTTP routing.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod errlog;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod store;
pub mod trigger;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, DEFAULT_COMPLEX_SHEET_NAMES};
pub use convert::{convert, process, ProcessReport, FAILURE_MESSAGE, SUCCESS_MESSAGE};
pub use errlog::ErrorLog;
pub use error::{ConvertError, StoreError};
pub use output::{
    CellValue, ConversionOutcome, ConversionOutput, ConversionResult, ConversionStats, Record,
};
pub use pipeline::decode::FileKind;
pub use pipeline::input::SpreadsheetReference;
pub use pipeline::remote::{
    HttpRemoteParser, RemoteOutcome, RemoteParseRequest, RemoteParser,
};
pub use store::{BlobStore, LocalBlobStore, MemoryBlobStore};
pub use trigger::{handle_event, handle_http, HttpResponse};
