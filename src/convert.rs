//! Conversion entry points.
//!
//! Two layers with different error contracts:
//!
//! * [`convert`] — the typed orchestrator. Drives the whole pipeline and
//!   returns `Err(ConvertError)` with the precise failure variant.
//!
//! * [`process`] — the catch-all boundary the triggers call. Every pipeline
//!   error is appended to the per-source error log with a contextual message
//!   and collapsed into the generic failure text; callers never see internal
//!   detail. The only error `process` itself returns is a failure to write
//!   the error log.

use crate::config::ConversionConfig;
use crate::errlog::ErrorLog;
use crate::error::{ConvertError, StoreError};
use crate::output::{ConversionOutcome, ConversionOutput, ConversionResult, ConversionStats};
use crate::pipeline::decode::{self, FileKind};
use crate::pipeline::input::{self, SpreadsheetReference};
use crate::pipeline::remote::{
    HttpRemoteParser, RemoteOutcome, RemoteParseRequest, RemoteParser, ENDPOINT_ENV,
};
use crate::pipeline::{complexity, tabular};
use crate::store::BlobStore;
use serde_json::json;
use std::time::Instant;
use tracing::{info, warn};

/// Reported when the destination JSON has been written.
pub const SUCCESS_MESSAGE: &str = "JSON file successfully created.";

/// The single generic failure outcome; detail goes to the error log only.
pub const FAILURE_MESSAGE: &str = "Failed to process XLSX file.";

/// Convert one blob-stored spreadsheet to JSON.
///
/// This is the primary typed entry point for the library.
///
/// # Arguments
/// * `source` — (container, key) of the spreadsheet blob
/// * `config` — Conversion configuration
/// * `store`  — Blob store holding the source and receiving the outputs
///
/// # Errors
/// Returns `Err(ConvertError)` for every fatal condition: missing or empty
/// source, unrecognised suffix, decode failure, a sheet failing to convert
/// (no partial output is ever written), or a workbook with no data. A failed
/// remote delegation is not fatal — it logs a warning and the local path
/// produces the result.
pub async fn convert(
    source: &SpreadsheetReference,
    config: &ConversionConfig,
    store: &dyn BlobStore,
) -> Result<ConversionOutput, ConvertError> {
    let total_start = Instant::now();
    info!("Starting conversion: {}/{}", source.container, source.key);

    // ── Step 1: Fetch source bytes (existence + non-empty checks) ────────
    let bytes = input::fetch(store, source)?;

    // ── Step 2: Select the decode engine from the key suffix ─────────────
    let kind = FileKind::from_key(&source.key).ok_or_else(|| ConvertError::UnknownFormat {
        key: source.key.clone(),
    })?;
    let mut workbook = decode::decode(bytes, kind, &source.key)?;
    let sheet_names = workbook.sheet_names();

    // ── Step 3: Complexity detection ─────────────────────────────────────
    let complex = complexity::needs_remote_parsing(&mut workbook, config)?;

    // ── Step 4: Remote delegation for complex workbooks ──────────────────
    let mut remote_fallback = false;
    if complex {
        match delegate_remote(source, config).await {
            RemoteOutcome::Payload(payload) => {
                info!("Remote parser processed complex workbook '{}'", source.key);
                return Ok(ConversionOutput {
                    outcome: ConversionOutcome::Remote { payload },
                    stats: ConversionStats {
                        total_sheets: sheet_names.len(),
                        converted_sheets: 0,
                        skipped_sheets: 0,
                        remote_fallback: false,
                        total_duration_ms: total_start.elapsed().as_millis() as u64,
                    },
                });
            }
            RemoteOutcome::Error(reason) => {
                warn!("Remote processing failed, falling back to local parsing: {reason}");
                remote_fallback = true;
            }
        }
    }

    // ── Step 5: Convert each sheet, in workbook order ────────────────────
    let mut result = ConversionResult::new();
    let mut skipped = 0usize;
    for name in &sheet_names {
        let range = workbook
            .worksheet_range(name)
            .map_err(|e| ConvertError::SheetFailed {
                sheet: name.clone(),
                detail: e.to_string(),
            })?;

        let records = tabular::sheet_to_records(&range);
        if records.is_empty() {
            warn!("Sheet '{name}' is empty. Skipping.");
            skipped += 1;
            continue;
        }
        result.insert(name.clone(), records);
    }

    // ── Step 6: Refuse to write an empty document ────────────────────────
    if result.is_empty() {
        return Err(ConvertError::NoData {
            key: source.key.clone(),
        });
    }

    // ── Step 7: Serialize and upload ─────────────────────────────────────
    let json_bytes = result
        .to_json_bytes(config.pretty)
        .map_err(|e| ConvertError::Internal(format!("JSON serialisation failed: {e}")))?;
    let destination = source.destination_key();
    store
        .upload(
            &source.container,
            &destination,
            &json_bytes,
            "application/json",
        )
        .map_err(|e| ConvertError::Store {
            key: destination.clone(),
            source: e,
        })?;

    let stats = ConversionStats {
        total_sheets: sheet_names.len(),
        converted_sheets: result.sheet_count(),
        skipped_sheets: skipped,
        remote_fallback,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };
    info!(
        "Conversion complete: {}/{} sheets → '{}' in {}ms",
        stats.converted_sheets, stats.total_sheets, destination, stats.total_duration_ms
    );

    Ok(ConversionOutput {
        outcome: ConversionOutcome::Local { destination },
        stats,
    })
}

/// Run the pipeline behind the generic-outcome boundary.
///
/// On success the report carries [`SUCCESS_MESSAGE`] (local path) or the
/// remote parser's payload (delegated path). On failure a contextual line is
/// appended to the per-source error log and the report carries
/// [`FAILURE_MESSAGE`]. Only a failure to write that log escalates as `Err`.
pub async fn process(
    source: &SpreadsheetReference,
    config: &ConversionConfig,
    store: &dyn BlobStore,
) -> Result<ProcessReport, StoreError> {
    match convert(source, config, store).await {
        Ok(output) => {
            let message = match output.outcome {
                ConversionOutcome::Local { .. } => json!(SUCCESS_MESSAGE),
                ConversionOutcome::Remote { payload } => payload,
            };
            Ok(ProcessReport {
                success: true,
                message,
            })
        }
        Err(err) => {
            let line = contextual_message(&err, source);
            ErrorLog::new(store, &source.container, source.error_log_key()).append(&line)?;
            Ok(ProcessReport {
                success: false,
                message: json!(FAILURE_MESSAGE),
            })
        }
    }
}

/// Outcome of one [`process`] invocation.
#[derive(Debug, Clone)]
pub struct ProcessReport {
    pub success: bool,
    /// Message for the caller: a string for the local paths, or the remote
    /// parser's payload when the file was delegated.
    pub message: serde_json::Value,
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Resolve and call the remote parser, from most-specific to least-specific:
///
/// 1. **Pre-built parser** (`config.remote`) — the caller constructed the
///    client entirely; used as-is. This is how tests substitute the
///    transport.
/// 2. **Configured endpoint** (`config.remote_endpoint`) with the configured
///    timeout.
/// 3. **Environment endpoint** (`XLSX2JSON_REMOTE_ENDPOINT`) — deployment
///    environments set the service URL without touching code.
///
/// No resolvable remote is reported as an error descriptor like any other
/// remote failure, so the caller falls back to local parsing.
async fn delegate_remote(
    source: &SpreadsheetReference,
    config: &ConversionConfig,
) -> RemoteOutcome {
    let request = RemoteParseRequest::new(source);

    if let Some(ref remote) = config.remote {
        return remote.parse(&request).await;
    }

    let endpoint = config
        .remote_endpoint
        .clone()
        .or_else(|| std::env::var(ENDPOINT_ENV).ok().filter(|v| !v.is_empty()));
    let Some(endpoint) = endpoint else {
        return RemoteOutcome::Error("no remote parser configured".to_string());
    };

    match HttpRemoteParser::new(endpoint, config.remote_timeout_secs) {
        Ok(parser) => parser.parse(&request).await,
        Err(e) => RemoteOutcome::Error(format!("failed to construct remote client: {e}")),
    }
}

/// Error-log line for one failure, prefixed with the source key when the
/// error does not already carry its own context.
fn contextual_message(err: &ConvertError, source: &SpreadsheetReference) -> String {
    match err {
        // Already names the failing sheet.
        ConvertError::SheetFailed { .. } => err.to_string(),
        other => format!("Error processing file {}: {other}", source.key),
    }
}
