//! Trigger shims: map storage events and HTTP requests onto the pipeline.
//!
//! The hosting platform owns the actual wiring — event subscription, HTTP
//! routing, authentication. These handlers take the already-delivered inputs
//! (an event payload, a request body) and return plain values (a message
//! string, a status + JSON body), so they slot behind any framework without
//! this crate depending on one.

use crate::config::ConversionConfig;
use crate::convert::process;
use crate::pipeline::decode::FileKind;
use crate::pipeline::input::SpreadsheetReference;
use crate::store::BlobStore;
use serde_json::{json, Value};
use tracing::{error, warn};

/// Returned by the event trigger for keys that are not spreadsheets.
pub const IGNORED_MESSAGE: &str = "Ignoring non-Excel file.";

/// Returned by the event trigger when the invocation itself fails.
pub const EVENT_FAILURE_MESSAGE: &str = "Function execution failed.";

/// An HTTP trigger response: status code plus JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Value,
}

/// Storage-event entry point: called when a blob is created.
///
/// `data` is the raw event payload carrying `bucket` and `name`. Keys not
/// ending in `.xls`/`.xlsx` are ignored with nothing written.
pub async fn handle_event(
    data: &Value,
    config: &ConversionConfig,
    store: &dyn BlobStore,
) -> String {
    let (Some(bucket), Some(name)) = (
        data.get("bucket").and_then(Value::as_str),
        data.get("name").and_then(Value::as_str),
    ) else {
        error!("Malformed storage event, missing bucket/name: {data}");
        return EVENT_FAILURE_MESSAGE.to_string();
    };

    if FileKind::from_key(name).is_none() {
        warn!("Ignoring non-Excel file: {name}");
        return IGNORED_MESSAGE.to_string();
    }

    let source = SpreadsheetReference::new(bucket, name);
    match process(&source, config, store).await {
        Ok(report) => render_message(&report.message),
        Err(e) => {
            error!("Critical error in event handling: {e}");
            EVENT_FAILURE_MESSAGE.to_string()
        }
    }
}

/// HTTP entry point: a JSON body of `{"bucket": ..., "name": ...}`.
///
/// Responses follow the service contract: 400 for a malformed body or
/// missing parameters, 200 with `{"message": ...}` on a completed run
/// (including the generic failure message), 500 only when the failure
/// could not even be recorded in the error log.
pub async fn handle_http(
    body: &[u8],
    config: &ConversionConfig,
    store: &dyn BlobStore,
) -> HttpResponse {
    let Ok(Value::Object(payload)) = serde_json::from_slice::<Value>(body) else {
        return HttpResponse {
            status: 400,
            body: json!({"error": "Invalid JSON payload"}),
        };
    };

    let bucket = payload.get("bucket").and_then(Value::as_str).unwrap_or("");
    let name = payload.get("name").and_then(Value::as_str).unwrap_or("");
    if bucket.is_empty() || name.is_empty() {
        return HttpResponse {
            status: 400,
            body: json!({"error": "Missing required parameters"}),
        };
    }

    let source = SpreadsheetReference::new(bucket, name);
    match process(&source, config, store).await {
        Ok(report) => HttpResponse {
            status: 200,
            body: json!({"message": report.message}),
        },
        Err(e) => {
            error!("Error processing HTTP request: {e}");
            HttpResponse {
                status: 500,
                body: json!({"error": e.to_string()}),
            }
        }
    }
}

/// Render a report message for the string-valued event response.
fn render_message(message: &Value) -> String {
    match message {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryBlobStore;

    #[tokio::test]
    async fn event_ignores_non_spreadsheet_keys() {
        let store = MemoryBlobStore::new();
        let config = ConversionConfig::default();
        let data = json!({"bucket": "c", "name": "readme.txt"});

        let message = handle_event(&data, &config, &store).await;
        assert_eq!(message, IGNORED_MESSAGE);
        // nothing written: no destination, no error log
        assert!(!store.exists("c", "readme.json").unwrap());
        assert!(!store.exists("c", "readme.txt_error.log").unwrap());
    }

    #[tokio::test]
    async fn event_with_missing_fields_fails_generically() {
        let store = MemoryBlobStore::new();
        let config = ConversionConfig::default();

        let message = handle_event(&json!({"bucket": "c"}), &config, &store).await;
        assert_eq!(message, EVENT_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn http_rejects_malformed_body() {
        let store = MemoryBlobStore::new();
        let config = ConversionConfig::default();

        let response = handle_http(b"{not json", &config, &store).await;
        assert_eq!(response.status, 400);
        assert_eq!(response.body["error"], "Invalid JSON payload");

        // valid JSON that is not an object is also malformed
        let response = handle_http(b"null", &config, &store).await;
        assert_eq!(response.status, 400);
        assert_eq!(response.body["error"], "Invalid JSON payload");
    }

    #[tokio::test]
    async fn http_rejects_missing_parameters() {
        let store = MemoryBlobStore::new();
        let config = ConversionConfig::default();

        for body in [
            json!({}),
            json!({"bucket": "c"}),
            json!({"name": "a.xlsx"}),
            json!({"bucket": "", "name": "a.xlsx"}),
        ] {
            let raw = serde_json::to_vec(&body).unwrap();
            let response = handle_http(&raw, &config, &store).await;
            assert_eq!(response.status, 400, "body: {body}");
            assert_eq!(response.body["error"], "Missing required parameters");
        }
    }

    #[tokio::test]
    async fn http_missing_source_reports_generic_failure_with_200() {
        let store = MemoryBlobStore::new();
        let config = ConversionConfig::default();
        let raw = serde_json::to_vec(&json!({"bucket": "c", "name": "gone.xlsx"})).unwrap();

        let response = handle_http(&raw, &config, &store).await;
        assert_eq!(response.status, 200);
        assert_eq!(response.body["message"], crate::convert::FAILURE_MESSAGE);
        // the failure was recorded in the error log
        assert!(store.exists("c", "gone_error.log").unwrap());
    }
}
