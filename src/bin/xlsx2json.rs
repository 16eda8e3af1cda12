//! CLI binary for xlsx2json.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConversionConfig`, runs the pipeline against a directory-backed blob
//! store, and prints the outcome.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use xlsx2json::{process, ConversionConfig, LocalBlobStore, SpreadsheetReference};

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert uploads/report.xlsx under /var/blobs; writes uploads/report.json
  xlsx2json --store-root /var/blobs --container uploads report.xlsx

  # Print the destination JSON to stdout as well
  xlsx2json --store-root /var/blobs report.xlsx --print

  # Complex workbooks go to a remote layout parser first
  xlsx2json --store-root /var/blobs report.xlsx \
      --remote-endpoint https://complex-parser.internal/parse

  # Machine-readable report
  xlsx2json --store-root /var/blobs report.xlsx --json

STORE LAYOUT:
  Blobs live at <store-root>/<container>/<key>. The destination JSON and the
  error log are written next to the source:
    report.xlsx  →  report.json
                 →  report_error.log   (only on failure)

ENVIRONMENT VARIABLES:
  XLSX2JSON_REMOTE_ENDPOINT   Remote complex-parser URL (same as --remote-endpoint)
"#;

/// Convert a blob-stored XLS/XLSX workbook to record-oriented JSON.
#[derive(Parser, Debug)]
#[command(
    name = "xlsx2json",
    version,
    about = "Convert blob-stored XLS/XLSX workbooks to record-oriented JSON",
    long_about = "Convert XLS/XLSX workbooks held in a directory-backed blob store into \
record-oriented JSON documents. Structurally complex workbooks (merged cells, report \
templates) are forwarded to a remote layout parser when one is configured, with automatic \
fallback to local parsing.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Blob key of the source workbook (must end in .xls or .xlsx).
    key: String,

    /// Root directory of the blob store.
    #[arg(long, env = "XLSX2JSON_STORE_ROOT")]
    store_root: PathBuf,

    /// Container (subdirectory) holding the source blob.
    #[arg(long, env = "XLSX2JSON_CONTAINER", default_value = "default")]
    container: String,

    /// Remote complex-parser endpoint URL.
    #[arg(long, env = "XLSX2JSON_REMOTE_ENDPOINT")]
    remote_endpoint: Option<String>,

    /// Remote parse timeout in seconds.
    #[arg(long, env = "XLSX2JSON_REMOTE_TIMEOUT", default_value_t = 300)]
    remote_timeout: u64,

    /// Write compact JSON instead of 4-space indented.
    #[arg(long)]
    compact: bool,

    /// Print the destination JSON document to stdout on success.
    #[arg(long)]
    print: bool,

    /// Output a machine-readable JSON report instead of the summary line.
    #[arg(long)]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "XLSX2JSON_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "XLSX2JSON_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config and store ───────────────────────────────────────────
    let mut builder = ConversionConfig::builder()
        .remote_timeout_secs(cli.remote_timeout)
        .pretty(!cli.compact);
    if let Some(ref endpoint) = cli.remote_endpoint {
        builder = builder.remote_endpoint(endpoint);
    }
    let config = builder.build().context("Invalid configuration")?;

    let store = LocalBlobStore::new(&cli.store_root);
    let source = SpreadsheetReference::new(&cli.container, &cli.key);

    // ── Run the pipeline ─────────────────────────────────────────────────
    let report = process(&source, &config, &store)
        .await
        .context("Processing failed before the error log could be written")?;

    if cli.json {
        let out = serde_json::json!({
            "success": report.success,
            "message": report.message,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if report.success {
        if !cli.quiet {
            eprintln!(
                "{} {}  →  {}",
                green("✔"),
                bold(&cli.key),
                source.destination_key()
            );
        }
    } else {
        eprintln!(
            "{} {}  —  see {}",
            red("✘"),
            report.message.as_str().unwrap_or("processing failed"),
            source.error_log_key()
        );
    }

    if report.success && cli.print {
        use xlsx2json::BlobStore;
        let json_bytes = store
            .download(&cli.container, &source.destination_key())
            .context("Destination JSON was not written locally (remote delegation?)")?;
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(&json_bytes)?;
        if !json_bytes.ends_with(b"\n") {
            handle.write_all(b"\n").ok();
        }
    }

    if !report.success {
        std::process::exit(1);
    }
    Ok(())
}
