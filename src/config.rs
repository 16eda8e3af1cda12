//! Configuration types for spreadsheet-to-JSON conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share configs across invocations, and to construct the whole
//! pipeline from CLI flags or host-platform settings in one place.

use crate::error::ConvertError;
use crate::pipeline::remote::RemoteParser;
use std::fmt;
use std::sync::Arc;

/// Sheet names that mark a workbook as a structured report, checked
/// case-insensitively by the complexity detector.
pub const DEFAULT_COMPLEX_SHEET_NAMES: &[&str] = &["overview", "metadata schema", "report"];

/// Configuration for one conversion pipeline.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use xlsx2json::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .remote_endpoint("https://complex-parser.internal/parse")
///     .remote_timeout_secs(120)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Endpoint of the remote complex-parser service. If `None` (and the
    /// `XLSX2JSON_REMOTE_ENDPOINT` environment variable is unset), a complex
    /// file falls straight back to local parsing.
    pub remote_endpoint: Option<String>,

    /// Timeout for the remote parse call in seconds. Default: 300.
    ///
    /// The remote service runs a layout engine over the whole workbook, so
    /// its latency is minutes, not milliseconds, on large files. This is the
    /// only deadline the pipeline enforces; there is no overall invocation
    /// timeout.
    pub remote_timeout_secs: u64,

    /// Sheet names that flag the workbook as complex regardless of content,
    /// compared case-insensitively. Default: [`DEFAULT_COMPLEX_SHEET_NAMES`].
    pub complex_sheet_names: Vec<String>,

    /// Serialize the destination JSON with 4-space indentation. Default: true.
    pub pretty: bool,

    /// Pre-constructed remote parser. Takes precedence over
    /// `remote_endpoint`. Lets tests and embedders substitute the HTTP
    /// client entirely.
    pub remote: Option<Arc<dyn RemoteParser>>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            remote_endpoint: None,
            remote_timeout_secs: 300,
            complex_sheet_names: DEFAULT_COMPLEX_SHEET_NAMES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            pretty: true,
            remote: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("remote_endpoint", &self.remote_endpoint)
            .field("remote_timeout_secs", &self.remote_timeout_secs)
            .field("complex_sheet_names", &self.complex_sheet_names)
            .field("pretty", &self.pretty)
            .field("remote", &self.remote.as_ref().map(|_| "<dyn RemoteParser>"))
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }

    /// Whether `sheet_name` is in the structured-report set.
    pub fn is_complex_sheet_name(&self, sheet_name: &str) -> bool {
        let lower = sheet_name.to_lowercase();
        self.complex_sheet_names
            .iter()
            .any(|name| name.to_lowercase() == lower)
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn remote_endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.remote_endpoint = Some(url.into());
        self
    }

    pub fn remote_timeout_secs(mut self, secs: u64) -> Self {
        self.config.remote_timeout_secs = secs;
        self
    }

    pub fn complex_sheet_names(mut self, names: Vec<String>) -> Self {
        self.config.complex_sheet_names = names;
        self
    }

    pub fn pretty(mut self, v: bool) -> Self {
        self.config.pretty = v;
        self
    }

    pub fn remote(mut self, remote: Arc<dyn RemoteParser>) -> Self {
        self.config.remote = Some(remote);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, ConvertError> {
        let c = &self.config;
        if c.remote_timeout_secs == 0 {
            return Err(ConvertError::InvalidConfig(
                "remote timeout must be ≥ 1 second".into(),
            ));
        }
        if let Some(ref url) = c.remote_endpoint {
            if url.trim().is_empty() {
                return Err(ConvertError::InvalidConfig(
                    "remote endpoint must not be empty".into(),
                ));
            }
        }
        Ok(self.config)
    }
}
