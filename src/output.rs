//! Output types: tagged cell values, per-sheet records, and the final
//! conversion result.
//!
//! Cell values are carried through the pipeline as a small tagged variant
//! rather than pre-rendered strings, so the JSON layer is the single place
//! where the rendering rule lives: dates become `YYYY-MM-DD` strings, nulls
//! become JSON `null`, and everything else becomes its string representation.
//!
//! [`Record`] and [`ConversionResult`] keep insertion order — records mirror
//! the sheet's column order and the result mirrors workbook sheet order — so
//! both serialize through hand-written `Serialize` impls over ordered pairs
//! instead of a sorted map type.

use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// A single cell value after tabular conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Text, booleans, error cells — anything carried as its display form.
    String(String),
    /// Numeric cells (integers arrive as integral floats).
    Number(f64),
    /// Date or datetime cells, truncated to the calendar date.
    Date(NaiveDate),
    /// A missing cell that survived the all-null row/column drops.
    Null,
}

impl CellValue {
    /// Whether this value is the null/missing marker.
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Rendered form placed into the output JSON; `None` maps to JSON null.
    pub fn render(&self) -> Option<String> {
        match self {
            CellValue::String(s) => Some(s.clone()),
            CellValue::Number(n) => Some(render_number(*n)),
            CellValue::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
            CellValue::Null => None,
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.render() {
            Some(s) => serializer.serialize_str(&s),
            None => serializer.serialize_none(),
        }
    }
}

/// Integral floats render without a fractional part so a spreadsheet `42`
/// does not come out as `"42.0"`.
fn render_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9.007_199_254_740_992e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// One row of a converted sheet: column name → value, in column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, CellValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column's value. A repeated column name overwrites the earlier
    /// entry in place (last occurrence wins, position unchanged).
    pub fn insert(&mut self, column: impl Into<String>, value: CellValue) {
        let column = column.into();
        match self.fields.iter_mut().find(|(name, _)| *name == column) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Column/value pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// The full converted workbook: sheet name → records, in workbook order.
///
/// Sheet names are unique within one workbook, so `insert` replaces any
/// earlier entry with the same name rather than duplicating the key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionResult {
    sheets: Vec<(String, Vec<Record>)>,
}

impl ConversionResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, sheet: impl Into<String>, records: Vec<Record>) {
        let sheet = sheet.into();
        match self.sheets.iter_mut().find(|(name, _)| *name == sheet) {
            Some((_, existing)) => *existing = records,
            None => self.sheets.push((sheet, records)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Sheet names in workbook order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn records(&self, sheet: &str) -> Option<&[Record]> {
        self.sheets
            .iter()
            .find(|(name, _)| name == sheet)
            .map(|(_, records)| records.as_slice())
    }

    /// Serialize to the destination JSON document.
    ///
    /// `pretty` uses 4-space indentation, matching the layout consumers of
    /// the destination blobs already parse.
    pub fn to_json_bytes(&self, pretty: bool) -> Result<Vec<u8>, serde_json::Error> {
        if pretty {
            let mut buf = Vec::new();
            let fmt = serde_json::ser::PrettyFormatter::with_indent(b"    ");
            let mut ser = serde_json::Serializer::with_formatter(&mut buf, fmt);
            self.serialize(&mut ser)?;
            Ok(buf)
        } else {
            serde_json::to_vec(self)
        }
    }
}

impl Serialize for ConversionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sheets.len()))?;
        for (name, records) in &self.sheets {
            map.serialize_entry(name, records)?;
        }
        map.end()
    }
}

/// How the pipeline produced its result.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConversionOutcome {
    /// Parsed locally; the JSON document was uploaded to `destination`.
    Local { destination: String },
    /// The remote parser handled the file; its payload is the final result
    /// and is returned as-is (the remote service persists its own output).
    Remote { payload: serde_json::Value },
}

/// Statistics for one conversion run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Sheets present in the workbook.
    pub total_sheets: usize,
    /// Sheets that produced records in the output.
    pub converted_sheets: usize,
    /// Sheets skipped because they were empty after the all-null drops.
    pub skipped_sheets: usize,
    /// True when remote delegation was attempted and failed, so the local
    /// path produced the result.
    pub remote_fallback: bool,
    /// Wall-clock duration of the whole invocation.
    pub total_duration_ms: u64,
}

/// Result of a successful conversion.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionOutput {
    pub outcome: ConversionOutcome,
    pub stats: ConversionStats,
}
