//! Workbook decoding: pick the engine from the key suffix and open the bytes.
//!
//! The two container formats need different decoders — `.xls` is the legacy
//! OLE binary format, `.xlsx` is zip-packed XML — and the key suffix is the
//! contract for which one applies. A key with neither suffix is rejected
//! before any bytes are inspected.

use crate::error::ConvertError;
use calamine::{Data, Range, Reader, Sheets, Xls, Xlsx};
use std::io::Cursor;
use tracing::debug;

/// Source file kind, derived from the key suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Legacy binary workbook (`.xls`).
    Xls,
    /// Office Open XML workbook (`.xlsx`).
    Xlsx,
}

impl FileKind {
    /// Detect the kind from a blob key, `None` for non-spreadsheet keys.
    pub fn from_key(key: &str) -> Option<Self> {
        if key.ends_with(".xlsx") {
            Some(FileKind::Xlsx)
        } else if key.ends_with(".xls") {
            Some(FileKind::Xls)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Xls => "xls",
            FileKind::Xlsx => "xlsx",
        }
    }
}

/// A decoded workbook, engine-erased.
pub struct Workbook {
    sheets: Sheets<Cursor<Vec<u8>>>,
}

impl std::fmt::Debug for Workbook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workbook")
            .field("sheets", &self.sheets.sheet_names())
            .finish()
    }
}

impl Workbook {
    /// Sheet names in workbook order.
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names().to_vec()
    }

    /// The used cell range of one sheet.
    pub fn worksheet_range(&mut self, name: &str) -> Result<Range<Data>, calamine::Error> {
        self.sheets.worksheet_range(name)
    }
}

/// Decode workbook bytes with the engine matching `kind`.
pub fn decode(bytes: Vec<u8>, kind: FileKind, key: &str) -> Result<Workbook, ConvertError> {
    let cursor = Cursor::new(bytes);
    let sheets = match kind {
        FileKind::Xls => Sheets::Xls(Xls::new(cursor).map_err(|e| ConvertError::Format {
            key: key.to_string(),
            detail: format!("failed to read legacy .xls workbook: {e}"),
        })?),
        FileKind::Xlsx => Sheets::Xlsx(Xlsx::new(cursor).map_err(|e| ConvertError::Format {
            key: key.to_string(),
            detail: format!("invalid .xlsx workbook: {e}"),
        })?),
    };

    let workbook = Workbook { sheets };
    debug!(
        "Decoded '{}' as {} with {} sheets",
        key,
        kind.as_str(),
        workbook.sheet_names().len()
    );
    Ok(workbook)
}
