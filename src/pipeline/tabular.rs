//! Tabular conversion: one sheet's grid → an ordered sequence of records.
//!
//! Row 0 of the used range is the header row; every later row becomes one
//! record mapping column name → [`CellValue`]. Before records are built,
//! columns whose every data cell is empty are dropped, then rows whose every
//! cell is empty are dropped (in that order). A sheet that ends up with no
//! data rows yields an empty vec and is skipped by the orchestrator.

use crate::output::{CellValue, Record};
use calamine::{Data, DataType, Range};

/// Convert a sheet's used range into records. Returns an empty vec for a
/// sheet with no data rows after the all-null drops.
pub fn sheet_to_records(range: &Range<Data>) -> Vec<Record> {
    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Vec::new();
    };
    let headers: Vec<String> = header_row
        .iter()
        .enumerate()
        .map(|(col, cell)| header_name(cell, col))
        .collect();

    let data_rows: Vec<&[Data]> = rows.collect();
    if data_rows.is_empty() {
        return Vec::new();
    }

    // Columns first, then rows. A row carrying values only in dropped
    // columns cannot exist (such a column would not have been dropped), so
    // the row check may look at every cell.
    let keep_column: Vec<bool> = (0..headers.len())
        .map(|col| {
            data_rows
                .iter()
                .any(|row| row.get(col).is_some_and(|cell| !cell.is_empty()))
        })
        .collect();

    data_rows
        .iter()
        .filter(|row| row.iter().any(|cell| !cell.is_empty()))
        .map(|row| {
            let mut record = Record::new();
            for (col, header) in headers.iter().enumerate() {
                if !keep_column[col] {
                    continue;
                }
                let value = row.get(col).map(cell_value).unwrap_or(CellValue::Null);
                record.insert(header.clone(), value);
            }
            record
        })
        .collect()
}

/// Header cells use their display text; empty header cells get a positional
/// placeholder so the column stays addressable.
fn header_name(cell: &Data, col: usize) -> String {
    if cell.is_empty() {
        format!("Unnamed: {col}")
    } else {
        match cell {
            Data::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Map one cell into the tagged scalar carried through the converter.
pub(crate) fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(s) => CellValue::String(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::String(b.to_string()),
        Data::DateTime(_) | Data::DateTimeIso(_) => match cell.as_datetime() {
            Some(dt) => CellValue::Date(dt.date()),
            None => CellValue::String(cell.to_string()),
        },
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::String(e.to_string()),
    }
}
