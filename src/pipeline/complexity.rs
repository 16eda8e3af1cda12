//! Complexity detection: does this workbook need the remote layout parser?
//!
//! Merged cells and template-driven report layouts show up as ragged grids
//! with holes when read naively, which the local tabular converter cannot
//! reconstruct. The heuristic therefore flags a workbook as complex when any
//! sheet's raw grid has missing cells, or when a sheet carries one of the
//! structured-report names. The missing-cell rule deliberately conflates
//! merged cells with ordinary sparse data; sparse-but-simple sheets classify
//! as complex and take the remote-then-fallback path.

use crate::config::ConversionConfig;
use crate::error::ConvertError;
use crate::pipeline::decode::Workbook;
use calamine::{Data, DataType, Range};
use tracing::info;

/// Decide whether the workbook requires remote processing.
///
/// Evaluation stops at the first sheet that triggers either condition; since
/// any single match flags the whole file, this is equivalent to checking
/// every sheet.
pub fn needs_remote_parsing(
    workbook: &mut Workbook,
    config: &ConversionConfig,
) -> Result<bool, ConvertError> {
    for name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| ConvertError::SheetFailed {
                sheet: name.clone(),
                detail: e.to_string(),
            })?;

        if has_missing_cells(&range) {
            info!("Complexity detected in sheet '{name}': merged or empty cells");
            return Ok(true);
        }
        if config.is_complex_sheet_name(&name) {
            info!("Complexity detected in sheet '{name}': structured report name");
            return Ok(true);
        }
    }
    Ok(false)
}

/// A sheet has missing cells when its used range contains an empty cell, or
/// when the range is not anchored at A1 (leading empty rows or columns in
/// the raw grid). A fully empty sheet has no grid to be ragged and does not
/// count.
fn has_missing_cells(range: &Range<Data>) -> bool {
    match range.start() {
        None => false,
        Some((row, col)) => {
            row > 0 || col > 0 || range.cells().any(|(_, _, cell)| cell.is_empty())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::decode::{decode, FileKind};

    fn range_2x2_dense() -> Range<Data> {
        let mut r = Range::new((0, 0), (1, 1));
        r.set_value((0, 0), Data::String("A".into()));
        r.set_value((0, 1), Data::String("B".into()));
        r.set_value((1, 0), Data::Float(1.0));
        r.set_value((1, 1), Data::Float(2.0));
        r
    }

    #[test]
    fn dense_grid_has_no_missing_cells() {
        assert!(!has_missing_cells(&range_2x2_dense()));
    }

    #[test]
    fn hole_in_grid_counts_as_missing() {
        let mut r = range_2x2_dense();
        r.set_value((1, 1), Data::Empty);
        assert!(has_missing_cells(&r));
    }

    #[test]
    fn grid_not_anchored_at_a1_counts_as_missing() {
        let mut r = Range::new((1, 0), (1, 1));
        r.set_value((1, 0), Data::String("A".into()));
        r.set_value((1, 1), Data::String("B".into()));
        assert!(has_missing_cells(&r));
    }

    #[test]
    fn empty_sheet_is_not_missing() {
        let r: Range<Data> = Range::empty();
        assert!(!has_missing_cells(&r));
    }

    #[test]
    fn report_sheet_name_flags_complex_regardless_of_content() {
        let mut wb = rust_xlsxwriter::Workbook::new();
        let sheet = wb.add_worksheet();
        sheet.set_name("Report").unwrap();
        sheet.write(0, 0, "Title").unwrap();
        sheet.write(1, 0, "Doc1").unwrap();
        let bytes = wb.save_to_buffer().unwrap();

        let mut workbook = decode(bytes, FileKind::Xlsx, "r.xlsx").unwrap();
        let config = ConversionConfig::default();
        assert!(needs_remote_parsing(&mut workbook, &config).unwrap());
    }

    #[test]
    fn dense_plain_workbook_is_simple() {
        let mut wb = rust_xlsxwriter::Workbook::new();
        let sheet = wb.add_worksheet();
        sheet.set_name("Inventory").unwrap();
        sheet.write(0, 0, "Title").unwrap();
        sheet.write(0, 1, "Count").unwrap();
        sheet.write(1, 0, "Doc1").unwrap();
        sheet.write(1, 1, 3).unwrap();
        let bytes = wb.save_to_buffer().unwrap();

        let mut workbook = decode(bytes, FileKind::Xlsx, "i.xlsx").unwrap();
        let config = ConversionConfig::default();
        assert!(!needs_remote_parsing(&mut workbook, &config).unwrap());
    }
}
