//! Excel export of the three result collections.
//!
//! Sheet layout:
//! - «Временные ряды»: one column per instrument code, then `date`.
//! - «Линейная комбинация»: `spread`, then the `date` of the raw row at the
//!   same index (blank past the end of the raw rows).
//! - «Периодограмма»: `periodogram`.

use std::path::Path;

use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};
use spectra_core::{AnalysisResults, SeriesIndex, SpectraError};

/// Sheet holding the merged raw series.
pub const RAW_SHEET: &str = "Временные ряды";
/// Sheet holding the spread.
pub const SPREAD_SHEET: &str = "Линейная комбинация";
/// Sheet holding the periodogram.
pub const PERIODOGRAM_SHEET: &str = "Периодограмма";

fn xlsx_err(e: XlsxError) -> SpectraError {
    SpectraError::Data(format!("workbook: {e}"))
}

fn row_num(i: usize) -> Result<u32, SpectraError> {
    // header occupies row 0
    u32::try_from(i + 1).map_err(|_| SpectraError::Data(format!("workbook: row {i} out of range")))
}

fn write_index(sheet: &mut Worksheet, row: u32, col: u16, idx: SeriesIndex) -> Result<(), XlsxError> {
    match idx {
        SeriesIndex::Date(_) => sheet.write_string(row, col, idx.to_string())?,
        #[allow(clippy::cast_precision_loss)]
        SeriesIndex::Index(i) => sheet.write_number(row, col, i as f64)?,
    };
    Ok(())
}

fn write_column(sheet: &mut Worksheet, header: &str, values: &[f64]) -> Result<(), SpectraError> {
    sheet.write_string(0, 0, header).map_err(xlsx_err)?;
    for (i, v) in values.iter().enumerate() {
        sheet.write_number(row_num(i)?, 0, *v).map_err(xlsx_err)?;
    }
    Ok(())
}

/// Lay the results out as a three-sheet workbook.
///
/// # Errors
/// Returns `InvalidArg` when all three collections are empty, and `Data` when
/// a cell cannot be written.
pub fn build_workbook(results: &AnalysisResults) -> Result<Workbook, SpectraError> {
    if results.is_empty() {
        return Err(SpectraError::InvalidArg("no results to export".into()));
    }
    let mut workbook = Workbook::new();

    let raw = &results.raw;
    let sheet = workbook.add_worksheet().set_name(RAW_SHEET).map_err(xlsx_err)?;
    for (col, header) in (0_u16..).zip([raw.first_code.as_str(), raw.second_code.as_str(), "date"]) {
        sheet.write_string(0, col, header).map_err(xlsx_err)?;
    }
    for (i, r) in raw.rows.iter().enumerate() {
        let row = row_num(i)?;
        sheet.write_number(row, 0, r.first).map_err(xlsx_err)?;
        sheet.write_number(row, 1, r.second).map_err(xlsx_err)?;
        write_index(sheet, row, 2, r.date).map_err(xlsx_err)?;
    }

    let sheet = workbook.add_worksheet().set_name(SPREAD_SHEET).map_err(xlsx_err)?;
    write_column(sheet, "spread", &results.spread)?;
    sheet.write_string(0, 1, "date").map_err(xlsx_err)?;
    for (i, r) in raw.rows.iter().take(results.spread.len()).enumerate() {
        write_index(sheet, row_num(i)?, 1, r.date).map_err(xlsx_err)?;
    }

    let sheet = workbook
        .add_worksheet()
        .set_name(PERIODOGRAM_SHEET)
        .map_err(xlsx_err)?;
    write_column(sheet, "periodogram", &results.periodogram)?;

    Ok(workbook)
}

/// Serialize the workbook into memory.
///
/// # Errors
/// See [`build_workbook`].
pub fn workbook_bytes(results: &AnalysisResults) -> Result<Vec<u8>, SpectraError> {
    build_workbook(results)?.save_to_buffer().map_err(xlsx_err)
}

/// Write the workbook to `path`.
///
/// # Errors
/// See [`build_workbook`]; writing the file maps to `Data` as well.
pub fn export_workbook(results: &AnalysisResults, path: &Path) -> Result<(), SpectraError> {
    build_workbook(results)?.save(path).map_err(xlsx_err)?;
    #[cfg(feature = "tracing")]
    tracing::info!(path = %path.display(), "exported workbook");
    Ok(())
}
