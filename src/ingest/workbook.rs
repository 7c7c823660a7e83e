//! Workbook reading through calamine

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use chrono::{Days, NaiveDate};
use std::io::Cursor;

use crate::ingest::row::{format_ledger_date, CellValue, SheetRow};
use crate::types::*;

/// Column index of the posting date (A)
const DATE_COLUMN: usize = 0;

/// Spreadsheet workbook opened from an in-memory upload
pub struct LedgerWorkbook<'a> {
    sheets: Sheets<Cursor<&'a [u8]>>,
}

impl<'a> LedgerWorkbook<'a> {
    /// Open a workbook (xlsx, xls, xlsb or ods) from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Unreadable`] when the bytes are not a readable workbook.
    pub fn open(bytes: &'a [u8]) -> LedgerResult<Self> {
        let sheets = open_workbook_auto_from_rs(Cursor::new(bytes))?;
        Ok(Self { sheets })
    }

    /// Sheet names in workbook order
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names().to_vec()
    }

    /// Rows of a sheet with blank rows dropped, in document order
    pub fn rows(&mut self, sheet_name: &str) -> LedgerResult<Vec<SheetRow>> {
        let range = self.sheets.worksheet_range(sheet_name)?;
        Ok(rows_from_range(&range))
    }

    /// Every sheet with its rows, in workbook order
    pub fn all_sheets(&mut self) -> LedgerResult<Vec<(String, Vec<SheetRow>)>> {
        self.sheet_names()
            .into_iter()
            .map(|name| {
                let rows = self.rows(&name)?;
                Ok((name, rows))
            })
            .collect()
    }
}

/// Convert a cell range into positional rows.
///
/// Column letters are absolute: a range starting at column C still maps its
/// first cell to `C`. Rows without any content are skipped entirely.
pub fn rows_from_range(range: &Range<Data>) -> Vec<SheetRow> {
    let (_, start_col) = range.start().unwrap_or((0, 0));
    let mut rows = Vec::new();

    for cells in range.rows() {
        let mut row = SheetRow::default();
        let mut has_content = false;

        for (offset, cell) in cells.iter().enumerate() {
            let column = start_col as usize + offset;
            if let Some(value) = cell_value(cell, column) {
                has_content = true;
                row.set_column(column, value);
            }
        }

        if has_content {
            rows.push(row);
        }
    }

    rows
}

fn cell_value(cell: &Data, column: usize) -> Option<CellValue> {
    match cell {
        Data::Empty => None,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
            if s.is_empty() {
                None
            } else {
                Some(CellValue::Text(s.clone()))
            }
        }
        Data::Float(n) => Some(CellValue::Number(*n)),
        Data::Int(n) => Some(CellValue::Number(*n as f64)),
        Data::Bool(b) => Some(CellValue::Text(if *b { "TRUE" } else { "FALSE" }.to_string())),
        Data::Error(e) => Some(CellValue::Text(format!("#{:?}", e))),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            if column == DATE_COLUMN {
                // Date-typed posting cells are read like their dd.mm.yyyy text form.
                match excel_serial_to_date(serial) {
                    Some(date) => Some(CellValue::Text(format_ledger_date(date))),
                    None => Some(CellValue::Number(serial)),
                }
            } else {
                Some(CellValue::Number(serial))
            }
        }
    }
}

/// Excel 1900 date system; serials before March 1900 are not corrected for the leap-year bug.
fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(serial.floor() as u64))
}
