//! Spreadsheet decoding for the CLI, backed by calamine.

use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use tabmerge::{Workbook, WorkbookReader};

/// Reads xlsx, xlsm, xlsb, xls and ods containers.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalamineReader;

impl WorkbookReader for CalamineReader {
    fn read_workbook(&self, bytes: &[u8]) -> Result<Workbook, String> {
        let mut sheets =
            open_workbook_auto_from_rs(Cursor::new(bytes.to_vec())).map_err(|e| e.to_string())?;

        let mut workbook = Workbook::new();
        for name in sheets.sheet_names().to_owned() {
            let range = sheets
                .worksheet_range(&name)
                .map_err(|e| format!("sheet '{}': {}", name, e))?;
            let records = range
                .rows()
                .map(|row| row.iter().map(cell_text).collect())
                .collect();
            workbook = workbook.with_sheet(name, records);
        }

        Ok(workbook)
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}
