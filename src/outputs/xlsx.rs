//! XLSX export.

use super::ExportError;
use crate::models::ArticleRecord;
use crate::utils::truncate_cell;
use rust_xlsxwriter::{Format, Workbook};

const HEADERS: [&str; 4] = ["title", "url", "date", "content"];

/// Excel refuses longer strings in a single cell.
const MAX_CELL_CHARS: usize = 32_767;

/// One worksheet (`Sheet1`) with a bold header row and one row per record.
pub fn to_xlsx(records: &[ArticleRecord]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let sheet = workbook.add_worksheet();

    for (col, name) in HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *name, &header)?;
    }
    for (i, record) in records.iter().enumerate() {
        let row = i as u32 + 1;
        let cells = [&record.title, &record.url, &record.date, &record.content];
        for (col, value) in cells.into_iter().enumerate() {
            sheet.write_string(row, col as u16, truncate_cell(value, MAX_CELL_CHARS))?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}
