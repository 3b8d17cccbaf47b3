//! Terminal preview of a run.

use crate::models::RunReport;
use crate::utils::truncate_cell;
use std::fmt::Write;

const TITLE_WIDTH: usize = 48;
const DATE_WIDTH: usize = 30;
const URL_WIDTH: usize = 64;

/// Render the first `max_rows` records as a fixed-width table with their
/// 1-based row index. Remaining rows are summarized in a trailing line.
pub fn render_preview(report: &RunReport, max_rows: usize) -> String {
    let mut out = String::new();
    writeln!(
        out,
        "{:>5}  {:<TITLE_WIDTH$}  {:<DATE_WIDTH$}  {}",
        "#", "title", "date", "url"
    )
    .unwrap();
    writeln!(out, "{}", "-".repeat(5 + TITLE_WIDTH + DATE_WIDTH + URL_WIDTH + 6)).unwrap();

    for (index, record) in report.rows().take(max_rows) {
        writeln!(
            out,
            "{:>5}  {:<TITLE_WIDTH$}  {:<DATE_WIDTH$}  {}",
            index,
            truncate_cell(&record.title, TITLE_WIDTH),
            truncate_cell(&record.date, DATE_WIDTH),
            truncate_cell(&record.url, URL_WIDTH),
        )
        .unwrap();
    }

    let hidden = report.records.len().saturating_sub(max_rows);
    if hidden > 0 {
        writeln!(out, "… {hidden} more rows").unwrap();
    }
    out
}
