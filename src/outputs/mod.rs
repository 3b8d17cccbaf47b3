//! Export of a finished run to a single file.
//!
//! # Submodules
//!
//! - [`csv`]: Comma-separated rows with a header line
//! - [`xlsx`]: One worksheet with a bold header row
//! - [`json`]: An array of row objects (`records` orientation)
//! - [`preview`]: A fixed-width table of the first rows for the terminal
//!
//! None of the formats carry the row index; it exists only in the preview.
//!
//! # Output Name
//!
//! ```text
//! {YYYYMMDD_HHMMSS}_{topic}_{pages}.{ext}    e.g. 20240105_090307_finance_3.csv
//! ```
//!
//! The timestamp is the run's start time.

pub mod csv;
pub mod json;
pub mod preview;
pub mod xlsx;

use crate::models::{ArticleRecord, ExportFormat, RunReport};
use crate::utils::run_timestamp;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{info, instrument};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV export failed: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("XLSX export failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// A file written for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub bytes: usize,
    pub mime_type: &'static str,
}

pub fn file_name(
    started_at: &DateTime<Local>,
    topic: &str,
    pages: u32,
    format: ExportFormat,
) -> String {
    format!(
        "{}_{}_{}.{}",
        run_timestamp(started_at),
        topic,
        pages,
        format.extension()
    )
}

/// Serialize `records` in the requested format.
pub fn render(records: &[ArticleRecord], format: ExportFormat) -> Result<Vec<u8>, ExportError> {
    match format {
        ExportFormat::Csv => csv::to_csv(records),
        ExportFormat::Xlsx => xlsx::to_xlsx(records),
        ExportFormat::Json => json::to_json(records),
    }
}

/// Write the run's records to `output_dir`.
///
/// Returns `Ok(None)` without touching the file system when the run has no
/// records.
#[instrument(level = "info", skip(report), fields(records = report.records.len()))]
pub async fn write_artifact(
    report: &RunReport,
    format: ExportFormat,
    topic: &str,
    output_dir: &str,
) -> Result<Option<Artifact>, ExportError> {
    if report.is_empty() {
        info!("Nothing to export");
        return Ok(None);
    }

    let bytes = render(&report.records, format)?;
    let path = Path::new(output_dir).join(file_name(&report.started_at, topic, report.pages, format));
    fs::write(&path, &bytes)
        .await
        .map_err(|source| ExportError::Io {
            path: path.display().to_string(),
            source,
        })?;

    info!(path = %path.display(), bytes = bytes.len(), mime = format.mime_type(), "Wrote export");
    Ok(Some(Artifact {
        path,
        bytes: bytes.len(),
        mime_type: format.mime_type(),
    }))
}
