//! Utility functions for text cleanup, timestamps, and file system checks.
//!
//! This module provides helper functions used throughout the application:
//! - Whitespace normalization for text pulled out of HTML
//! - Run timestamps for export filenames
//! - String truncation for logging and the preview table
//! - File system validation for the output directory

use chrono::{DateTime, Local};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument, warn};

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Collapse every whitespace run to a single space and trim both ends.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_text("  Harga\n   emas  naik "), "Harga emas naik");
/// ```
pub fn normalize_text(s: &str) -> String {
    WHITESPACE.replace_all(s.trim(), " ").into_owned()
}

/// Format a run start time as `YYYYMMDD_HHMMSS`.
pub fn run_timestamp(at: &DateTime<Local>) -> String {
    at.format("%Y%m%d_%H%M%S").to_string()
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and a count of
/// the dropped bytes appended. Cuts always land on a character boundary.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// Truncate to at most `max` characters, marking the cut with `…`.
pub fn truncate_cell(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}…")
}

/// Ensure a directory exists and is writable.
///
/// This function creates the directory if it doesn't exist, then performs
/// a write test by creating and immediately deleting a scratch file.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let check_path = format!("{}/..__write_check__", path.trim_end_matches('/'));
    stdfs::File::create(&check_path)?;
    if let Err(e) = stdfs::remove_file(&check_path) {
        warn!(path = %check_path, error = %e, "Failed to remove write-check file");
    }
    info!("Output directory is writable");
    Ok(())
}
