//! Data models for scraped articles and the result of a scrape run.
//!
//! This module defines the core data structures used throughout the application:
//! - [`ArticleSummary`]: Metadata pulled from one entry on a listing page
//! - [`ArticleRecord`]: A fully-populated article (summary plus body text)
//! - [`RunReport`]: Ordered records and notifications produced by one run
//! - [`Notification`]: User-facing events returned as data instead of printed
//! - [`ExportFormat`]: The tabular formats a run can be exported to

use crate::fetch::FetchError;
use chrono::{DateTime, Local};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Title used when an entry has no title link.
pub const NO_TITLE: &str = "No Title";
/// URL used when an entry has no title link.
pub const NO_URL: &str = "#";
/// Date used when an entry has no date span.
pub const NO_DATE: &str = "No Date";
/// Content used when the article body holds no paragraphs.
pub const NO_CONTENT: &str = "No content available.";
/// Content used when the article page could not be fetched.
pub const CONTENT_FETCH_ERROR: &str = "Error fetching content.";

/// One article entry as found on a listing page, before its body is fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleSummary {
    pub title: String,
    pub url: String,
    /// Taken verbatim from the page; never parsed.
    pub date: String,
}

/// A scraped news item.
///
/// Every field always holds either real data or one of the sentinel
/// constants defined in this module. Field order is also the column order
/// of every export format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub title: String,
    pub url: String,
    pub date: String,
    pub content: String,
}

impl ArticleRecord {
    /// Attach resolved body text to a listing summary.
    pub fn from_summary(summary: ArticleSummary, content: String) -> Self {
        Self {
            title: summary.title,
            url: summary.url,
            date: summary.date,
            content,
        }
    }
}

/// Export targets for a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Xlsx,
    Json,
}

impl ExportFormat {
    /// File extension, also used in the artifact name.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Json => "json",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Json => "application/json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.extension().to_uppercase())
    }
}

/// A user-facing event raised during a run.
///
/// The pipeline never prints these itself; they are collected in order and
/// handed back so the front end decides how to show them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A listing or article fetch failed and was replaced by a sentinel.
    FetchFailed(FetchError),
    /// Emitted after every `progress_every`-th page.
    Progress { page: u32 },
    /// The run produced at least one record.
    Completed { pages: u32, records: usize },
    /// The run produced no records; no file is written.
    NoData { pages: u32 },
}

impl Notification {
    pub fn is_error(&self) -> bool {
        matches!(self, Notification::FetchFailed(_) | Notification::NoData { .. })
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::FetchFailed(e) => write!(f, "{e}"),
            Notification::Progress { page } => write!(f, "Completed page {page}"),
            Notification::Completed { pages, records } => {
                write!(f, "Scraping completed: {records} articles from {pages} page(s)")
            }
            Notification::NoData { pages } => {
                write!(f, "No data scraped from {pages} page(s)")
            }
        }
    }
}

/// Everything one scrape run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Run start time; stamps the export filename.
    pub started_at: DateTime<Local>,
    pub pages: u32,
    /// Page order, then discovery order within each page.
    pub records: Vec<ArticleRecord>,
    pub notifications: Vec<Notification>,
}

impl RunReport {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records paired with their 1-based row index.
    pub fn rows(&self) -> impl Iterator<Item = (usize, &ArticleRecord)> {
        self.records.iter().enumerate().map(|(i, r)| (i + 1, r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str) -> ArticleRecord {
        ArticleRecord {
            title: title.to_string(),
            url: "https://example.com/a".to_string(),
            date: "1 Jan 2024".to_string(),
            content: "Body.".to_string(),
        }
    }

    #[test]
    fn test_record_from_summary() {
        let summary = ArticleSummary {
            title: "A".to_string(),
            url: "http://x".to_string(),
            date: NO_DATE.to_string(),
        };
        let record = ArticleRecord::from_summary(summary, CONTENT_FETCH_ERROR.to_string());
        assert_eq!(record.title, "A");
        assert_eq!(record.url, "http://x");
        assert_eq!(record.date, "No Date");
        assert_eq!(record.content, "Error fetching content.");
    }

    #[test]
    fn test_record_serializes_in_column_order() {
        let json = serde_json::to_string(&record("A")).unwrap();
        let title = json.find("\"title\"").unwrap();
        let url = json.find("\"url\"").unwrap();
        let date = json.find("\"date\"").unwrap();
        let content = json.find("\"content\"").unwrap();
        assert!(title < url && url < date && date < content);
    }

    #[test]
    fn test_rows_are_one_based() {
        let report = RunReport {
            started_at: Local::now(),
            pages: 1,
            records: vec![record("A"), record("B")],
            notifications: vec![],
        };
        let rows: Vec<_> = report.rows().map(|(i, r)| (i, r.title.as_str())).collect();
        assert_eq!(rows, vec![(1, "A"), (2, "B")]);
    }

    #[test]
    fn test_export_format_naming() {
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::Xlsx.to_string(), "XLSX");
        assert_eq!(ExportFormat::Json.mime_type(), "application/json");
    }

    #[test]
    fn test_notification_severity() {
        assert!(Notification::NoData { pages: 1 }.is_error());
        assert!(!Notification::Progress { page: 20 }.is_error());
        assert_eq!(
            Notification::Completed { pages: 2, records: 6 }.to_string(),
            "Scraping completed: 6 articles from 2 page(s)"
        );
    }
}
