//! Multi-page scrape runs.
//!
//! A run walks listing pages `1..=pages` one after another. Each page is
//! fully resolved, including all of its article fetches, before the next
//! page is requested. Records are appended in page order, then listing
//! order, and every notification raised along the way is kept in the
//! returned [`RunReport`].

use crate::config::{ConfigError, ScraperSettings};
use crate::fetch::PageFetcher;
use crate::models::{Notification, RunReport};
use crate::scrapers::detik;
use chrono::Local;
use tracing::{error, info, instrument};

/// Scrape `pages` listing pages and collect every article.
///
/// Failed fetches never abort the run; they show up as sentinels in the
/// records and as `FetchFailed` entries in the notifications. The last
/// notification is always `Completed` or `NoData`.
///
/// # Errors
///
/// Only a listing URL that cannot be built from `settings` is an error.
#[instrument(level = "info", skip(fetcher, settings))]
pub async fn run_scrape<F: PageFetcher>(
    fetcher: &F,
    settings: &ScraperSettings,
    pages: u32,
) -> Result<RunReport, ConfigError> {
    let mut report = RunReport {
        started_at: Local::now(),
        pages,
        records: Vec::new(),
        notifications: Vec::new(),
    };

    for page in 1..=pages {
        let url = settings.page_url(page)?;
        let page_report = detik::process_page(fetcher, &url, settings.max_concurrency).await;
        info!(
            page,
            records = page_report.records.len(),
            total = report.records.len() + page_report.records.len(),
            "Page complete"
        );
        report.records.extend(page_report.records);
        report.notifications.extend(page_report.notices);

        if settings.progress_every > 0 && page % settings.progress_every == 0 {
            info!(page, "Progress checkpoint");
            report.notifications.push(Notification::Progress { page });
        }
    }

    let outcome = if report.is_empty() {
        error!(pages, "No data scraped");
        Notification::NoData { pages }
    } else {
        info!(pages, records = report.records.len(), "Scraping completed");
        Notification::Completed {
            pages,
            records: report.records.len(),
        }
    };
    report.notifications.push(outcome);
    Ok(report)
}
