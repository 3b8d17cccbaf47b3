//! # Finance Index Scraper
//!
//! Scrapes the paginated news index of a single news site, fetches every
//! listed article's body text, and exports the whole run as one CSV, XLSX,
//! or JSON file.
//!
//! ## Usage
//!
//! ```sh
//! finance_index_scraper --pages 5 --format xlsx --output-dir ./exports
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Listing**: Fetch index pages `1..=N` one after another
//! 2. **Indexing**: Pull title, link, and date from every article entry
//! 3. **Resolving**: Fetch article pages concurrently (bounded per page)
//! 4. **Output**: Print a preview table and write the export file

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod fetch;
mod models;
mod outputs;
mod run;
mod scrapers;
mod utils;

use cli::Cli;
use config::ScraperSettings;
use fetch::HttpFetcher;
use outputs::preview::render_preview;
use utils::ensure_writable_dir;

/// Rows shown in the terminal preview.
const PREVIEW_ROWS: usize = 20;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("finance_index_scraper starting up");

    let args = Cli::parse();
    debug!(pages = args.pages, format = %args.format, output_dir = %args.output_dir, "Parsed CLI arguments");

    let settings = ScraperSettings::resolve(&args)?;
    info!(
        listing = %settings.listing_root()?,
        max_concurrency = settings.max_concurrency,
        timeout_secs = settings.timeout_secs,
        "Resolved scraper settings"
    );

    // Early check: fail before scraping if the export cannot be written
    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let fetcher = HttpFetcher::new(settings.header_map()?, settings.timeout())?;
    let report = run::run_scrape(&fetcher, &settings, args.pages).await?;

    for notification in &report.notifications {
        if notification.is_error() {
            eprintln!("✗ {notification}");
        } else {
            println!("✓ {notification}");
        }
    }

    if !report.is_empty() && !args.no_preview {
        print!("{}", render_preview(&report, PREVIEW_ROWS));
    }

    match outputs::write_artifact(&report, args.format, &settings.topic, &args.output_dir).await {
        Ok(Some(artifact)) => {
            println!(
                "Saved {} ({}, {} bytes)",
                artifact.path.display(),
                artifact.mime_type,
                artifact.bytes
            );
        }
        Ok(None) => warn!("No records scraped; no file written"),
        Err(e) => {
            error!(error = %e, "Failed to write export");
            return Err(e.into());
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        records = report.records.len(),
        "Execution complete"
    );

    Ok(())
}
