//! Command-line interface definitions.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Site settings (base URL, headers, limits) can also come from a YAML file
//! passed with `--config`; flags given here win over the file.

use crate::models::ExportFormat;
use clap::Parser;

/// Command-line arguments for one scrape run.
///
/// # Examples
///
/// ```sh
/// # First listing page, exported as CSV in the current directory
/// finance_index_scraper
///
/// # Ten pages to XLSX under ./exports
/// finance_index_scraper -p 10 -f xlsx -o ./exports
///
/// # Custom site settings
/// finance_index_scraper -p 3 -f json --config scraper.yaml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Number of listing pages to scrape, starting from page 1
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub pages: u32,

    /// Export format for the scraped articles
    #[arg(short, long, value_enum, ignore_case = true, default_value_t = ExportFormat::Csv)]
    pub format: ExportFormat,

    /// Directory the export file is written to
    #[arg(short, long, env = "SCRAPER_OUTPUT_DIR", default_value = ".")]
    pub output_dir: String,

    /// Optional path to a YAML settings file
    #[arg(short, long, env = "SCRAPER_CONFIG")]
    pub config: Option<String>,

    /// Override the site root the listing pages live under
    #[arg(long, env = "SCRAPER_BASE_URL")]
    pub base_url: Option<String>,

    /// Maximum simultaneous article fetches per listing page
    #[arg(long)]
    pub max_concurrency: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Skip printing the preview table
    #[arg(long)]
    pub no_preview: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["finance_index_scraper"]);

        assert_eq!(cli.pages, 1);
        assert_eq!(cli.format, ExportFormat::Csv);
        assert!(cli.config.is_none());
        assert!(!cli.no_preview);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "finance_index_scraper",
            "-p",
            "5",
            "-f",
            "XLSX",
            "-o",
            "/tmp/exports",
        ]);

        assert_eq!(cli.pages, 5);
        assert_eq!(cli.format, ExportFormat::Xlsx);
        assert_eq!(cli.output_dir, "/tmp/exports");
    }

    #[test]
    fn test_cli_rejects_zero_pages() {
        assert!(Cli::try_parse_from(["finance_index_scraper", "--pages", "0"]).is_err());
    }

    #[test]
    fn test_cli_rejects_non_numeric_pages() {
        assert!(Cli::try_parse_from(["finance_index_scraper", "--pages", "ten"]).is_err());
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["finance_index_scraper", "--format", "xml"]).is_err());
    }
}
