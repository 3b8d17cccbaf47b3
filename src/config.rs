//! Scraper settings.
//!
//! Settings come from an optional YAML file and are then overridden by any
//! command-line flags. Every key is optional in the file:
//!
//! ```yaml
//! base_url: https://finance.detik.com
//! index_path: indeks
//! page_param: page
//! topic: finance
//! timeout_secs: 30
//! max_concurrency: 12
//! progress_every: 20
//! headers:
//!   User-Agent: Mozilla/5.0 ...
//! ```

use crate::cli::Cli;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://finance.detik.com";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/244.178.44.111 Safari/537.36";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },
    #[error("invalid base url '{url}': {source}")]
    BaseUrl { url: String, source: url::ParseError },
    #[error("invalid header '{name}': {reason}")]
    Header { name: String, reason: String },
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
}

/// Everything the pipeline needs to know about the target site.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScraperSettings {
    /// Site root; the listing lives at `{base_url}/{index_path}`.
    pub base_url: String,
    pub index_path: String,
    /// Query parameter carrying the page number.
    pub page_param: String,
    /// Tag embedded in the export filename.
    pub topic: String,
    /// Sent with every request. Must include a browser-like User-Agent.
    pub headers: BTreeMap<String, String>,
    pub timeout_secs: u64,
    /// Upper bound on simultaneous article fetches for one listing page.
    pub max_concurrency: usize,
    /// Emit a progress notification after every this-many pages.
    pub progress_every: u32,
}

impl Default for ScraperSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            index_path: "indeks".to_string(),
            page_param: "page".to_string(),
            topic: "finance".to_string(),
            headers: BTreeMap::from([("User-Agent".to_string(), DEFAULT_USER_AGENT.to_string())]),
            timeout_secs: 30,
            max_concurrency: 12,
            progress_every: 20,
        }
    }
}

impl ScraperSettings {
    /// Load settings from a YAML file.
    #[instrument(level = "info")]
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let shown = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: shown.clone(),
            source,
        })?;
        let settings = Self::from_yaml(&raw).map_err(|source| ConfigError::Parse {
            path: shown.clone(),
            source,
        })?;
        info!(path = %shown, "Loaded scraper settings");
        Ok(settings)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes to unit, not to an empty map.
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    /// Resolve settings for this invocation: file (if any), then CLI flags.
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let mut settings = match &cli.config {
            Some(path) => Self::from_file(Path::new(path))?,
            None => Self::default(),
        };
        if let Some(base_url) = &cli.base_url {
            settings.base_url = base_url.clone();
        }
        if let Some(n) = cli.max_concurrency {
            settings.max_concurrency = n;
        }
        if let Some(secs) = cli.timeout_secs {
            settings.timeout_secs = secs;
        }
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.listing_root()?;
        self.header_map()?;
        if self.timeout_secs == 0 {
            return Err(ConfigError::Zero { field: "timeout_secs" });
        }
        if self.max_concurrency == 0 {
            return Err(ConfigError::Zero {
                field: "max_concurrency",
            });
        }
        if self.progress_every == 0 {
            return Err(ConfigError::Zero {
                field: "progress_every",
            });
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The listing URL without a page number, e.g. `https://finance.detik.com/indeks`.
    pub fn listing_root(&self) -> Result<Url, ConfigError> {
        let raw = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.index_path.trim_start_matches('/')
        );
        Url::parse(&raw).map_err(|source| ConfigError::BaseUrl { url: raw, source })
    }

    /// URL of listing page `page`, e.g. `https://finance.detik.com/indeks?page=3`.
    pub fn page_url(&self, page: u32) -> Result<Url, ConfigError> {
        let mut url = self.listing_root()?;
        url.query_pairs_mut()
            .append_pair(&self.page_param, &page.to_string());
        Ok(url)
    }

    pub fn header_map(&self) -> Result<HeaderMap, ConfigError> {
        let mut map = HeaderMap::with_capacity(self.headers.len());
        for (name, value) in &self.headers {
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| ConfigError::Header {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
            let header_value = HeaderValue::from_str(value).map_err(|e| ConfigError::Header {
                name: name.clone(),
                reason: e.to_string(),
            })?;
            map.insert(header_name, header_value);
        }
        Ok(map)
    }
}
