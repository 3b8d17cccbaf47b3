//! detikFinance index scraper.
//!
//! Listing pages live at `https://finance.detik.com/indeks?page=N`. Each
//! `<article>` on a listing page is one story:
//!
//! ```html
//! <article>
//!   <h3 class="media__title"><a href="https://finance.detik.com/...">Title</a></h3>
//!   <div class="media__date"><span title="Senin, 01 Jan 2024 10:00 WIB">...</span></div>
//! </article>
//! ```
//!
//! The story body is the set of `<p>` elements under `div.detail__body-text`
//! on the article page.

use crate::fetch::{FetchError, PageFetcher};
use crate::models::{
    ArticleRecord, ArticleSummary, CONTENT_FETCH_ERROR, NO_CONTENT, NO_DATE, NO_TITLE, NO_URL,
    Notification,
};
use crate::utils::normalize_text;
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument, warn};
use url::Url;

static ARTICLE_ENTRY: Lazy<Selector> = Lazy::new(|| Selector::parse("article").unwrap());
static BODY_PARAGRAPH: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.detail__body-text p").unwrap());

/// Where a field's value is read from once its node is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    /// Whitespace-normalized text of the node.
    Text,
    /// Verbatim value of the named attribute.
    Attr(&'static str),
}

/// Extraction rule for one field of a listing entry.
///
/// A rule never fails: when the selector matches nothing, or the attribute
/// is absent, the rule's fallback is returned.
#[derive(Debug)]
pub struct FieldRule {
    pub field: &'static str,
    selector: Selector,
    pub source: FieldSource,
    pub fallback: &'static str,
}

impl FieldRule {
    fn new(
        field: &'static str,
        selector: &str,
        source: FieldSource,
        fallback: &'static str,
    ) -> Self {
        Self {
            field,
            selector: Selector::parse(selector).unwrap(),
            source,
            fallback,
        }
    }

    /// Apply the rule to one entry, returning the value or the fallback.
    pub fn extract(&self, entry: ElementRef<'_>) -> String {
        entry
            .select(&self.selector)
            .next()
            .and_then(|node| match self.source {
                FieldSource::Text => Some(normalize_text(&node.text().collect::<String>())),
                FieldSource::Attr(name) => node.value().attr(name).map(str::to_string),
            })
            .unwrap_or_else(|| {
                debug!(field = self.field, fallback = self.fallback, "Field missing");
                self.fallback.to_string()
            })
    }
}

/// The rules applied to every listing entry.
#[derive(Debug)]
pub struct ListingRules {
    pub title: FieldRule,
    pub url: FieldRule,
    pub date: FieldRule,
}

impl ListingRules {
    #[cfg(test)]
    pub fn all(&self) -> [&FieldRule; 3] {
        [&self.title, &self.url, &self.date]
    }
}

pub static LISTING_RULES: Lazy<ListingRules> = Lazy::new(|| ListingRules {
    title: FieldRule::new("title", "h3.media__title a", FieldSource::Text, NO_TITLE),
    url: FieldRule::new("url", "h3.media__title a", FieldSource::Attr("href"), NO_URL),
    date: FieldRule::new("date", ".media__date span", FieldSource::Attr("title"), NO_DATE),
});

/// Pull every article entry out of a listing page, in document order.
///
/// Links are resolved against `page_url`, so relative hrefs come back
/// absolute. The `#` sentinel is left as is.
pub fn extract_listing(html: &str, page_url: &Url) -> Vec<ArticleSummary> {
    let document = Html::parse_document(html);
    let rules = &*LISTING_RULES;

    document
        .select(&ARTICLE_ENTRY)
        .map(|entry| {
            let href = rules.url.extract(entry);
            let url = if href == NO_URL {
                href
            } else {
                page_url
                    .join(&href)
                    .map(String::from)
                    .unwrap_or(href)
            };
            ArticleSummary {
                title: rules.title.extract(entry),
                url,
                date: rules.date.extract(entry),
            }
        })
        .collect()
}

/// Join the body paragraphs of an article page with newlines.
///
/// Each paragraph is trimmed and any whitespace run inside it, line breaks
/// included, is collapsed to one space, so only the joins are newlines.
/// Returns [`NO_CONTENT`] when the body holds no paragraphs.
pub fn extract_content(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut paragraphs = document
        .select(&BODY_PARAGRAPH)
        .map(|p| normalize_text(&p.text().collect::<String>()))
        .peekable();

    if paragraphs.peek().is_none() {
        return NO_CONTENT.to_string();
    }
    paragraphs.join("\n")
}

/// Records and notifications from one listing page.
#[derive(Debug, Default)]
pub struct PageReport {
    /// One record per article entry, in listing order.
    pub records: Vec<ArticleRecord>,
    /// Fetch failures on this page, in listing order.
    pub notices: Vec<Notification>,
}

/// Scrape one listing page and resolve every article's body.
///
/// A failed listing fetch yields no records plus a `FetchFailed` notice.
/// Article fetches run concurrently, at most `max_concurrency` at a time;
/// a failed one only turns its own record's content into
/// [`CONTENT_FETCH_ERROR`]. The call returns once every fetch has settled.
#[instrument(level = "info", skip(fetcher), fields(url = %page_url))]
pub async fn process_page<F: PageFetcher>(
    fetcher: &F,
    page_url: &Url,
    max_concurrency: usize,
) -> PageReport {
    let html = match fetcher.fetch(page_url.as_str()).await {
        Ok(html) => html,
        Err(e) => {
            warn!(error = %e, "Listing fetch failed; page contributes no articles");
            return PageReport {
                records: Vec::new(),
                notices: vec![Notification::FetchFailed(e)],
            };
        }
    };

    let summaries = extract_listing(&html, page_url);
    info!(count = summaries.len(), "Indexed article entries");

    let resolved: Vec<(ArticleRecord, Option<FetchError>)> = stream::iter(summaries)
        .map(move |summary| resolve_article(fetcher, summary))
        .buffered(max_concurrency.max(1))
        .collect()
        .await;

    let mut report = PageReport::default();
    for (record, failure) in resolved {
        if let Some(e) = failure {
            report.notices.push(Notification::FetchFailed(e));
        }
        report.records.push(record);
    }
    info!(
        records = report.records.len(),
        failed = report.notices.len(),
        "Resolved article contents"
    );
    report
}

async fn resolve_article<F: PageFetcher>(
    fetcher: &F,
    summary: ArticleSummary,
) -> (ArticleRecord, Option<FetchError>) {
    let fetched = if summary.url == NO_URL {
        Err(FetchError::InvalidUrl {
            url: summary.url.clone(),
        })
    } else {
        fetcher.fetch(&summary.url).await
    };

    match fetched {
        Ok(html) => {
            let content = extract_content(&html);
            debug!(url = %summary.url, bytes = content.len(), "Parsed article body");
            (ArticleRecord::from_summary(summary, content), None)
        }
        Err(e) => {
            warn!(url = %summary.url, error = %e, "Article fetch failed");
            (
                ArticleRecord::from_summary(summary, CONTENT_FETCH_ERROR.to_string()),
                Some(e),
            )
        }
    }
}
