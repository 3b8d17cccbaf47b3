//! News source scrapers.
//!
//! Each scraper follows the same three-step pattern for one listing page:
//!
//! 1. **Fetching**: Download the listing page through a [`PageFetcher`]
//! 2. **Indexing**: Pull title, link, and date out of every article entry
//! 3. **Resolving**: Fetch each article page concurrently (bounded) and pull
//!    out its body text
//!
//! Missing elements never fail a scrape. Each extracted field has a fixed
//! sentinel that is substituted instead, so every record is fully populated.
//!
//! # Supported Sources
//!
//! | Source | Module | Listing URL |
//! |--------|--------|-------------|
//! | detikFinance | [`detik`] | `https://finance.detik.com/indeks?page=N` |
//!
//! [`PageFetcher`]: crate::fetch::PageFetcher

pub mod detik;
