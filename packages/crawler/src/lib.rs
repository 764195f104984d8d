//! Same-domain site scraping.
//!
//! A site scrape is three steps behind one call:
//! 1. Render the base page in a headless browser and collect anchor hrefs
//!    ([`browser::BrowserCrawler`]).
//! 2. Keep the deduplicated same-host, non-social links ([`links::filter_links`]).
//! 3. Fetch each link's text over HTTP, skipping pages that fail
//!    ([`fetcher::ContentFetcher`]).
//!
//! [`pipeline::ScrapePipeline`] wires the steps together; the browser and
//! loader sit behind traits so callers can substitute fakes.

pub mod browser;
pub mod error;
pub mod fetcher;
pub mod links;
pub mod pipeline;

pub use browser::{BrowserCrawler, PageCrawler};
pub use error::CrawlError;
pub use fetcher::{ContentFetcher, HttpLoader, PageLoader};
pub use links::filter_links;
pub use pipeline::ScrapePipeline;

use serde::{Deserialize, Serialize};

/// One successfully fetched page. Ephemeral: lives only for the duration of
/// a pipeline invocation unless the caller persists it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScrapedPage {
    pub url: String,
    pub content: String,
}
