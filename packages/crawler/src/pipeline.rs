//! The scrape pipeline: discover links, filter, fetch.

use std::sync::Arc;

use tracing::info;
use url::Url;

use crate::browser::PageCrawler;
use crate::error::CrawlError;
use crate::fetcher::ContentFetcher;
use crate::links::filter_links;
use crate::ScrapedPage;

/// Composes link discovery, link filtering, and content fetching into a
/// single "scrape this site" operation.
pub struct ScrapePipeline {
    crawler: Arc<dyn PageCrawler>,
    fetcher: ContentFetcher,
}

impl ScrapePipeline {
    pub fn new(crawler: Arc<dyn PageCrawler>, fetcher: ContentFetcher) -> Self {
        Self { crawler, fetcher }
    }

    /// Scrape every internal page linked from `base_url`.
    ///
    /// The base page is crawled once for its anchors; the filtered internal
    /// links are then fetched with per-URL failure isolation.
    pub async fn scrape(&self, base_url: &str) -> Result<Vec<ScrapedPage>, CrawlError> {
        let base = Url::parse(base_url).map_err(|source| CrawlError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;

        let hrefs = self.crawler.collect_hrefs(base_url).await?;
        let internal_links = filter_links(&base, &hrefs);

        info!(
            base_url = %base_url,
            hrefs_found = hrefs.len(),
            internal_links = internal_links.len(),
            "Discovered internal links"
        );

        let pages = self.fetcher.fetch_pages(&internal_links).await;

        info!(
            base_url = %base_url,
            pages_scraped = pages.len(),
            "Scrape completed"
        );

        Ok(pages)
    }
}
