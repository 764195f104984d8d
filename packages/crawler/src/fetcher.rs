//! Per-URL page text retrieval with failure isolation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::error::CrawlError;
use crate::ScrapedPage;

/// Loads the textual content of one page.
#[async_trait]
pub trait PageLoader: Send + Sync {
    async fn load(&self, url: &str) -> Result<String, CrawlError>;
}

/// HTTP page loader: fetches HTML and reduces it to readable text.
pub struct HttpLoader {
    client: reqwest::Client,
}

impl HttpLoader {
    pub fn new() -> Result<Self, CrawlError> {
        // Browser-like User-Agent to avoid trivial bot blocking
        let user_agent = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client })
    }

    async fn fetch_html(&self, url: &str) -> Result<String, CrawlError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }

    /// Reduce an HTML document to its readable text.
    ///
    /// Strips script/style/nav boilerplate, then converts the remaining
    /// markup to markdown-flavored text.
    pub(crate) fn extract_text(html: &str) -> String {
        let document = Html::parse_document(html);

        let boilerplate = [
            "script", "style", "noscript", "iframe", "nav", "header", "footer", "aside",
        ];

        let mut cleaned = html.to_string();
        for selector_str in boilerplate {
            if let Ok(selector) = Selector::parse(selector_str) {
                for element in document.select(&selector) {
                    cleaned = cleaned.replace(&element.html(), "");
                }
            }
        }

        htmd::convert(&cleaned).unwrap_or_else(|_| {
            let fallback = Html::parse_document(&cleaned);
            fallback.root_element().text().collect::<String>()
        })
    }
}

#[async_trait]
impl PageLoader for HttpLoader {
    async fn load(&self, url: &str) -> Result<String, CrawlError> {
        let html = self.fetch_html(url).await?;
        let text = Self::extract_text(&html);

        if text.trim().is_empty() {
            debug!(url = %url, "Page has no textual content");
        }

        Ok(text)
    }
}

/// Fetches a batch of URLs, isolating per-URL failures.
pub struct ContentFetcher {
    loader: Arc<dyn PageLoader>,
}

impl ContentFetcher {
    pub fn new(loader: Arc<dyn PageLoader>) -> Self {
        Self { loader }
    }

    /// Fetch every URL in order. A URL that fails to load is logged and
    /// omitted; it never aborts the rest of the batch. The output preserves
    /// the relative order of the URLs that succeeded.
    pub async fn fetch_pages(&self, urls: &[String]) -> Vec<ScrapedPage> {
        let mut pages = Vec::with_capacity(urls.len());

        for url in urls {
            match self.loader.load(url).await {
                Ok(content) => pages.push(ScrapedPage {
                    url: url.clone(),
                    content,
                }),
                Err(e) => {
                    warn!(url = %url, error = %e, "Failed to scrape page, skipping");
                }
            }
        }

        pages
    }
}
