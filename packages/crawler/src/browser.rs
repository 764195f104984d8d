//! Headless-browser link discovery.

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use tracing::{debug, warn};

use crate::error::CrawlError;

const COLLECT_HREFS_JS: &str =
    "Array.from(document.querySelectorAll('a')).map(a => a.href)";

/// Collects the raw anchor hrefs from one rendered page.
#[async_trait]
pub trait PageCrawler: Send + Sync {
    /// Navigate to `url` in a rendered context and return every anchor href
    /// on the page. A navigation failure is a single error for that URL.
    async fn collect_hrefs(&self, url: &str) -> Result<Vec<String>, CrawlError>;
}

/// Chromium-backed [`PageCrawler`].
///
/// Launches a transient headless browser per call and tears it down whether
/// or not navigation succeeded, so a failed crawl never leaks a browser
/// process.
pub struct BrowserCrawler;

impl BrowserCrawler {
    pub fn new() -> Self {
        Self
    }

    async fn collect_in_browser(browser: &Browser, url: &str) -> Result<Vec<String>, CrawlError> {
        let page = browser
            .new_page(url)
            .await
            .map_err(|e| CrawlError::Browser(format!("Failed to open page: {e}")))?;

        let _ = page.wait_for_navigation().await;

        let hrefs: Vec<String> = page
            .evaluate(COLLECT_HREFS_JS)
            .await
            .map_err(|e| CrawlError::Browser(format!("Failed to evaluate selector: {e}")))?
            .into_value()
            .map_err(|e| CrawlError::Browser(format!("Unexpected evaluation result: {e}")))?;

        debug!(url = %url, href_count = hrefs.len(), "Collected anchor hrefs");
        Ok(hrefs)
    }
}

impl Default for BrowserCrawler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageCrawler for BrowserCrawler {
    async fn collect_hrefs(&self, url: &str) -> Result<Vec<String>, CrawlError> {
        let config = BrowserConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-setuid-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu")
            .build()
            .map_err(CrawlError::Browser)?;

        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| CrawlError::Browser(format!("Browser launch failed: {e}")))?;

        let handler_task = tokio::spawn(async move { while handler.next().await.is_some() {} });

        let result = Self::collect_in_browser(&browser, url).await;

        // Teardown runs on both paths so a navigation error can't leak the
        // browser process.
        if let Err(e) = browser.close().await {
            warn!(url = %url, error = %e, "Browser close error");
        }
        let _ = browser.wait().await;
        handler_task.abort();

        result
    }
}
