//! Typed errors for crawl operations.

use thiserror::Error;

/// Errors that can occur while discovering links or fetching pages.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// The start URL could not be parsed
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Headless browser failed to launch, navigate, or evaluate
    #[error("browser error: {0}")]
    Browser(String),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Page responded with a non-success status
    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },
}
