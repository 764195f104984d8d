//! Server dependencies (traits for testability)
//!
//! Central dependency container passed to handlers. External collaborators
//! sit behind traits (document store, page crawler, page loader) so tests
//! can substitute fakes without a database, browser, or network.

use std::sync::Arc;

use crawler::ScrapePipeline;
use llm_client::LlmClient;

use crate::domains::memory::DocumentStore;

/// Dependencies shared by all request handlers.
#[derive(Clone)]
pub struct ServerDeps {
    /// Document store backing preference memory and persisted reports.
    pub store: Arc<dyn DocumentStore>,
    /// Client for the hosted LLM (any OpenAI-compatible endpoint).
    pub llm: Arc<LlmClient>,
    /// Model identifier passed on every LLM call.
    pub llm_model: String,
    /// Site scrape pipeline (browser crawl, link filter, content fetch).
    pub pipeline: Arc<ScrapePipeline>,
}

impl ServerDeps {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        llm: Arc<LlmClient>,
        llm_model: String,
        pipeline: Arc<ScrapePipeline>,
    ) -> Self {
        Self {
            store,
            llm,
            llm_model,
            pipeline,
        }
    }
}
