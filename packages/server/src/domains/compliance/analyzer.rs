//! Scrape a site, score it against the EU AI Act, persist the report.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use crawler::ScrapePipeline;
use llm_client::{ChatRequest, LlmClient, Message};
use serde_json::Value;
use tracing::{info, warn};

use crate::domains::memory::{url_entity, PreferenceStore};
use super::prompt::EU_AI_ACT_PROMPT;

/// Temperature for the assessment call; bounded low so the report shape
/// stays close to the prompt contract.
const ANALYSIS_TEMPERATURE: f32 = 0.4;

/// Runs the scrape-and-score flow for one site.
pub struct ComplianceAnalyzer {
    pipeline: Arc<ScrapePipeline>,
    llm: Arc<LlmClient>,
    model: String,
    memory: PreferenceStore,
}

impl ComplianceAnalyzer {
    pub fn new(
        pipeline: Arc<ScrapePipeline>,
        llm: Arc<LlmClient>,
        model: String,
        memory: PreferenceStore,
    ) -> Self {
        Self {
            pipeline,
            llm,
            model,
            memory,
        }
    }

    /// Scrape `base_url`, send the aggregated page text to the LLM, and
    /// return its report as parsed JSON, verbatim and unvalidated.
    ///
    /// The report is also appended to the `"report"` category under
    /// `url::<base_url>`; a persistence failure is logged but does not fail
    /// the analysis.
    pub async fn analyze(&self, base_url: &str) -> Result<Value> {
        let pages = self.pipeline.scrape(base_url).await?;
        let scraped_json =
            serde_json::to_string(&pages).context("Failed to serialize scraped pages")?;

        info!(
            base_url = %base_url,
            pages = pages.len(),
            input_bytes = scraped_json.len(),
            "Requesting compliance assessment"
        );

        let request = ChatRequest::new(&self.model)
            .message(Message::system(EU_AI_ACT_PROMPT))
            .message(Message::user(format!("Input JSON: {scraped_json}")))
            .temperature(ANALYSIS_TEMPERATURE);

        let response = self.llm.chat_completion(request).await?;
        let report = parse_llm_json(&response.content)?;

        if let Err(e) = self
            .memory
            .add(&url_entity(base_url), "report", report.clone())
            .await
        {
            warn!(base_url = %base_url, error = %e, "Failed to persist compliance report");
        }

        Ok(report)
    }
}

/// Best-effort JSON extraction from an LLM response.
///
/// Tries a direct parse first, then the greedy span from the first `{` to
/// the last `}`. This is a heuristic, not a parser: a stray brace in
/// surrounding prose can still defeat it.
pub fn parse_llm_json(text: &str) -> Result<Value> {
    let trimmed = text.trim();

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Ok(value);
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            if let Ok(value) = serde_json::from_str::<Value>(&trimmed[start..=end]) {
                return Ok(value);
            }
        }
    }

    bail!("LLM did not return valid JSON.")
}
