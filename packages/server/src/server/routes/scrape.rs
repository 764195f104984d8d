//! `POST /scrape` — run the scrape pipeline for one site.

use anyhow::Context;
use axum::extract::State;
use axum::Json;
use crawler::ScrapedPage;
use serde::{Deserialize, Serialize};

use super::ApiError;
use crate::server::app::AppState;

fn default_output_json() -> String {
    "scraped_data.json".to_string()
}

#[derive(Debug, Deserialize)]
pub struct ScrapeRequest {
    pub url: String,
    #[serde(default)]
    pub save_to_file: bool,
    #[serde(default = "default_output_json")]
    pub output_json: String,
}

#[derive(Debug, Serialize)]
pub struct ScrapeResponse {
    pub results: Vec<ScrapedPage>,
}

pub async fn scrape_handler(
    State(state): State<AppState>,
    Json(request): Json<ScrapeRequest>,
) -> Result<Json<ScrapeResponse>, ApiError> {
    let results = state.deps.pipeline.scrape(&request.url).await?;

    if request.save_to_file {
        let payload =
            serde_json::to_string_pretty(&results).context("Failed to serialize results")?;
        tokio::fs::write(&request.output_json, payload)
            .await
            .with_context(|| format!("Failed to write {}", request.output_json))?;
    }

    Ok(Json(ScrapeResponse { results }))
}
