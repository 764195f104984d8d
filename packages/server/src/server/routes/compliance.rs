//! `POST /analyze_compliance` — scrape a site and score it with the LLM.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use super::ApiError;
use crate::domains::compliance::ComplianceAnalyzer;
use crate::domains::memory::PreferenceStore;
use crate::server::app::AppState;

#[derive(Debug, Deserialize)]
pub struct ComplianceRequest {
    pub url: String,
}

pub async fn analyze_compliance_handler(
    State(state): State<AppState>,
    Json(request): Json<ComplianceRequest>,
) -> Result<Json<Value>, ApiError> {
    let deps = &state.deps;
    let analyzer = ComplianceAnalyzer::new(
        deps.pipeline.clone(),
        deps.llm.clone(),
        deps.llm_model.clone(),
        PreferenceStore::new(deps.store.clone()),
    );

    let report = analyzer.analyze(&request.url).await?;
    Ok(Json(report))
}
