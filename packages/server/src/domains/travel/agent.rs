//! Conversational travel assistant wiring.

use std::sync::Arc;

use anyhow::{Context, Result};
use llm_client::LlmClient;
use tracing::info;

use crate::domains::memory::PreferenceStore;
use super::tools::{FindFlightsTool, RetrievePreferencesTool, SavePreferenceTool};

/// Fixed instruction script for the travel assistant.
pub const TRAVEL_AGENT_INSTRUCTIONS: &str = "\
You are a friendly and efficient Travel Assistant. Your goal is to make booking travel as easy as possible by remembering user preferences.

Flight Search Workflow:
1. Always use `retrieve_user_preferences` with category 'travel_preferences' to recall memory.
2. Then call `find_flights` with destination and date only — it will look up memory internally.
3. You only return flights that match the user's preferred airline.
4. You always mention the user's preferred seat type, if available.
5. If no preferences exist, guide the user to save them using `save_user_preference`.";

/// Tool-augmented chat agent over preference memory and the flight search.
///
/// Stateless between turns: each call builds a fresh tool set scoped to the
/// given user id, so concurrent multi-user operation is safe.
pub struct TravelAgent {
    llm: Arc<LlmClient>,
    model: String,
    prefs: PreferenceStore,
}

impl TravelAgent {
    pub fn new(llm: Arc<LlmClient>, model: String, prefs: PreferenceStore) -> Self {
        Self { llm, model, prefs }
    }

    /// Run one conversational turn for `user_id`.
    pub async fn chat(&self, user_id: &str, message: &str) -> Result<String> {
        let response = self
            .llm
            .agent(&self.model)
            .instructions(TRAVEL_AGENT_INSTRUCTIONS)
            .tool(SavePreferenceTool::new(self.prefs.clone(), user_id))
            .tool(RetrievePreferencesTool::new(self.prefs.clone(), user_id))
            .tool(FindFlightsTool::new(self.prefs.clone(), user_id))
            .build()
            .chat(message)
            .await
            .context("Travel agent turn failed")?;

        info!(
            user_id = %user_id,
            rounds = response.rounds,
            tools_used = ?response.tools_used,
            "Travel agent turn complete"
        );

        Ok(response.content)
    }
}
