//! Travel assistant tools.
//!
//! These implement the `llm_client::Tool` trait so the agent can call them
//! in its tool loop. Each tool carries an explicit user id; there is no
//! process-wide "current user".

use llm_client::Tool;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::domains::memory::{user_entity, PreferenceStore};
use super::flights::{find_flights, FlightSearchResult};

/// Error type for travel tools.
#[derive(Debug, Error)]
pub enum TravelToolError {
    #[error("Memory error: {0}")]
    Memory(String),

    #[error("Flight search failed: {0}")]
    FlightSearch(String),
}

// =============================================================================
// save_user_preference
// =============================================================================

/// Arguments for saving a preference.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SavePreferenceArgs {
    /// Category to file the preference under, e.g. "travel_preferences".
    pub category: String,
    /// The preference text to remember.
    pub preference: String,
}

#[derive(Debug, Serialize)]
pub struct SavePreferenceOutput {
    pub status: String,
    pub message: String,
}

/// Tool for persisting a user preference.
pub struct SavePreferenceTool {
    prefs: PreferenceStore,
    user_id: String,
}

impl SavePreferenceTool {
    pub fn new(prefs: PreferenceStore, user_id: impl Into<String>) -> Self {
        Self {
            prefs,
            user_id: user_id.into(),
        }
    }
}

#[async_trait]
impl Tool for SavePreferenceTool {
    const NAME: &'static str = "save_user_preference";
    type Args = SavePreferenceArgs;
    type Output = SavePreferenceOutput;
    type Error = TravelToolError;

    fn description(&self) -> &str {
        "Save a user preference under a category so it can be recalled later. Use category 'travel_preferences' for airlines and seat types."
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        self.prefs
            .add(
                &user_entity(&self.user_id),
                &args.category,
                json!(args.preference),
            )
            .await
            .map_err(|e| TravelToolError::Memory(e.to_string()))?;

        Ok(SavePreferenceOutput {
            status: "success".to_string(),
            message: format!("Preference saved in category '{}'.", args.category),
        })
    }
}

// =============================================================================
// retrieve_user_preferences
// =============================================================================

/// Arguments for retrieving preferences.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct RetrievePreferencesArgs {
    /// Category to read, e.g. "travel_preferences".
    pub category: String,
}

#[derive(Debug, Serialize)]
pub struct RetrievePreferencesOutput {
    pub status: String,
    pub preferences: Vec<Value>,
    pub count: usize,
}

/// Tool for recalling stored preferences.
pub struct RetrievePreferencesTool {
    prefs: PreferenceStore,
    user_id: String,
}

impl RetrievePreferencesTool {
    pub fn new(prefs: PreferenceStore, user_id: impl Into<String>) -> Self {
        Self {
            prefs,
            user_id: user_id.into(),
        }
    }
}

#[async_trait]
impl Tool for RetrievePreferencesTool {
    const NAME: &'static str = "retrieve_user_preferences";
    type Args = RetrievePreferencesArgs;
    type Output = RetrievePreferencesOutput;
    type Error = TravelToolError;

    fn description(&self) -> &str {
        "Retrieve everything stored for the user under a category. A missing category returns an empty list."
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let preferences = self
            .prefs
            .search_by_category(&user_entity(&self.user_id), &args.category)
            .await
            .map_err(|e| TravelToolError::Memory(e.to_string()))?;

        Ok(RetrievePreferencesOutput {
            status: "success".to_string(),
            count: preferences.len(),
            preferences,
        })
    }
}

// =============================================================================
// find_flights
// =============================================================================

/// Arguments for the flight search.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct FindFlightsArgs {
    /// Destination city or airport.
    pub destination: String,
    /// Departure date, e.g. "2026-09-01".
    pub departure_date: String,
}

/// Tool that searches flights using the user's stored preferences.
pub struct FindFlightsTool {
    prefs: PreferenceStore,
    user_id: String,
}

impl FindFlightsTool {
    pub fn new(prefs: PreferenceStore, user_id: impl Into<String>) -> Self {
        Self {
            prefs,
            user_id: user_id.into(),
        }
    }
}

#[async_trait]
impl Tool for FindFlightsTool {
    const NAME: &'static str = "find_flights";
    type Args = FindFlightsArgs;
    type Output = FlightSearchResult;
    type Error = TravelToolError;

    fn description(&self) -> &str {
        "Search flights to a destination on a date. Looks up the user's stored travel preferences internally; only call it with destination and date."
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        find_flights(
            &self.prefs,
            &self.user_id,
            &args.destination,
            &args.departure_date,
        )
        .await
        .map_err(|e| TravelToolError::FlightSearch(e.to_string()))
    }
}
