//! Mock flight search driven by stored travel preferences.

use anyhow::Result;
use chrono::{Duration, Local};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domains::memory::{user_entity, PreferenceStore};

/// A synthesized flight offer. Deterministic in shape, randomized in value;
/// never a real booking, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightOffer {
    pub airline: String,
    pub flight_number: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub price: String,
    pub notes: String,
}

/// Structured search outcome, serialized for the calling agent so a miss can
/// be handled conversationally instead of as an exception.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FlightSearchResult {
    Success { flights: Vec<FlightOffer> },
    Error { message: String },
}

/// Find a flight matching the user's stored travel preferences.
///
/// Preference strings containing "window", "aisle" or "middle"
/// (case-insensitive) are seat preferences; any other non-empty string is
/// treated as an airline preference, last match winning. This deliberately
/// mirrors the loose source heuristic: arbitrary strings like "no layovers"
/// will be misread as airline names.
pub async fn find_flights(
    prefs: &PreferenceStore,
    user_id: &str,
    destination: &str,
    departure_date: &str,
) -> Result<FlightSearchResult> {
    let stored = prefs
        .search_by_category(&user_entity(user_id), "travel_preferences")
        .await?;

    let mut airline_pref: Option<String> = None;
    let mut seat_pref: Option<String> = None;

    for value in &stored {
        let Some(pref) = value.as_str() else { continue };
        let lower = pref.to_lowercase();

        if lower.contains("window") || lower.contains("aisle") || lower.contains("middle") {
            seat_pref = Some(pref.to_string());
        } else if !pref.trim().is_empty() {
            airline_pref = Some(pref.to_string());
        }
    }

    let Some(airline) = airline_pref else {
        return Ok(FlightSearchResult::Error {
            message: "No airline preference found. Please add a preferred airline first."
                .to_string(),
        });
    };

    let mut rng = rand::thread_rng();
    let now = Local::now();

    let flight = FlightOffer {
        flight_number: format!(
            "{}{}",
            airline.chars().take(2).collect::<String>().to_uppercase(),
            rng.gen_range(100..=999)
        ),
        departure_time: (now + Duration::hours(rng.gen_range(2..=5)))
            .format("%H:%M")
            .to_string(),
        arrival_time: (now + Duration::hours(rng.gen_range(10..=14)))
            .format("%H:%M")
            .to_string(),
        price: format!("{} EUR", rng.gen_range(800..=1800)),
        notes: match &seat_pref {
            Some(seat) => format!("Seat preference '{seat}' is available."),
            None => "Standard seat options available.".to_string(),
        },
        airline,
    };

    info!(
        destination = %destination,
        departure_date = %departure_date,
        airline = %flight.airline,
        "Generated 1 flight offer"
    );

    Ok(FlightSearchResult::Success {
        flights: vec![flight],
    })
}
