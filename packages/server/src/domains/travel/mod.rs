//! Preference-aware travel assistant.

pub mod agent;
pub mod flights;
pub mod tools;

pub use agent::TravelAgent;
pub use flights::{find_flights, FlightOffer, FlightSearchResult};
