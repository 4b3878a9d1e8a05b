//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Direction, Station};
use crate::proximity::UpcomingStation;

/// An inbound GPS report.
#[derive(Debug, Deserialize)]
pub struct GpsReport {
    #[serde(rename = "tramId")]
    pub tram_id: String,

    pub lat: f64,

    pub lng: f64,

    /// Speed in meters per second; omitted when the receiver has no fix.
    #[serde(default)]
    pub speed: Option<f64>,
}

/// A station in API responses.
#[derive(Debug, Serialize)]
pub struct StationResult {
    pub id: u32,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl StationResult {
    pub fn from_station(station: &Station) -> Self {
        Self {
            id: station.id.0,
            name: station.name.clone(),
            latitude: station.position.lat(),
            longitude: station.position.lon(),
        }
    }
}

/// An upcoming station with its travel-time estimate.
#[derive(Debug, Serialize)]
pub struct UpcomingStationResult {
    pub id: u32,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,

    /// Approximate travel time in whole minutes.
    pub eta_mins: i64,
}

impl UpcomingStationResult {
    pub fn from_upcoming(upcoming: &UpcomingStation) -> Self {
        Self {
            id: upcoming.station.id.0,
            name: upcoming.station.name.clone(),
            latitude: upcoming.station.position.lat(),
            longitude: upcoming.station.position.lon(),
            eta_mins: upcoming.eta_mins,
        }
    }
}

/// A tram's latest position in the positions map.
#[derive(Debug, Serialize)]
pub struct TramPositionResult {
    pub lat: f64,
    pub lng: f64,
    pub speed: f64,
}

/// Request to search stations by name.
#[derive(Debug, Deserialize)]
pub struct StationSearchRequest {
    /// Name fragment to match.
    pub q: String,

    /// Maximum number of results (default 10, capped at 50).
    pub limit: Option<usize>,
}

/// Response for station search.
#[derive(Debug, Serialize)]
pub struct StationSearchResponse {
    pub stations: Vec<StationResult>,
}

/// Query parameters for next-station listings.
#[derive(Debug, Deserialize)]
pub struct NextStationsQuery {
    /// Number of stations to return (default 5).
    pub k: Option<usize>,

    /// Traversal direction (default forward).
    pub direction: Option<DirectionParam>,
}

/// Wire form of a travel direction.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectionParam {
    Forward,
    Backward,
}

impl From<DirectionParam> for Direction {
    fn from(param: DirectionParam) -> Self {
        match param {
            DirectionParam::Forward => Direction::Forward,
            DirectionParam::Backward => Direction::Backward,
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
