//! Tram identity, position reports, and travel direction.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::geo::LatLon;

/// Stable identifier of a tracked tram.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TramId(String);

impl TramId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TramId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TramId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for TramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The latest validated position report for a tram.
///
/// Exactly one of these exists per tram id at any time; each ingested report
/// overwrites the previous one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TramPosition {
    /// Reported coordinate.
    pub position: LatLon,

    /// Reported speed in meters per second. Zero when the report carried no
    /// speed; travel-time estimates substitute a fallback at the call site.
    pub speed_mps: f64,

    /// Receipt timestamp of the report.
    pub observed_at: DateTime<Utc>,
}

impl TramPosition {
    /// Validate a raw report into a position.
    ///
    /// Rejects non-finite or out-of-range coordinates and negative or
    /// non-finite speeds; a rejected report leaves any prior state untouched.
    pub fn new(
        lat: f64,
        lng: f64,
        speed: f64,
        observed_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let position =
            LatLon::new(lat, lng).map_err(|e| DomainError::MalformedObservation(e.reason()))?;
        if !speed.is_finite() || speed < 0.0 {
            return Err(DomainError::MalformedObservation(
                "speed must be a non-negative finite number",
            ));
        }
        Ok(Self {
            position,
            speed_mps: speed,
            observed_at,
        })
    }
}

/// Travel direction relative to the station ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Ascending station ids.
    #[default]
    Forward,
    /// Descending station ids.
    Backward,
}

impl Direction {
    /// Signed hop applied per step when traversing the route.
    pub fn step(self) -> i64 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}
