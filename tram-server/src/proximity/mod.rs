//! Proximity resolver: which station is a tram at, and what comes next.
//!
//! Current-station resolution is hysteretic. A tram only advances to the
//! directional successor when it is inside the arrival radius, or when the
//! successor is both farther away than the current station and beyond the
//! radius (the tram has passed the station and is moving away). Anything else
//! leaves the current station unchanged, so GPS jitter near a station cannot
//! oscillate the assignment.

use crate::domain::{Direction, LatLon, Station, StationId};
use crate::topology::RouteTopology;

/// Tunables for proximity resolution and travel-time estimates.
#[derive(Debug, Clone)]
pub struct ProximityConfig {
    /// Distance below which a tram is considered to have reached a station.
    pub arrival_threshold_m: f64,

    /// Speed substituted when a report carries no usable speed.
    pub fallback_speed_mps: f64,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            arrival_threshold_m: 50.0,
            fallback_speed_mps: 10.0,
        }
    }
}

/// An upcoming station together with its estimated travel time.
#[derive(Debug, Clone, PartialEq)]
pub struct UpcomingStation {
    pub station: Station,
    pub eta_mins: i64,
}

/// Resolve the current station for a tram at `position`.
///
/// With no prior resolution the nearest station wins. With a prior station
/// and direction, the hysteresis rule above decides whether to advance to the
/// directional successor. Returns `None` only when the topology is empty.
pub fn resolve_station(
    topology: &RouteTopology,
    prior: Option<(StationId, Direction)>,
    position: LatLon,
    config: &ProximityConfig,
) -> Option<StationId> {
    let Some((current_id, direction)) = prior else {
        return topology.nearest_to(position).ok().map(|s| s.id);
    };

    // A prior station that is no longer on the route means the topology and
    // the tracking state have diverged; re-seed from scratch.
    let Ok(current) = topology.get(current_id) else {
        return topology.nearest_to(position).ok().map(|s| s.id);
    };
    let Ok(candidate) = topology.next(current_id, 1, direction) else {
        return Some(current_id);
    };

    let to_candidate = position.distance_m(&candidate.position);
    if to_candidate < config.arrival_threshold_m {
        return Some(candidate.id);
    }

    let to_current = position.distance_m(&current.position);
    if to_candidate > to_current && to_candidate > config.arrival_threshold_m {
        // Passed the candidate and moving away from it.
        return Some(candidate.id);
    }

    Some(current_id)
}

/// The next `k` stations ahead of `from`, each with an approximate travel
/// time from the tram's current position.
///
/// Travel time is great-circle distance divided by the reported speed, with
/// the configured fallback when the report carried no usable speed, rounded
/// to the nearest whole minute. Fails softly: an unknown station or empty
/// topology yields an empty list.
pub fn upcoming_stations(
    topology: &RouteTopology,
    from: StationId,
    direction: Direction,
    position: LatLon,
    reported_speed_mps: f64,
    k: usize,
    config: &ProximityConfig,
) -> Vec<UpcomingStation> {
    let Ok(stations) = topology.next_k(from, k, direction) else {
        return Vec::new();
    };

    let speed = effective_speed(reported_speed_mps, config);
    stations
        .into_iter()
        .map(|station| UpcomingStation {
            eta_mins: eta_mins(position.distance_m(&station.position), speed),
            station: station.clone(),
        })
        .collect()
}

fn effective_speed(reported: f64, config: &ProximityConfig) -> f64 {
    if reported.is_finite() && reported > 0.0 {
        reported
    } else {
        config.fallback_speed_mps
    }
}

fn eta_mins(distance_m: f64, speed_mps: f64) -> i64 {
    (distance_m / speed_mps / 60.0).round() as i64
}
