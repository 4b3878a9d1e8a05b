//! Stationarity state machine for a single tram.

use chrono::{DateTime, Duration, Utc};

use crate::domain::LatLon;

/// Where the machine currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StallPhase {
    /// The tram has moved recently (or was just first seen).
    Tracking,
    /// The recorded coordinate has been held past the stillness threshold.
    Stalled,
}

/// Tracks the last recorded coordinate and how long it has been held.
///
/// Stillness is exact coordinate equality, deliberately not a distance
/// threshold: a receiver that re-reports the identical sample is standing
/// still, while one that jitters at full float precision never trips this.
/// The 50 m arrival radius of the proximity resolver plays no part here.
#[derive(Debug, Clone)]
pub struct StallMachine {
    position: LatLon,
    since: DateTime<Utc>,
    phase: StallPhase,
}

impl StallMachine {
    /// Start tracking from a first observation.
    pub fn new(position: LatLon, observed_at: DateTime<Utc>) -> Self {
        Self {
            position,
            since: observed_at,
            phase: StallPhase::Tracking,
        }
    }

    /// The coordinate the stillness window is measured against.
    pub fn position(&self) -> LatLon {
        self.position
    }

    pub fn phase(&self) -> StallPhase {
        self.phase
    }

    /// Fold in the latest observation.
    ///
    /// Returns `true` when the coordinate changed: the recorded position and
    /// timestamp are replaced and the machine drops back to `Tracking`. An
    /// identical coordinate leaves the recorded timestamp alone, so the
    /// stillness window keeps growing.
    pub fn observe(&mut self, position: LatLon, observed_at: DateTime<Utc>) -> bool {
        if position == self.position {
            return false;
        }
        self.position = position;
        self.since = observed_at;
        self.phase = StallPhase::Tracking;
        true
    }

    /// Scheduler-tick check: has the recorded coordinate been held for the
    /// threshold?
    ///
    /// Transitions to `Stalled` and returns `true` when it has; the caller
    /// emits one alert per tick for which this returns `true`.
    pub fn check(&mut self, now: DateTime<Utc>, threshold: Duration) -> bool {
        if now - self.since >= threshold {
            self.phase = StallPhase::Stalled;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    fn coord(lat: f64, lon: f64) -> LatLon {
        LatLon::new(lat, lon).unwrap()
    }

    fn threshold() -> Duration {
        Duration::minutes(4)
    }

    #[test]
    fn starts_tracking() {
        let machine = StallMachine::new(coord(43.85, 18.41), at(0));
        assert_eq!(machine.phase(), StallPhase::Tracking);
    }

    #[test]
    fn movement_resets_the_window() {
        let mut machine = StallMachine::new(coord(43.85, 18.41), at(0));
        assert!(machine.observe(coord(43.86, 18.41), at(200)));
        // Window now measured from the move, not from the start.
        assert!(!machine.check(at(300), threshold()));
        assert!(machine.check(at(200 + 240), threshold()));
    }

    #[test]
    fn identical_coordinate_does_not_refresh_the_window() {
        let mut machine = StallMachine::new(coord(43.85, 18.41), at(0));
        assert!(!machine.observe(coord(43.85, 18.41), at(120)));
        // Still measured from t=0.
        assert!(machine.check(at(240), threshold()));
        assert_eq!(machine.phase(), StallPhase::Stalled);
    }

    #[test]
    fn threshold_boundary_is_inclusive() {
        let mut machine = StallMachine::new(coord(43.85, 18.41), at(0));
        assert!(!machine.check(at(239), threshold()));
        assert!(machine.check(at(240), threshold()));
    }

    #[test]
    fn stalled_repeats_every_check_until_movement() {
        let mut machine = StallMachine::new(coord(43.85, 18.41), at(0));
        assert!(machine.check(at(240), threshold()));
        assert!(machine.check(at(300), threshold()));
        assert!(machine.check(at(360), threshold()));

        assert!(machine.observe(coord(43.86, 18.41), at(370)));
        assert_eq!(machine.phase(), StallPhase::Tracking);
        assert!(!machine.check(at(420), threshold()));
    }

    #[test]
    fn tiny_coordinate_changes_count_as_movement() {
        let mut machine = StallMachine::new(coord(43.85, 18.41), at(0));
        // Far below any distance threshold, but not bit-identical.
        assert!(machine.observe(coord(43.85, 18.41000000001), at(100)));
        assert!(!machine.check(at(240), threshold()));
    }
}
