//! Per-tram tracking state and the periodic stationarity tick.
//!
//! The tick is the single writer of tracking state. It walks a snapshot of
//! the position table in tram-id order, folds each latest observation into
//! that tram's state, advances the current-station assignment when the tram
//! moved, and collects a stationarity alert when it did not move for too
//! long. Trams whose reports have dried up past the expiry are dropped from
//! both tables.

mod stall;

pub use stall::{StallMachine, StallPhase};

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::{Direction, StationId, TramId};
use crate::notify::StationaryAlert;
use crate::proximity::{self, ProximityConfig};
use crate::store::PositionStore;
use crate::topology::RouteTopology;

/// Tunables for the stationarity check and state eviction.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// How long a coordinate must be held before a tram counts as stalled.
    pub stillness_threshold: Duration,

    /// Trams whose latest report is older than this are evicted from the
    /// position table and the tracking map.
    pub expiry: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            stillness_threshold: Duration::minutes(4),
            expiry: Duration::minutes(60),
        }
    }
}

/// Derived per-tram state.
#[derive(Debug, Clone)]
pub struct TrackingState {
    /// The station the tram is currently assigned to. `None` until the
    /// first resolution succeeds (empty topology).
    pub current_station: Option<StationId>,

    /// Travel direction relative to the station ordering.
    pub direction: Direction,

    stall: StallMachine,
}

impl TrackingState {
    pub fn is_stalled(&self) -> bool {
        self.stall.phase() == StallPhase::Stalled
    }
}

/// Owner of all per-tram tracking state.
///
/// Cheap to clone; clones share the same map.
#[derive(Clone)]
pub struct TramTracker {
    states: Arc<RwLock<HashMap<TramId, TrackingState>>>,
    config: TrackerConfig,
}

impl TramTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            states: Arc::new(RwLock::new(HashMap::new())),
            config,
        }
    }

    /// The tracking state for a tram, if it has been seen by a tick.
    pub async fn current_state(&self, id: &TramId) -> Option<TrackingState> {
        let guard = self.states.read().await;
        guard.get(id).cloned()
    }

    /// Number of trams with tracking state.
    pub async fn tracked_count(&self) -> usize {
        let guard = self.states.read().await;
        guard.len()
    }

    /// One scheduler tick.
    ///
    /// Evicts expired trams, folds the latest observations into the tracking
    /// map, and returns the stationarity alerts to broadcast, in tram-id
    /// order. Never fails; trams that cannot be resolved are carried along
    /// with an empty assignment.
    pub async fn tick(
        &self,
        now: DateTime<Utc>,
        store: &PositionStore,
        topology: &RouteTopology,
        proximity: &ProximityConfig,
    ) -> Vec<StationaryAlert> {
        let snapshot = store.snapshot().await;

        let mut live = Vec::with_capacity(snapshot.len());
        for (id, position) in snapshot {
            if now - position.observed_at >= self.config.expiry {
                debug!(tram = %id, "evicting tram with expired reports");
                store.remove(&id).await;
            } else {
                live.push((id, position));
            }
        }

        let mut states = self.states.write().await;

        // Drop state for trams that no longer have a live position.
        let live_ids: std::collections::HashSet<&TramId> = live.iter().map(|(id, _)| id).collect();
        states.retain(|id, _| live_ids.contains(id));

        let mut alerts = Vec::new();
        for (id, report) in &live {
            match states.entry(id.clone()) {
                std::collections::hash_map::Entry::Vacant(entry) => {
                    let current_station =
                        proximity::resolve_station(topology, None, report.position, proximity);
                    entry.insert(TrackingState {
                        current_station,
                        direction: Direction::default(),
                        stall: StallMachine::new(report.position, report.observed_at),
                    });
                }
                std::collections::hash_map::Entry::Occupied(mut entry) => {
                    let state = entry.get_mut();
                    if state.stall.observe(report.position, report.observed_at) {
                        let prior = state.current_station.map(|s| (s, state.direction));
                        state.current_station = proximity::resolve_station(
                            topology,
                            prior,
                            report.position,
                            proximity,
                        );
                    } else if state.stall.check(now, self.config.stillness_threshold) {
                        alerts.push(StationaryAlert::stationary(id.clone()));
                    }
                }
            }
        }

        debug!(
            trams = live.len(),
            alerts = alerts.len(),
            "stationarity tick complete"
        );
        alerts
    }
}
