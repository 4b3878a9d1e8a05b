//! Application state for the web layer.

use std::sync::Arc;

use crate::notify::NotificationHub;
use crate::proximity::ProximityConfig;
use crate::store::PositionStore;
use crate::topology::RouteTopology;
use crate::tracking::TramTracker;

/// Shared application state.
///
/// Contains everything the handlers and the scheduler tick need.
#[derive(Clone)]
pub struct AppState {
    /// The circular station sequence, read-only after startup.
    pub topology: Arc<RouteTopology>,

    /// Latest-known-position table.
    pub positions: PositionStore,

    /// Per-tram tracking state and stationarity detection.
    pub tracker: TramTracker,

    /// Alert fan-out to connected observers.
    pub hub: NotificationHub,

    /// Proximity and travel-time tunables.
    pub proximity: Arc<ProximityConfig>,
}

impl AppState {
    pub fn new(
        topology: RouteTopology,
        positions: PositionStore,
        tracker: TramTracker,
        hub: NotificationHub,
        proximity: ProximityConfig,
    ) -> Self {
        Self {
            topology: Arc::new(topology),
            positions,
            tracker,
            hub,
            proximity: Arc::new(proximity),
        }
    }
}
