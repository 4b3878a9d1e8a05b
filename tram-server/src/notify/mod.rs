//! Alert events and best-effort fan-out to connected observers.
//!
//! Delivery semantics: observers that are subscribed when an alert is
//! broadcast receive it; everyone else misses it. There is no queueing for
//! absent observers, no replay for new ones, and an observer that falls
//! behind the channel capacity simply skips the alerts it lagged past.

use serde::Serialize;
use tokio::sync::broadcast;

use crate::domain::TramId;

/// Default broadcast channel capacity. An observer more than this many
/// alerts behind starts losing the oldest ones.
pub const DEFAULT_CAPACITY: usize = 64;

/// An alert that a tram has stopped reporting movement.
///
/// Ephemeral: produced by the stationarity check, consumed by the fan-out,
/// never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct StationaryAlert {
    pub tram: TramId,
    pub message: String,
    pub highlight: bool,
}

impl StationaryAlert {
    /// The alert emitted while a tram holds the same coordinate past the
    /// stillness threshold.
    pub fn stationary(tram: TramId) -> Self {
        let message =
            format!("Tram {tram} has been stationary for a while. Accident occurred probably.");
        Self {
            tram,
            message,
            highlight: true,
        }
    }
}

/// Wire format for alerts pushed over the observer channel.
#[derive(Debug, Serialize)]
pub struct NotificationMessage {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(rename = "tramId")]
    pub tram_id: String,
    pub message: String,
    pub highlight: bool,
}

impl NotificationMessage {
    pub fn from_alert(alert: &StationaryAlert) -> Self {
        Self {
            kind: "notification",
            tram_id: alert.tram.to_string(),
            message: alert.message.clone(),
            highlight: alert.highlight,
        }
    }
}

/// Broadcast hub for alert delivery.
///
/// Cheap to clone; clones share the same channel.
#[derive(Clone)]
pub struct NotificationHub {
    tx: broadcast::Sender<StationaryAlert>,
}

impl NotificationHub {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Open an observer subscription. The receiver sees alerts broadcast
    /// from this point on; nothing is replayed.
    pub fn subscribe(&self) -> broadcast::Receiver<StationaryAlert> {
        self.tx.subscribe()
    }

    /// Deliver an alert to every current observer, best-effort.
    ///
    /// Returns the number of observers the alert was handed to. Zero
    /// observers is not an error.
    pub fn broadcast(&self, alert: StationaryAlert) -> usize {
        match self.tx.send(alert) {
            Ok(n) => n,
            Err(_) => 0,
        }
    }

    /// Number of currently-subscribed observers.
    pub fn observer_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
