//! Station identity and route stop data.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::geo::LatLon;

/// Identifier of a station on the route.
///
/// Station ids are assigned by the stop catalog; ascending id order defines
/// the route sequence.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(pub u32);

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A fixed stop on the route.
///
/// Immutable once loaded from the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub id: StationId,
    pub name: String,
    pub position: LatLon,
}

impl Station {
    pub fn new(id: StationId, name: impl Into<String>, position: LatLon) -> Self {
        Self {
            id,
            name: name.into(),
            position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_display() {
        assert_eq!(StationId(7).to_string(), "7");
        assert_eq!(format!("{:?}", StationId(7)), "StationId(7)");
    }

    #[test]
    fn id_ordering_matches_numeric_order() {
        let mut ids = vec![StationId(3), StationId(1), StationId(2)];
        ids.sort();
        assert_eq!(ids, vec![StationId(1), StationId(2), StationId(3)]);
    }

    #[test]
    fn station_construction() {
        let pos = LatLon::new(43.85, 18.41).unwrap();
        let station = Station::new(StationId(1), "Baščaršija", pos);
        assert_eq!(station.id, StationId(1));
        assert_eq!(station.name, "Baščaršija");
        assert_eq!(station.position, pos);
    }
}
