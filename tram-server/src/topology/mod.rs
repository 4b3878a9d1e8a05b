//! Route topology: the ordered, circular sequence of stations.
//!
//! The route wraps around: traversal past the last station continues at the
//! first, and backward traversal from the first continues at the last. The
//! structure is an array plus an id index; wrap-around is modulo arithmetic.
//! Built once at startup, read-only afterwards.

use std::collections::HashMap;

use crate::domain::{Direction, DomainError, LatLon, Station, StationId};

/// Error returned when the station list cannot form a route.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("duplicate station id: {0}")]
pub struct DuplicateStationId(pub StationId);

/// The circular station sequence, ordered by ascending station id.
#[derive(Debug, Clone)]
pub struct RouteTopology {
    stations: Vec<Station>,
    index: HashMap<StationId, usize>,
}

impl RouteTopology {
    /// Build the topology from a station list.
    ///
    /// Stations are ordered by ascending id; that order defines the route
    /// sequence. Duplicate ids are rejected. An empty list builds an empty
    /// topology whose queries all degrade to empty results.
    pub fn load(mut stations: Vec<Station>) -> Result<Self, DuplicateStationId> {
        stations.sort_by_key(|s| s.id);
        let mut index = HashMap::with_capacity(stations.len());
        for (i, station) in stations.iter().enumerate() {
            if index.insert(station.id, i).is_some() {
                return Err(DuplicateStationId(station.id));
            }
        }
        Ok(Self { stations, index })
    }

    /// Number of stations on the route.
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    /// True when no stations are loaded.
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// All stations in route order.
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Look up a station by id.
    pub fn get(&self, id: StationId) -> Result<&Station, DomainError> {
        self.index
            .get(&id)
            .map(|&i| &self.stations[i])
            .ok_or(DomainError::UnknownStation(id))
    }

    /// The station `steps` hops away from `id` in the given direction,
    /// wrapping circularly.
    pub fn next(
        &self,
        id: StationId,
        steps: usize,
        direction: Direction,
    ) -> Result<&Station, DomainError> {
        let &start = self
            .index
            .get(&id)
            .ok_or(DomainError::UnknownStation(id))?;
        let len = self.stations.len() as i64;
        let target = (start as i64 + direction.step() * steps as i64).rem_euclid(len);
        Ok(&self.stations[target as usize])
    }

    /// The next `k` stations from `id` in the given direction.
    ///
    /// Always returns exactly `k` entries; when `k` meets or exceeds the
    /// route length the sequence wraps and stations repeat.
    pub fn next_k(
        &self,
        id: StationId,
        k: usize,
        direction: Direction,
    ) -> Result<Vec<&Station>, DomainError> {
        (1..=k).map(|step| self.next(id, step, direction)).collect()
    }

    /// The station nearest to `position` by great-circle distance.
    ///
    /// Ties break to the lowest station id.
    pub fn nearest_to(&self, position: LatLon) -> Result<&Station, DomainError> {
        let mut best: Option<(&Station, f64)> = None;
        for station in &self.stations {
            let d = position.distance_m(&station.position);
            if best.map_or(true, |(_, best_d)| d < best_d) {
                best = Some((station, d));
            }
        }
        best.map(|(s, _)| s).ok_or(DomainError::EmptyTopology)
    }

    /// Stations whose name contains `query`, case-insensitively, in id order.
    pub fn search(&self, query: &str) -> Vec<&Station> {
        let needle = query.to_lowercase();
        self.stations
            .iter()
            .filter(|s| s.name.to_lowercase().contains(&needle))
            .collect()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn route(n: usize) -> RouteTopology {
        let stations = (1..=n)
            .map(|i| {
                Station::new(
                    StationId(i as u32),
                    format!("Station {i}"),
                    LatLon::new(0.0, i as f64 * 0.01).unwrap(),
                )
            })
            .collect();
        RouteTopology::load(stations).unwrap()
    }

    proptest! {
        /// A full lap in either direction returns to the origin.
        #[test]
        fn full_lap_identity(n in 1usize..12, start in 1usize..12) {
            let topo = route(n);
            let id = StationId(((start - 1) % n + 1) as u32);
            prop_assert_eq!(topo.next(id, n, Direction::Forward).unwrap().id, id);
            prop_assert_eq!(topo.next(id, n, Direction::Backward).unwrap().id, id);
        }

        /// One step forward then one step backward is the identity.
        #[test]
        fn forward_backward_inverse(n in 1usize..12, start in 1usize..12) {
            let topo = route(n);
            let id = StationId(((start - 1) % n + 1) as u32);
            let fwd = topo.next(id, 1, Direction::Forward).unwrap().id;
            prop_assert_eq!(topo.next(fwd, 1, Direction::Backward).unwrap().id, id);
        }

        /// next_k always returns exactly k stations, for any k.
        #[test]
        fn next_k_length(n in 1usize..12, k in 1usize..40) {
            let topo = route(n);
            let stations = topo.next_k(StationId(1), k, Direction::Forward).unwrap();
            prop_assert_eq!(stations.len(), k);
        }

        /// Stepping k times by one matches a single k-hop step.
        #[test]
        fn steps_compose(n in 1usize..12, k in 1usize..40) {
            let topo = route(n);
            let mut id = StationId(1);
            for _ in 0..k {
                id = topo.next(id, 1, Direction::Forward).unwrap().id;
            }
            prop_assert_eq!(topo.next(StationId(1), k, Direction::Forward).unwrap().id, id);
        }
    }
}
