//! Stop catalog source.
//!
//! The ordered station list is loaded once at startup from a JSON file and
//! never mutated afterwards. Storage of the catalog itself (database, export
//! pipeline) is an external concern; this module only reads the handed-over
//! file.

use std::path::Path;

use serde::Deserialize;

use crate::domain::{LatLon, Station, StationId};

/// A station record as it appears in the catalog file.
#[derive(Debug, Deserialize)]
pub struct StationRecord {
    pub id: u32,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Errors from loading the stop catalog. All of these are fatal at startup:
/// the system cannot compute anything meaningful without stations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read stop catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse stop catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid station {id} in catalog: {reason}")]
    InvalidStation { id: u32, reason: &'static str },
}

/// Load the station list from a JSON catalog file.
///
/// Returns stations sorted by ascending id. An empty catalog is not an error
/// here; the caller decides whether to warn about it.
pub fn load_stations(path: &Path) -> Result<Vec<Station>, CatalogError> {
    let raw = std::fs::read_to_string(path)?;
    let records: Vec<StationRecord> = serde_json::from_str(&raw)?;
    stations_from_records(records)
}

fn stations_from_records(records: Vec<StationRecord>) -> Result<Vec<Station>, CatalogError> {
    let mut stations = Vec::with_capacity(records.len());
    for record in records {
        let position = LatLon::new(record.latitude, record.longitude).map_err(|e| {
            CatalogError::InvalidStation {
                id: record.id,
                reason: e.reason(),
            }
        })?;
        stations.push(Station::new(StationId(record.id), record.name, position));
    }
    stations.sort_by_key(|s| s.id);
    Ok(stations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_catalog(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn load_valid_catalog() {
        let file = write_catalog(
            r#"[
                {"id": 2, "name": "Skenderija", "latitude": 43.8551, "longitude": 18.4104},
                {"id": 1, "name": "Baščaršija", "latitude": 43.8597, "longitude": 18.4314}
            ]"#,
        );

        let stations = load_stations(file.path()).unwrap();
        assert_eq!(stations.len(), 2);
        // Sorted by id regardless of file order.
        assert_eq!(stations[0].id, StationId(1));
        assert_eq!(stations[0].name, "Baščaršija");
        assert_eq!(stations[1].id, StationId(2));
    }

    #[test]
    fn empty_catalog_is_not_an_error() {
        let file = write_catalog("[]");
        let stations = load_stations(file.path()).unwrap();
        assert!(stations.is_empty());
    }

    #[test]
    fn missing_file() {
        let err = load_stations(Path::new("/nonexistent/stops.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }

    #[test]
    fn malformed_json() {
        let file = write_catalog("not json");
        let err = load_stations(file.path()).unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn out_of_range_coordinate() {
        let file = write_catalog(
            r#"[{"id": 1, "name": "Nowhere", "latitude": 95.0, "longitude": 18.4}]"#,
        );
        let err = load_stations(file.path()).unwrap_err();
        match err {
            CatalogError::InvalidStation { id, .. } => assert_eq!(id, 1),
            other => panic!("expected InvalidStation, got {other:?}"),
        }
    }

    #[test]
    fn missing_field() {
        let file = write_catalog(r#"[{"id": 1, "name": "No coords"}]"#);
        assert!(matches!(
            load_stations(file.path()).unwrap_err(),
            CatalogError::Parse(_)
        ));
    }
}
