//! Domain error types.
//!
//! Resolver- and detector-level failures are never fatal: callers degrade to
//! empty or unchanged results so the tick and query paths keep working for
//! other trams.

use super::station::StationId;
use super::tram::TramId;

/// Domain-level errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// The requested station id is not part of the route.
    #[error("unknown station id: {0}")]
    UnknownStation(StationId),

    /// No position has been reported for this tram.
    #[error("unknown tram: {0}")]
    UnknownTram(TramId),

    /// No stations are loaded; proximity queries have nothing to resolve
    /// against.
    #[error("no stations loaded")]
    EmptyTopology,

    /// The observation carried invalid data and was dropped.
    #[error("malformed observation: {0}")]
    MalformedObservation(&'static str),
}
