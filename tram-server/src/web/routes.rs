//! HTTP route handlers.

use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use tower_http::services::ServeDir;

use crate::domain::{Direction, DomainError, StationId, TramId, TramPosition};
use crate::proximity;

use super::dto::*;
use super::state::AppState;
use super::ws::ws_handler;

/// Default number of upcoming stations in a listing.
const DEFAULT_NEXT_STATIONS: usize = 5;

/// Upper bound on requested listing sizes.
const MAX_NEXT_STATIONS: usize = 50;

/// Create the application router.
///
/// `static_dir` is the path to the frontend assets directory.
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/gps", post(ingest_gps))
        .route("/api/stations", get(list_stations))
        .route("/api/stations/search", get(search_stations))
        .route("/api/nextStations/:station_id", get(next_stations))
        .route("/api/trams/:tram_id/nextStations", get(tram_next_stations))
        .route("/api/tramPositions", get(tram_positions))
        .route("/ws", get(ws_handler))
        .fallback_service(ServeDir::new(static_dir))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Ingest a GPS report: validate and upsert into the position table.
///
/// A malformed report is dropped with a 400; whatever was stored for the
/// tram before stays untouched.
async fn ingest_gps(
    State(state): State<AppState>,
    Json(report): Json<GpsReport>,
) -> Result<&'static str, AppError> {
    let position = TramPosition::new(
        report.lat,
        report.lng,
        report.speed.unwrap_or(0.0),
        Utc::now(),
    )
    .map_err(|e| {
        tracing::warn!(tram = %report.tram_id, error = %e, "dropping malformed observation");
        AppError::from(e)
    })?;

    let id = TramId::from(report.tram_id);
    state.positions.upsert(id.clone(), position).await;
    tracing::debug!(tram = %id, "position updated");
    Ok("ok")
}

/// All stations in route order.
async fn list_stations(State(state): State<AppState>) -> Json<Vec<StationResult>> {
    let stations = state
        .topology
        .stations()
        .iter()
        .map(StationResult::from_station)
        .collect();
    Json(stations)
}

/// Search stations by name.
async fn search_stations(
    State(state): State<AppState>,
    Query(req): Query<StationSearchRequest>,
) -> Json<StationSearchResponse> {
    let limit = req.limit.unwrap_or(10).min(50);
    let stations = state
        .topology
        .search(&req.q)
        .into_iter()
        .take(limit)
        .map(StationResult::from_station)
        .collect();
    Json(StationSearchResponse { stations })
}

/// The next stations after a given station, wrapping around the route.
async fn next_stations(
    State(state): State<AppState>,
    Path(station_id): Path<u32>,
    Query(query): Query<NextStationsQuery>,
) -> Result<Json<Vec<StationResult>>, AppError> {
    let k = query.k.unwrap_or(DEFAULT_NEXT_STATIONS).min(MAX_NEXT_STATIONS);
    let direction = query.direction.map(Direction::from).unwrap_or_default();

    let stations = state
        .topology
        .next_k(StationId(station_id), k, direction)
        .map_err(AppError::from)?;

    Ok(Json(
        stations.into_iter().map(StationResult::from_station).collect(),
    ))
}

/// Upcoming stations for a tram, with travel-time estimates.
///
/// Degrades to an empty list when the tram is unknown or no stations are
/// loaded.
async fn tram_next_stations(
    State(state): State<AppState>,
    Path(tram_id): Path<String>,
    Query(query): Query<NextStationsQuery>,
) -> Json<Vec<UpcomingStationResult>> {
    let k = query.k.unwrap_or(DEFAULT_NEXT_STATIONS).min(MAX_NEXT_STATIONS);
    let id = TramId::from(tram_id);

    let Some(report) = state.positions.get(&id).await else {
        return Json(Vec::new());
    };

    // Use the tracked assignment when the tick has seen this tram; fall back
    // to a fresh nearest-station resolution for trams reported between ticks.
    let (current, direction) = match state.tracker.current_state(&id).await {
        Some(tracked) => (tracked.current_station, tracked.direction),
        None => (
            proximity::resolve_station(&state.topology, None, report.position, &state.proximity),
            Direction::default(),
        ),
    };
    let Some(current) = current else {
        return Json(Vec::new());
    };

    let upcoming = proximity::upcoming_stations(
        &state.topology,
        current,
        direction,
        report.position,
        report.speed_mps,
        k,
        &state.proximity,
    );
    Json(
        upcoming
            .iter()
            .map(UpcomingStationResult::from_upcoming)
            .collect(),
    )
}

/// Latest positions of all live trams.
async fn tram_positions(
    State(state): State<AppState>,
) -> Json<BTreeMap<TramId, TramPositionResult>> {
    let positions = state
        .positions
        .snapshot()
        .await
        .into_iter()
        .map(|(id, report)| {
            (
                id,
                TramPositionResult {
                    lat: report.position.lat(),
                    lng: report.position.lon(),
                    speed: report.speed_mps,
                },
            )
        })
        .collect();
    Json(positions)
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::UnknownStation(_) | DomainError::UnknownTram(_) => AppError::NotFound {
                message: e.to_string(),
            },
            DomainError::MalformedObservation(_) => AppError::BadRequest {
                message: e.to_string(),
            },
            DomainError::EmptyTopology => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        tracing::warn!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_statuses() {
        let err = AppError::from(DomainError::UnknownStation(StationId(9)));
        assert!(matches!(err, AppError::NotFound { .. }));

        let err = AppError::from(DomainError::MalformedObservation("bad latitude"));
        assert!(matches!(err, AppError::BadRequest { .. }));

        let err = AppError::from(DomainError::EmptyTopology);
        assert!(matches!(err, AppError::Internal { .. }));
    }
}
