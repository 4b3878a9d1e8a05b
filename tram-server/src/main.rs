use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use tram_server::catalog;
use tram_server::notify::NotificationHub;
use tram_server::proximity::ProximityConfig;
use tram_server::store::PositionStore;
use tram_server::topology::RouteTopology;
use tram_server::tracking::{TrackerConfig, TramTracker};
use tram_server::web::{AppState, create_router};

/// How often the stationarity check runs.
const TICK_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tram_server=info,tower_http=warn")),
        )
        .init();

    let stops_path =
        std::env::var("TRAM_STOPS_FILE").unwrap_or_else(|_| "stops.json".to_string());
    let static_dir = std::env::var("TRAM_STATIC_DIR").unwrap_or_else(|_| "frontend".to_string());
    let bind_addr =
        std::env::var("TRAM_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());

    // The stop catalog is the one startup input we cannot run without.
    let stations =
        catalog::load_stations(Path::new(&stops_path)).expect("Failed to load stop catalog");
    let topology = RouteTopology::load(stations).expect("Failed to build route topology");
    if topology.is_empty() {
        tracing::warn!(path = %stops_path, "stop catalog is empty; proximity queries will return empty results");
    } else {
        tracing::info!(stations = topology.len(), "route topology loaded");
    }

    let state = AppState::new(
        topology,
        PositionStore::new(),
        TramTracker::new(TrackerConfig::default()),
        NotificationHub::default(),
        ProximityConfig::default(),
    );

    // Periodic stationarity tick, independent of request handling.
    {
        let state = state.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK_INTERVAL);
            interval.tick().await; // First tick is immediate, skip it
            loop {
                interval.tick().await;
                let alerts = state
                    .tracker
                    .tick(
                        chrono::Utc::now(),
                        &state.positions,
                        &state.topology,
                        &state.proximity,
                    )
                    .await;
                for alert in alerts {
                    tracing::info!(tram = %alert.tram, "tram flagged stationary");
                    state.hub.broadcast(alert);
                }
            }
        });
    }

    let app = create_router(state, &static_dir);

    let addr: SocketAddr = bind_addr.parse().expect("Invalid TRAM_BIND_ADDR");
    tracing::info!(%addr, "tram tracker listening");
    tracing::info!(
        "endpoints: POST /api/gps, GET /api/stations, GET /api/nextStations/:id, \
         GET /api/trams/:id/nextStations, GET /api/tramPositions, GET /ws"
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app).await.expect("Server error");
}
