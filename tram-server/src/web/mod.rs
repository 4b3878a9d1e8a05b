//! Web layer: HTTP API and the WebSocket observer channel.

mod dto;
mod routes;
mod state;
mod ws;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
