//! WebSocket observer channel.
//!
//! Each connection subscribes to the notification hub and receives alerts
//! broadcast from that point on. Delivery is best-effort: a connection that
//! cannot be written to is dropped, a connection that lags past the channel
//! capacity skips the alerts it missed. Reconnecting is the observer's
//! responsibility.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::notify::{NotificationMessage, StationaryAlert};

use super::state::AppState;

/// Upgrade an observer connection.
pub async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    let alerts = state.hub.subscribe();
    ws.on_upgrade(move |socket| observer_loop(socket, alerts))
}

async fn observer_loop(socket: WebSocket, mut alerts: broadcast::Receiver<StationaryAlert>) {
    debug!("observer connected");
    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            alert = alerts.recv() => match alert {
                Ok(alert) => {
                    let message = NotificationMessage::from_alert(&alert);
                    let text = match serde_json::to_string(&message) {
                        Ok(text) => text,
                        Err(e) => {
                            warn!(error = %e, "failed to encode notification");
                            continue;
                        }
                    };
                    if sink.send(Message::Text(text)).await.is_err() {
                        // Observer is gone; it can reconnect later.
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "observer lagging, alerts dropped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            inbound = stream.next() => match inbound {
                // Observers only listen; anything inbound other than a close
                // is ignored.
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }
    debug!("observer disconnected");
}
