//! WebSocket streaming of aggregate network state.
//!
//! Each dashboard observer gets its own cooperative task: every second it
//! reads the node population, computes the aggregate (node count + mean
//! resonance), and pushes it as one JSON text frame. Ticks are independent
//! and stateless; nothing is buffered for slow observers beyond the
//! socket's own send blocking.
//!
//! Connect to `/ws/dashboard` for the live aggregate stream.

use crate::node::CoreState;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// WebSocket handler for the dashboard aggregate stream.
pub async fn ws_dashboard_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<CoreState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_dashboard_socket(socket, state))
}

/// Drive one observer connection until it disconnects or a send fails.
/// Every exit path falls through to the same return, so the socket is
/// dropped (and thus closed) exactly once.
async fn handle_dashboard_socket(mut socket: WebSocket, state: Arc<CoreState>) {
    info!("dashboard observer connected");

    let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(1));

    loop {
        tokio::select! {
            // Handle incoming frames from the observer
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        info!("dashboard observer disconnected");
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        debug!("dashboard socket error: {}", e);
                        break;
                    }
                    _ => {}
                }
            }
            // Push the aggregate on each tick
            _ = interval.tick() => {
                let aggregate = match state.engine.aggregate() {
                    Ok(aggregate) => aggregate,
                    Err(e) => {
                        warn!("aggregate read failed: {}", e);
                        break;
                    }
                };
                let json = match serde_json::to_string(&aggregate) {
                    Ok(json) => json,
                    Err(e) => {
                        warn!("aggregate serialization failed: {}", e);
                        break;
                    }
                };
                if let Err(e) = socket.send(Message::Text(json)).await {
                    debug!("dashboard send failed: {}", e);
                    break;
                }
            }
        }
    }
}
