use crate::fleet::LiveFleet;
use crate::subscription::ConnectionManager;
use axum::{
    extract::{
        ws::{WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
    routing::get,
    Router,
};
use std::sync::Arc;
use tracing::{error, info};

/// Shared application state for WebSocket handler
#[derive(Clone)]
pub struct WsAppState {
    pub fleet: Arc<LiveFleet>,
}

/// GET /ws - WebSocket upgrade handler for live fleet updates
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<WsAppState>>) -> Response {
    info!("WebSocket upgrade request received");
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Create WebSocket router
pub fn create_ws_router(state: Arc<WsAppState>) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .with_state(state)
}

/// Handle WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<WsAppState>) {
    // Snapshot and registration happen together; INIT is queued first
    let subscription = match state.fleet.subscribe() {
        Ok(subscription) => subscription,
        Err(e) => {
            error!(error = %e, "Failed to build initial snapshot, closing connection");
            return;
        }
    };
    let subscriber_id = subscription.id;

    ConnectionManager::new(subscriber_id)
        .handle(socket, subscription.receiver)
        .await;

    state.fleet.unsubscribe(&subscriber_id);
}
