// HTTP and WebSocket APIs

pub mod query;
pub mod wallet;
pub mod websocket;

pub use query::{create_query_router, QueryAppState};
pub use wallet::{create_wallet_router, WalletAppState};
pub use websocket::{create_ws_router, ws_handler, WsAppState};

use crate::fleet::LiveFleet;
use crate::store::TransitStore;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Full application router: REST endpoints plus the `/ws` live channel
pub fn create_app(store: Arc<TransitStore>, fleet: Arc<LiveFleet>) -> Router {
    let query_state = Arc::new(QueryAppState {
        store: Arc::clone(&store),
    });
    let wallet_state = Arc::new(WalletAppState { store });
    let ws_state = Arc::new(WsAppState { fleet });

    Router::new()
        .merge(create_query_router(query_state))
        .merge(create_wallet_router(wallet_state))
        .merge(create_ws_router(ws_state))
        .layer(CorsLayer::permissive())
}
