// Service configuration
pub mod config;

// Stops, routes and wallets
pub mod store;

// Fleet simulation and live state
pub mod fleet;

// Live-update fan-out
pub mod subscription;

// HTTP and WebSocket APIs
pub mod api;
