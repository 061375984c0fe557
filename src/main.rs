use anyhow::{Context, Result};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tracing::info;
use transit::api::create_app;
use transit::config::load_from_env;
use transit::fleet::{run_fleet_simulation, FleetSimulator, LiveFleet};
use transit::store::TransitStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "transit=info".into()),
        )
        .init();

    info!("Transit starting...");

    let config = load_from_env().context("Failed to load configuration")?;

    // Entity store with the sample network
    let store = Arc::new(
        TransitStore::with_sample_data()
            .context("Failed to load sample transit data")?
            .with_starting_balance(config.wallet.starting_balance),
    );

    // One simulated vehicle per seeded route
    let rng = match config.simulation.seed {
        Some(seed) => {
            info!(seed = seed, "Using fixed simulation seed");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };
    let simulator = FleetSimulator::new(&store.route_ids(), &config.simulation, rng, Utc::now());
    let fleet = Arc::new(LiveFleet::new(simulator, config.broadcast.subscriber_buffer));

    let simulation_handle = tokio::spawn(run_fleet_simulation(
        Arc::clone(&fleet),
        config.simulation.movement_interval(),
        config.simulation.alert_interval(),
    ));

    // Start HTTP/WebSocket server
    let router = create_app(store, fleet);
    let address = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!(address = %address, "Transit API listening");

    let server_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            tracing::error!(error = %e, "Transit API server error");
        }
    });

    // Wait for shutdown signal
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl_c signal")?;
    info!("Shutdown signal received");

    server_handle.abort();
    simulation_handle.abort();
    info!("Transit stopped");

    Ok(())
}
