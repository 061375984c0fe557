use crate::fleet::LiveFleet;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::info;

/// Drive the fleet on two independent timers until the task is aborted.
///
/// Both timers run in this one task, so a movement tick and an alert tick
/// never overlap. The first tick of each fires one full period after start.
pub async fn run_fleet_simulation<R: Rng>(
    fleet: Arc<LiveFleet<R>>,
    movement_every: Duration,
    alerts_every: Duration,
) {
    let start = Instant::now();

    let mut movement = interval_at(start + movement_every, movement_every);
    let mut alerts = interval_at(start + alerts_every, alerts_every);

    // Skip missed ticks to prevent backlog under load
    movement.set_missed_tick_behavior(MissedTickBehavior::Skip);
    alerts.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(
        movement_ms = movement_every.as_millis() as u64,
        alert_ms = alerts_every.as_millis() as u64,
        "Fleet simulation started"
    );

    loop {
        tokio::select! {
            _ = movement.tick() => {
                fleet.movement_tick();
            }
            _ = alerts.tick() => {
                fleet.alert_tick();
            }
        }
    }
}
