use crate::fleet::simulator::FleetSimulator;
use crate::fleet::vehicle::{FleetSnapshot, ServiceAlert};
use crate::subscription::{FeedMessage, PublishReport, SubscriberId, SubscriberRegistry, Subscription};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::Rng;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info};

/// Simulator plus its subscribers.
///
/// Ticks and subscriptions take the same lock, and a tick publishes before
/// releasing it. A new subscriber therefore always sees the state after the
/// last complete tick and then every later update in order.
pub struct LiveFleet<R = StdRng> {
    simulator: Mutex<FleetSimulator<R>>,
    subscribers: SubscriberRegistry,
}

impl<R: Rng> LiveFleet<R> {
    pub fn new(simulator: FleetSimulator<R>, subscriber_buffer: usize) -> Self {
        Self {
            simulator: Mutex::new(simulator),
            subscribers: SubscriberRegistry::new(subscriber_buffer),
        }
    }

    /// Move every vehicle and broadcast the full vehicle set
    pub fn movement_tick(&self) -> PublishReport {
        self.movement_tick_at(Utc::now())
    }

    pub fn movement_tick_at(&self, now: DateTime<Utc>) -> PublishReport {
        let mut simulator = self.lock();
        let vehicles = simulator.advance_vehicles(now);
        let report = self.publish(&FeedMessage::VehicleUpdates(vehicles));
        debug!(
            delivered = report.delivered,
            dropped = report.dropped,
            closed = report.closed,
            "Vehicle updates broadcast"
        );
        report
    }

    /// Roll for an alert and broadcast it if one was raised
    pub fn alert_tick(&self) -> Option<ServiceAlert> {
        self.alert_tick_at(Utc::now())
    }

    pub fn alert_tick_at(&self, now: DateTime<Utc>) -> Option<ServiceAlert> {
        let mut simulator = self.lock();
        let alert = simulator.draw_alert(now)?;
        let report = self.publish(&FeedMessage::ServiceAlert(alert.clone()));
        info!(
            alert_id = alert.id,
            route_id = alert.route_id,
            kind = ?alert.kind,
            severity = ?alert.severity,
            delivered = report.delivered,
            "Service alert raised"
        );
        Some(alert)
    }

    /// Register a subscriber whose first queued message is the INIT snapshot
    pub fn subscribe(&self) -> serde_json::Result<Subscription> {
        let simulator = self.lock();
        let payload = FeedMessage::from(simulator.snapshot()).encode()?;
        let subscription = self.subscribers.register(payload);
        drop(simulator);

        info!(
            subscriber = %subscription.id,
            subscribers = self.subscribers.len(),
            "Subscriber registered"
        );
        Ok(subscription)
    }

    pub fn unsubscribe(&self, id: &SubscriberId) {
        if self.subscribers.unregister(id) {
            info!(subscriber = %id, "Subscriber removed");
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Current vehicles and retained alerts
    pub fn snapshot(&self) -> FleetSnapshot {
        self.lock().snapshot()
    }

    fn publish(&self, message: &FeedMessage) -> PublishReport {
        match message.encode() {
            Ok(payload) => self.subscribers.broadcast(&payload),
            Err(e) => {
                error!(error = %e, "Failed to encode live update");
                PublishReport::default()
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, FleetSimulator<R>> {
        self.simulator.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
