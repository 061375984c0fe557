use crate::config::SimulationConfig;
use crate::fleet::vehicle::{
    AlertSeverity, AlertType, FleetSnapshot, ServiceAlert, Vehicle, ALERT_MESSAGES,
};
use chrono::{DateTime, Utc};
use rand::Rng;
use std::collections::BTreeMap;

const HEADING_RANGE: std::ops::Range<f64> = 0.0..360.0;
const SPEED_RANGE: std::ops::Range<f64> = 20.0..30.0;

/// Random-walk fleet simulation.
///
/// Owns one vehicle per route and the retained alert table. All randomness
/// comes from the injected generator, so a seeded `R` reproduces every
/// position and alert exactly.
pub struct FleetSimulator<R> {
    /// route id -> vehicle, iterated in route order
    vehicles: BTreeMap<u32, Vehicle>,
    alerts: Vec<ServiceAlert>,
    route_ids: Vec<u32>,
    next_alert_id: u64,
    max_step: f64,
    alert_probability: f64,
    rng: R,
}

impl<R: Rng> FleetSimulator<R> {
    /// Place one vehicle per route id around the configured center
    pub fn new(route_ids: &[u32], config: &SimulationConfig, mut rng: R, now: DateTime<Utc>) -> Self {
        let half_spread = config.initial_spread.abs() / 2.0;

        let mut vehicles = BTreeMap::new();
        for &route_id in route_ids {
            vehicles.entry(route_id).or_insert_with(|| Vehicle {
                route_id,
                latitude: config.center_latitude + jitter(&mut rng, half_spread),
                longitude: config.center_longitude + jitter(&mut rng, half_spread),
                heading: rng.gen_range(HEADING_RANGE),
                speed: rng.gen_range(SPEED_RANGE),
                last_update: now,
            });
        }

        Self {
            route_ids: vehicles.keys().copied().collect(),
            vehicles,
            alerts: Vec::new(),
            next_alert_id: 1,
            max_step: config.max_step.abs(),
            alert_probability: config.alert_probability,
            rng,
        }
    }

    /// Nudge every vehicle and redraw its heading and speed.
    ///
    /// Returns the full vehicle set after the move.
    pub fn advance_vehicles(&mut self, now: DateTime<Utc>) -> Vec<Vehicle> {
        for vehicle in self.vehicles.values_mut() {
            vehicle.latitude += jitter(&mut self.rng, self.max_step);
            vehicle.longitude += jitter(&mut self.rng, self.max_step);
            vehicle.heading = self.rng.gen_range(HEADING_RANGE);
            vehicle.speed = self.rng.gen_range(SPEED_RANGE);
            vehicle.last_update = now;
        }
        self.vehicles()
    }

    /// Roll for a new service alert.
    ///
    /// On success the alert is retained and returned; otherwise nothing
    /// changes and `None` is returned.
    pub fn draw_alert(&mut self, now: DateTime<Utc>) -> Option<ServiceAlert> {
        if self.route_ids.is_empty() || self.rng.gen::<f64>() >= self.alert_probability {
            return None;
        }

        let route_id = self.route_ids[self.rng.gen_range(0..self.route_ids.len())];
        let kind = AlertType::ALL[self.rng.gen_range(0..AlertType::ALL.len())];
        let severity = AlertSeverity::ALL[self.rng.gen_range(0..AlertSeverity::ALL.len())];
        let message = ALERT_MESSAGES[self.rng.gen_range(0..ALERT_MESSAGES.len())];

        let alert = ServiceAlert {
            id: self.next_alert_id,
            route_id,
            kind,
            severity,
            message: message.to_string(),
            timestamp: now,
        };
        self.next_alert_id += 1;
        self.alerts.push(alert.clone());

        Some(alert)
    }

    /// Current vehicles ordered by route id
    pub fn vehicles(&self) -> Vec<Vehicle> {
        self.vehicles.values().cloned().collect()
    }

    pub fn vehicle(&self, route_id: u32) -> Option<&Vehicle> {
        self.vehicles.get(&route_id)
    }

    /// Every alert emitted so far, oldest first
    pub fn alerts(&self) -> &[ServiceAlert] {
        &self.alerts
    }

    pub fn route_ids(&self) -> &[u32] {
        &self.route_ids
    }

    pub fn snapshot(&self) -> FleetSnapshot {
        FleetSnapshot {
            vehicles: self.vehicles(),
            alerts: self.alerts.clone(),
        }
    }
}

/// Uniform offset in [-max, max]; zero when `max` is zero
fn jitter<R: Rng>(rng: &mut R, max: f64) -> f64 {
    if max > 0.0 {
        rng.gen_range(-max..=max)
    } else {
        0.0
    }
}
