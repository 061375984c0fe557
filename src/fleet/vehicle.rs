use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Live position of the single simulated vehicle serving a route
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub route_id: u32,
    pub latitude: f64,
    pub longitude: f64,
    /// Degrees in [0, 360)
    pub heading: f64,
    pub speed: f64,
    pub last_update: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertType {
    Delay,
    Cancellation,
    Detour,
    Notice,
}

impl AlertType {
    pub const ALL: [AlertType; 4] = [
        AlertType::Delay,
        AlertType::Cancellation,
        AlertType::Detour,
        AlertType::Notice,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
}

impl AlertSeverity {
    pub const ALL: [AlertSeverity; 3] = [AlertSeverity::Low, AlertSeverity::Medium, AlertSeverity::High];
}

/// Rider-facing messages an alert can carry
pub const ALERT_MESSAGES: [&str; 6] = [
    "Minor delay due to traffic congestion",
    "Route detour due to road construction",
    "Service temporarily suspended",
    "Expect delays due to special event",
    "Bus running 5-10 minutes behind schedule",
    "Weather advisory: Service operating with caution",
];

/// Service disruption notice. Retained for the life of the process.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAlert {
    pub id: u64,
    pub route_id: u32,
    #[serde(rename = "type")]
    pub kind: AlertType,
    pub severity: AlertSeverity,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Vehicles and alerts as they stood after the last completed tick
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FleetSnapshot {
    pub vehicles: Vec<Vehicle>,
    pub alerts: Vec<ServiceAlert>,
}
