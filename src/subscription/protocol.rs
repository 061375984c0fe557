use crate::fleet::{FleetSnapshot, ServiceAlert, Vehicle};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Server → Client live-update message.
///
/// Serialized as `{ "type": "...", "data": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedMessage {
    /// Full state handed to a new subscriber
    Init {
        vehicles: Vec<Vehicle>,
        alerts: Vec<ServiceAlert>,
    },
    /// Every live vehicle after a movement tick
    VehicleUpdates(Vec<Vehicle>),
    /// A single newly raised alert
    ServiceAlert(ServiceAlert),
}

impl FeedMessage {
    /// Encode once per broadcast. Subscriber queues share the buffer; each
    /// socket write still takes its own copy.
    pub fn encode(&self) -> serde_json::Result<Arc<str>> {
        serde_json::to_string(self).map(Arc::from)
    }
}

impl From<FleetSnapshot> for FeedMessage {
    fn from(snapshot: FleetSnapshot) -> Self {
        FeedMessage::Init {
            vehicles: snapshot.vehicles,
            alerts: snapshot.alerts,
        }
    }
}
