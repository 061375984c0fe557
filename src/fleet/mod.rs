// Fleet simulation and live state

mod live;
mod runner;
mod simulator;
mod vehicle;

pub use live::LiveFleet;
pub use runner::run_fleet_simulation;
pub use simulator::FleetSimulator;
pub use vehicle::{
    AlertSeverity, AlertType, FleetSnapshot, ServiceAlert, Vehicle, ALERT_MESSAGES,
};
