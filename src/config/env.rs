use super::TransitConfig;
use tracing::warn;

/// Apply `TRANSIT_*` overrides on top of file/default configuration.
///
/// Values that fail to parse are ignored and the existing setting is kept.
pub(super) fn apply_overrides<F>(config: &mut TransitConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup("TRANSIT_HOST") {
        config.server.host = v;
    }
    if let Some(v) = lookup("TRANSIT_PORT") {
        match v.parse::<u16>() {
            Ok(port) => config.server.port = port,
            Err(_) => warn!(value = %v, "Ignoring invalid TRANSIT_PORT"),
        }
    }
    if let Some(v) = lookup("TRANSIT_SIM_SEED") {
        match v.parse::<u64>() {
            Ok(seed) => config.simulation.seed = Some(seed),
            Err(_) => warn!(value = %v, "Ignoring invalid TRANSIT_SIM_SEED"),
        }
    }
    if let Some(v) = lookup("TRANSIT_ALERT_PROBABILITY") {
        match v.parse::<f64>() {
            Ok(p) if (0.0..=1.0).contains(&p) => config.simulation.alert_probability = p,
            _ => warn!(value = %v, "Ignoring invalid TRANSIT_ALERT_PROBABILITY"),
        }
    }
}
