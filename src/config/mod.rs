mod env;

use anyhow::{ensure, Context, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Complete service configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransitConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub broadcast: BroadcastConfig,
    #[serde(default)]
    pub wallet: WalletConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Fleet simulation tuning
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    /// Period of the vehicle movement tick (milliseconds)
    #[serde(default = "default_movement_interval_ms")]
    pub movement_interval_ms: u64,
    /// Period of the service alert draw (milliseconds)
    #[serde(default = "default_alert_interval_ms")]
    pub alert_interval_ms: u64,
    /// Chance that an alert tick produces an alert
    #[serde(default = "default_alert_probability")]
    pub alert_probability: f64,
    #[serde(default = "default_center_latitude")]
    pub center_latitude: f64,
    #[serde(default = "default_center_longitude")]
    pub center_longitude: f64,
    /// Width of the box vehicles are scattered in at startup (degrees)
    #[serde(default = "default_initial_spread")]
    pub initial_spread: f64,
    /// Largest per-tick change to latitude or longitude (degrees)
    #[serde(default = "default_max_step")]
    pub max_step: f64,
    /// Fixed RNG seed; random when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_movement_interval_ms() -> u64 {
    3_000
}

fn default_alert_interval_ms() -> u64 {
    30_000
}

fn default_alert_probability() -> f64 {
    0.3
}

fn default_center_latitude() -> f64 {
    36.1627
}

fn default_center_longitude() -> f64 {
    -86.7816
}

fn default_initial_spread() -> f64 {
    0.02
}

fn default_max_step() -> f64 {
    0.0005
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            movement_interval_ms: default_movement_interval_ms(),
            alert_interval_ms: default_alert_interval_ms(),
            alert_probability: default_alert_probability(),
            center_latitude: default_center_latitude(),
            center_longitude: default_center_longitude(),
            initial_spread: default_initial_spread(),
            max_step: default_max_step(),
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn movement_interval(&self) -> Duration {
        Duration::from_millis(self.movement_interval_ms.max(1))
    }

    pub fn alert_interval(&self) -> Duration {
        Duration::from_millis(self.alert_interval_ms.max(1))
    }

    /// Reject values the simulator cannot draw from
    pub fn validate(&self) -> Result<()> {
        ensure!(
            (0.0..=1.0).contains(&self.alert_probability),
            "simulation.alert_probability must be within [0, 1], got {}",
            self.alert_probability
        );
        ensure!(
            self.center_latitude.is_finite() && self.center_longitude.is_finite(),
            "simulation center must be finite, got ({}, {})",
            self.center_latitude,
            self.center_longitude
        );
        for (name, value) in [
            ("initial_spread", self.initial_spread),
            ("max_step", self.max_step),
        ] {
            ensure!(
                value.is_finite() && value >= 0.0,
                "simulation.{} must be finite and non-negative, got {}",
                name,
                value
            );
        }
        Ok(())
    }
}

/// Live-update fan-out configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BroadcastConfig {
    /// Messages buffered per subscriber before new ones are dropped
    #[serde(default = "default_subscriber_buffer")]
    pub subscriber_buffer: usize,
}

fn default_subscriber_buffer() -> usize {
    64
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            subscriber_buffer: default_subscriber_buffer(),
        }
    }
}

/// Wallet defaults
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WalletConfig {
    /// Balance given to a wallet created on first lookup
    #[serde(default)]
    pub starting_balance: Decimal,
}

/// Load configuration from TOML file
pub fn load_config(path: impl AsRef<Path>) -> Result<TransitConfig> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: TransitConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    Ok(config)
}

/// Load configuration for the running process.
///
/// Reads the file named by `TRANSIT_CONFIG` when set, applies the
/// `TRANSIT_*` environment overrides, then validates the simulation section.
pub fn load_from_env() -> Result<TransitConfig> {
    resolve_config(|key| std::env::var(key).ok())
}

fn resolve_config<F>(lookup: F) -> Result<TransitConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match lookup("TRANSIT_CONFIG") {
        Some(path) => load_config(path)?,
        None => TransitConfig::default(),
    };
    env::apply_overrides(&mut config, lookup);
    config
        .simulation
        .validate()
        .context("Invalid simulation configuration")?;
    Ok(config)
}
