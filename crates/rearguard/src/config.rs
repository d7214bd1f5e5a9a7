//! Supervisor configuration
//!
//! Layered: built-in defaults, then an optional TOML file, then
//! `REARGUARD_*` environment overrides.

use power_control::{BatteryConfig, PowerMode};
use risk_engine::RiskConfig;
use sensor_io::VehicleClass;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Presence beacon settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BeaconConfig {
    /// Serial device of the BLE module.
    pub port: String,
    pub baud: u32,
    /// UUID of the paired presence token.
    pub target_uuid: String,
    /// A sighting only qualifies within this range (meters).
    pub qualify_range_m: f64,
    /// Qualifying samples required before activation.
    pub presence_threshold: u32,
}

impl Default for BeaconConfig {
    fn default() -> Self {
        Self {
            port: "/dev/ttyS0".to_string(),
            baud: 9600,
            target_uuid: "FDA50693-A4E2-4FB1-AFCF-C6FB0764".to_string(),
            qualify_range_m: 1.5,
            presence_threshold: 3,
        }
    }
}

/// Loop timing. The polling interval follows the power mode, trading
/// responsiveness for battery life.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CadenceConfig {
    pub sleep_ms: u64,
    pub low_power_ms: u64,
    pub active_ms: u64,
    /// Pause between the low-power and active steps of activation.
    pub warmup_ms: u64,
    /// Pause after a failed tick before resuming.
    pub error_backoff_ms: u64,
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            sleep_ms: 1000,
            low_power_ms: 500,
            active_ms: 100,
            warmup_ms: 500,
            error_backoff_ms: 5000,
        }
    }
}

impl CadenceConfig {
    pub fn interval_for(&self, mode: PowerMode) -> Duration {
        let ms = match mode {
            PowerMode::Sleep => self.sleep_ms,
            PowerMode::LowPower => self.low_power_ms,
            PowerMode::Active => self.active_ms,
        };
        Duration::from_millis(ms)
    }

    pub fn warmup(&self) -> Duration {
        Duration::from_millis(self.warmup_ms)
    }

    pub fn error_backoff(&self) -> Duration {
        Duration::from_millis(self.error_backoff_ms)
    }
}

/// Top-level supervisor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SupervisorConfig {
    pub beacon: BeaconConfig,
    pub cadence: CadenceConfig,
    pub risk: RiskConfig,
    pub battery: BatteryConfig,
    /// Follower class the rig warns about.
    pub tracked_class: VehicleClass,
    /// Append-only incident log path.
    pub incident_log: String,
    /// Sysfs GPIO root for rails and alert outputs.
    pub gpio_root: String,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            beacon: BeaconConfig::default(),
            cadence: CadenceConfig::default(),
            risk: RiskConfig::default(),
            battery: BatteryConfig::default(),
            tracked_class: VehicleClass::HeavyTruck,
            incident_log: "/sd/incidents.log".to_string(),
            gpio_root: "/sys/class/gpio".to_string(),
        }
    }
}

impl SupervisorConfig {
    /// Load defaults, then an optional file, then environment overrides.
    pub fn load(path: Option<&str>) -> Result<Self, ::config::ConfigError> {
        let mut builder = ::config::Config::builder()
            .add_source(::config::Config::try_from(&SupervisorConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(::config::File::with_name(path));
        }

        builder
            .add_source(::config::Environment::with_prefix("REARGUARD").separator("__"))
            .build()?
            .try_deserialize()
    }
}
