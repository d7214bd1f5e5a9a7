//! Rearguard Supervisor
//!
//! Rear-collision early-warning control loop:
//! - Debounces BLE presence of the driver's token
//! - Sequences power modes (sleep, low power, active)
//! - Drives the range/vision to risk to alert pipeline each tick
//! - Forces sleep and backs off on any tick-level fault
//!
//! Single-threaded and tick-based; one iteration runs to completion before
//! the next begins.

pub mod config;
pub mod presence;
pub mod rig;
pub mod supervisor;

pub use config::{BeaconConfig, CadenceConfig, SupervisorConfig};
pub use presence::PresenceDebouncer;
pub use supervisor::{DetectionRig, RigBuilder, Supervisor};

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Supervisor error types
#[derive(Error, Debug)]
pub enum SupervisorError {
    #[error(transparent)]
    Power(#[from] power_control::PowerError),

    #[error(transparent)]
    Sensor(#[from] sensor_io::SensorError),

    #[error("detection rig construction failed: {0}")]
    RigInit(String),
}

/// Initialize structured logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}
