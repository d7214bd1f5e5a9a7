//! Sensor I/O
//!
//! Interface boundary to the rig's sensing collaborators:
//! - BLE presence beacon (AT-command module over UART)
//! - Rangefinder (rear gap)
//! - Follower-detection vision
//! - Ego speed source
//!
//! Detection and ranging internals are black boxes behind these traits;
//! this crate ships the serial beacon link plus deterministic sim devices
//! for tests and bench runs.

pub mod beacon;
pub mod sim;

pub use beacon::{distance_from_rssi, parse_disc_line, DiscResponse, SerialBeaconScanner};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sensor error types
#[derive(Error, Debug)]
pub enum SensorError {
    #[error("serial link error: {0}")]
    Serial(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("device fault: {0}")]
    Device(String),
}

/// One beacon scan result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeaconReading {
    /// Whether the paired token answered the scan.
    pub present: bool,
    /// Estimated token distance (meters), when present.
    pub distance_m: Option<f64>,
}

impl BeaconReading {
    pub fn absent() -> Self {
        Self {
            present: false,
            distance_m: None,
        }
    }
}

/// Presence-token scanner.
pub trait BeaconScanner {
    fn detect(&mut self) -> Result<BeaconReading, SensorError>;
}

/// Rear-gap rangefinder. `Ok(None)` means no measurement was available,
/// which downstream classification treats as an error reading.
pub trait RangeFinder {
    fn read_distance(&mut self) -> Result<Option<f64>, SensorError>;
}

/// Detected follower classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleClass {
    Car,
    HeavyTruck,
    Bus,
    Motorcycle,
    Unknown,
}

/// A follower the vision pipeline has already adjudicated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FollowerObservation {
    pub class: VehicleClass,
    /// Estimated follower speed (km/h).
    pub speed_kmh: f64,
}

/// Camera-based follower detection.
pub trait FollowerVision {
    fn detect_follower(&mut self) -> Result<Option<FollowerObservation>, SensorError>;
}

/// Ego vehicle speed. Implementations report 0 km/h on internal fault
/// rather than failing the caller.
pub trait EgoSpeedSource {
    fn read_ego_speed_kmh(&mut self) -> f64;
}
