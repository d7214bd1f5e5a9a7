//! Deterministic sim devices
//!
//! Stand-ins for the out-of-scope hardware, used by unit tests and by the
//! bench rig. Every device is scripted or fixed; nothing here touches I/O.

use crate::{
    BeaconReading, BeaconScanner, EgoSpeedSource, FollowerObservation, FollowerVision,
    RangeFinder, SensorError, VehicleClass,
};
use std::collections::VecDeque;

/// Beacon that replays a scripted sample sequence, then reports the token
/// absent forever.
#[derive(Debug, Default)]
pub struct ScriptedBeacon {
    samples: VecDeque<BeaconReading>,
}

impl ScriptedBeacon {
    pub fn new(samples: impl IntoIterator<Item = BeaconReading>) -> Self {
        Self {
            samples: samples.into_iter().collect(),
        }
    }

    /// Beacon pinned near the rig for `ticks` samples.
    pub fn near_for(distance_m: f64, ticks: usize) -> Self {
        Self::new(
            std::iter::repeat(BeaconReading {
                present: true,
                distance_m: Some(distance_m),
            })
            .take(ticks),
        )
    }
}

impl BeaconScanner for ScriptedBeacon {
    fn detect(&mut self) -> Result<BeaconReading, SensorError> {
        Ok(self.samples.pop_front().unwrap_or_else(BeaconReading::absent))
    }
}

/// Rangefinder returning the same reading every tick.
#[derive(Debug)]
pub struct FixedRangeFinder {
    pub distance_m: Option<f64>,
}

impl FixedRangeFinder {
    pub fn new(distance_m: Option<f64>) -> Self {
        Self { distance_m }
    }
}

impl RangeFinder for FixedRangeFinder {
    fn read_distance(&mut self) -> Result<Option<f64>, SensorError> {
        Ok(self.distance_m)
    }
}

/// Rangefinder whose every read fails, for fault-path tests.
#[derive(Debug, Default)]
pub struct FaultyRangeFinder;

impl RangeFinder for FaultyRangeFinder {
    fn read_distance(&mut self) -> Result<Option<f64>, SensorError> {
        Err(SensorError::Device("rangefinder offline".into()))
    }
}

/// Vision reporting the same follower (or none) every tick.
#[derive(Debug)]
pub struct FixedVision {
    pub observation: Option<FollowerObservation>,
}

impl FixedVision {
    pub fn new(observation: Option<FollowerObservation>) -> Self {
        Self { observation }
    }

    /// A heavy truck closing at the given speed.
    pub fn truck(speed_kmh: f64) -> Self {
        Self::new(Some(FollowerObservation {
            class: VehicleClass::HeavyTruck,
            speed_kmh,
        }))
    }
}

impl FollowerVision for FixedVision {
    fn detect_follower(&mut self) -> Result<Option<FollowerObservation>, SensorError> {
        Ok(self.observation)
    }
}

/// Constant ego speed.
#[derive(Debug)]
pub struct FixedEgoSpeed(pub f64);

impl EgoSpeedSource for FixedEgoSpeed {
    fn read_ego_speed_kmh(&mut self) -> f64 {
        self.0
    }
}
