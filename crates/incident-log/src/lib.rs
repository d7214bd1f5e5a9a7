//! Incident Log
//!
//! Append-only record of danger and critical rear approaches. One line per
//! incident: `timestamp,distance,ego_speed,follower_speed` with the
//! timestamp in unix milliseconds. Failures to persist are reported to the
//! caller but are never fatal to the control loop.

pub mod sink;

pub use sink::{FileIncidentSink, IncidentSink, MemoryIncidentSink};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Incident log error types
#[derive(Error, Debug)]
pub enum IncidentError {
    #[error("append failed: {0}")]
    Append(#[from] std::io::Error),
}

/// One logged approach.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IncidentRecord {
    /// Unix milliseconds.
    pub timestamp_ms: i64,
    /// Gap at evaluation time (meters).
    pub distance_m: f64,
    /// Ego speed (km/h).
    pub ego_speed_kmh: f64,
    /// Estimated follower speed (km/h).
    pub follower_speed_kmh: f64,
}

impl IncidentRecord {
    /// Record stamped with the current wall clock.
    pub fn now(distance_m: f64, ego_speed_kmh: f64, follower_speed_kmh: f64) -> Self {
        Self {
            timestamp_ms: Utc::now().timestamp_millis(),
            distance_m,
            ego_speed_kmh,
            follower_speed_kmh,
        }
    }

    /// Wire form: ordered comma-separated tuple.
    pub fn to_line(&self) -> String {
        format!(
            "{},{:.2},{:.1},{:.1}",
            self.timestamp_ms, self.distance_m, self.ego_speed_kmh, self.follower_speed_kmh
        )
    }
}
