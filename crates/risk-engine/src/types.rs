//! Risk classification types

use serde::{Deserialize, Serialize};

/// Risk level for a rear approach.
///
/// Ordered by severity: `Normal < Attention < Danger < Critique`.
/// `Error` signals an invalid reading and is never compared against the
/// severity scale; it sorts last only as a derive artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Normal,
    Attention,
    Danger,
    Critique,
    Error,
}

impl RiskLevel {
    /// Whether this level warrants an incident record.
    pub fn is_incident(self) -> bool {
        matches!(self, RiskLevel::Danger | RiskLevel::Critique)
    }
}

/// Actuation requested for a risk level.
///
/// Derived from `RiskLevel` and closing rate on every tick, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertAction {
    None,
    Flash,
    FlashAndAlarm,
}

/// One tick's worth of sensor input to the evaluator.
///
/// `distance_m = None` is a valid error signal meaning no measurement
/// was available.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    /// Gap to the follower in meters, if the rangefinder returned one.
    pub distance_m: Option<f64>,
    /// Ego vehicle speed (km/h).
    pub ego_speed_kmh: f64,
    /// Estimated follower speed (km/h).
    pub follower_speed_kmh: f64,
}
