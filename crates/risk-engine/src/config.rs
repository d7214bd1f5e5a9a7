//! Risk threshold configuration

use serde::{Deserialize, Serialize};

/// Risk classification thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Gap at or below which the situation is critical regardless of speeds (meters).
    pub critical_distance_m: f64,

    /// Gap at or below which the situation is dangerous (meters).
    pub danger_distance_m: f64,

    /// Fallback safety distance when the computation cannot be trusted (meters).
    pub base_safety_distance_m: f64,

    /// Following-time rule applied to the follower's speed (seconds).
    pub following_time_s: f64,

    /// Extra buffer applied to the closing rate (seconds).
    pub closing_margin_s: f64,

    /// Closing rate above which a flash is escalated to flash + alarm (m/s).
    pub alarm_closing_rate_ms: f64,

    /// Closing rate above which the attention band escalates to flash + alarm (m/s).
    pub urgent_closing_rate_ms: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            critical_distance_m: 5.0,
            danger_distance_m: 15.0,
            base_safety_distance_m: 50.0,
            following_time_s: 3.0,
            closing_margin_s: 2.0,
            alarm_closing_rate_ms: 5.0,
            urgent_closing_rate_ms: 10.0,
        }
    }
}
