//! Risk Evaluator Implementation

use crate::config::RiskConfig;
use crate::types::{AlertAction, RiskLevel, SensorReading};
use tracing::warn;

const KMH_TO_MS: f64 = 3.6;

/// Stateless rear-approach risk classifier.
pub struct RiskEvaluator {
    config: RiskConfig,
}

impl RiskEvaluator {
    /// Create a new evaluator with the given thresholds.
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    /// Minimum following gap for the given speeds (meters).
    ///
    /// Sum of a following-time rule on the follower's speed and a margin on
    /// the closing rate (zero when the follower is not gaining). Falls back
    /// to a fixed conservative constant when the inputs are not usable, so
    /// a bad telemetry sample still yields cautious banding upstream.
    pub fn safety_distance(&self, ego_speed_kmh: f64, follower_speed_kmh: f64) -> f64 {
        if !ego_speed_kmh.is_finite() || !follower_speed_kmh.is_finite() {
            warn!(
                ego = ego_speed_kmh,
                follower = follower_speed_kmh,
                "non-finite speed input, using fallback safety distance"
            );
            return self.config.base_safety_distance_m;
        }

        let time_based = (follower_speed_kmh / KMH_TO_MS) * self.config.following_time_s;
        let speed_margin =
            (follower_speed_kmh - ego_speed_kmh).max(0.0) / KMH_TO_MS * self.config.closing_margin_s;

        time_based + speed_margin
    }

    /// Classify one sensor reading into a risk level and alert action.
    ///
    /// A missing distance is a valid error signal and yields
    /// `(Error, None)`; the caller must not actuate on it.
    pub fn evaluate(&self, reading: &SensorReading) -> (RiskLevel, AlertAction) {
        let distance_m = match reading.distance_m {
            Some(d) if d.is_finite() && d >= 0.0 => d,
            Some(d) => {
                warn!(distance = d, "unusable distance reading");
                return (RiskLevel::Error, AlertAction::None);
            }
            None => return (RiskLevel::Error, AlertAction::None),
        };

        let safety_distance =
            self.safety_distance(reading.ego_speed_kmh, reading.follower_speed_kmh);
        let closing_rate_ms =
            (reading.follower_speed_kmh - reading.ego_speed_kmh).max(0.0) / KMH_TO_MS;

        if !closing_rate_ms.is_finite() {
            return (RiskLevel::Error, AlertAction::None);
        }

        // Bands from most severe to least. The critical band is unconditional:
        // at that gap no closing rate makes the situation recoverable.
        if distance_m <= self.config.critical_distance_m {
            (RiskLevel::Critique, AlertAction::FlashAndAlarm)
        } else if distance_m <= self.config.danger_distance_m {
            if closing_rate_ms > self.config.alarm_closing_rate_ms {
                (RiskLevel::Danger, AlertAction::FlashAndAlarm)
            } else {
                (RiskLevel::Danger, AlertAction::Flash)
            }
        } else if distance_m < safety_distance {
            if closing_rate_ms > self.config.urgent_closing_rate_ms {
                (RiskLevel::Attention, AlertAction::FlashAndAlarm)
            } else if closing_rate_ms > self.config.alarm_closing_rate_ms {
                (RiskLevel::Attention, AlertAction::Flash)
            } else {
                // Inside the safety envelope but not closing fast enough to
                // actuate. Still reported as attention so the level reflects
                // the gap.
                (RiskLevel::Attention, AlertAction::None)
            }
        } else {
            (RiskLevel::Normal, AlertAction::None)
        }
    }
}

impl Default for RiskEvaluator {
    fn default() -> Self {
        Self::new(RiskConfig::default())
    }
}
