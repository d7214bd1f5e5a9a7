//! Rear-Approach Risk Engine
//!
//! Classifies the threat posed by a following vehicle:
//! - Safety-distance computation (following-time rule + closing margin)
//! - Distance banding into risk levels
//! - Closing-rate sub-banding into alert actions
//!
//! The evaluator is a pure function over one sensor reading; it carries no
//! state between ticks.

pub mod config;
pub mod evaluator;
pub mod types;

pub use config::RiskConfig;
pub use evaluator::RiskEvaluator;
pub use types::{AlertAction, RiskLevel, SensorReading};
