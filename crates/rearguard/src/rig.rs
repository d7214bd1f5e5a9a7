//! Deployment rig wiring

use crate::config::SupervisorConfig;
use crate::supervisor::{DetectionRig, RigBuilder};
use alert_driver::{AlertDriver, SysfsFlashLamp, SysfsSounder};
use sensor_io::sim::{FixedEgoSpeed, FixedRangeFinder, FixedVision};

/// GPIO line of the warning lamp.
const LAMP_LINE: u32 = 12;

/// GPIO line of the sounder enable.
const SOUNDER_LINE: u32 = 14;

/// Bench fixture values for the out-of-scope sensing black boxes.
const BENCH_RANGE_M: f64 = 25.0;
const BENCH_EGO_KMH: f64 = 70.0;
const BENCH_FOLLOWER_KMH: f64 = 80.0;

/// Rig builder for the bench setup: real GPIO alert outputs, fixture
/// values for ranging and vision. The ranging and detection pipelines are
/// external collaborators; swap their sim devices for hardware-backed
/// implementations of the same traits when integrating.
pub fn bench_rig_builder(config: &SupervisorConfig) -> RigBuilder {
    let gpio_root = config.gpio_root.clone();
    Box::new(move || {
        let lamp = SysfsFlashLamp::new(gpio_root.clone(), LAMP_LINE);
        let sounder = SysfsSounder::new(gpio_root.clone(), SOUNDER_LINE);
        Ok(DetectionRig {
            rangefinder: Box::new(FixedRangeFinder::new(Some(BENCH_RANGE_M))),
            vision: Box::new(FixedVision::truck(BENCH_FOLLOWER_KMH)),
            ego_speed: Box::new(FixedEgoSpeed(BENCH_EGO_KMH)),
            alerts: AlertDriver::new(Box::new(lamp), Box::new(sounder)),
        })
    })
}
