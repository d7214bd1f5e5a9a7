//! Power Control
//!
//! Gates which peripherals are energized:
//! - Three power modes (sleep, low power, active) with a total
//!   rail-activation table per mode
//! - Named component and DC-DC converter inventory with rated draws
//! - Battery-life estimation from the currently energized set
//! - Sysfs GPIO rail switch for deployment, trait seam for tests
//!
//! The current mode is the sole source of truth for which rails carry
//! power; every mode change reassigns all rails rather than diffing.

pub mod component;
pub mod controller;
pub mod sysfs;

pub use component::{ComponentId, ConverterSpec, Rail, CONVERTERS};
pub use controller::{BatteryConfig, PowerController, PowerMode, RailSwitch};
pub use sysfs::SysfsRailSwitch;

use thiserror::Error;

/// Power control error types
#[derive(Error, Debug)]
pub enum PowerError {
    #[error("rail actuation failed for {rail}: {source}")]
    RailWrite {
        rail: String,
        source: std::io::Error,
    },

    #[error("no GPIO mapping for rail {0}")]
    UnmappedRail(String),
}
