//! Peripheral inventory and rail addressing

use serde::{Deserialize, Serialize};
use std::fmt;

/// Switchable peripheral on the rig.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ComponentId {
    /// Follower-detection camera
    Camera,
    /// Rangefinder
    Lidar,
    /// Speaker + amplifier
    Audio,
    /// SD card
    Storage,
    /// High-power warning lamp
    FlashLamp,
    /// BLE beacon module
    Bluetooth,
}

impl ComponentId {
    /// Every switchable component, in rail order.
    pub const ALL: [ComponentId; 6] = [
        ComponentId::Camera,
        ComponentId::Lidar,
        ComponentId::Audio,
        ComponentId::Storage,
        ComponentId::FlashLamp,
        ComponentId::Bluetooth,
    ];

    /// Rated draw while energized (watts). Used only for the active-mode
    /// battery estimate.
    pub fn rated_draw_w(self) -> f64 {
        match self {
            ComponentId::Camera => 2.0,
            ComponentId::Lidar => 0.5,
            ComponentId::Audio => 3.0,
            ComponentId::Storage => 0.2,
            ComponentId::FlashLamp => 20.0,
            ComponentId::Bluetooth => 0.1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ComponentId::Camera => "camera",
            ComponentId::Lidar => "lidar",
            ComponentId::Audio => "audio",
            ComponentId::Storage => "storage",
            ComponentId::FlashLamp => "flash_lamp",
            ComponentId::Bluetooth => "bluetooth",
        }
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One DC-DC converter in the bank.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConverterSpec {
    /// Output voltage (volts).
    pub voltage_v: f64,
    /// Load it feeds.
    pub feeds: &'static str,
}

/// Converter bank, indexed by position.
pub const CONVERTERS: [ConverterSpec; 5] = [
    ConverterSpec { voltage_v: 5.0, feeds: "camera" },
    ConverterSpec { voltage_v: 12.0, feeds: "flash_lamp" },
    ConverterSpec { voltage_v: 3.3, feeds: "logic" },
    ConverterSpec { voltage_v: 5.0, feeds: "audio" },
    ConverterSpec { voltage_v: 3.3, feeds: "bluetooth" },
];

/// Index of the converter feeding the BLE module (the only one kept up in sleep).
pub const BLUETOOTH_CONVERTER: usize = 4;

/// Index of the logic-rail converter (kept up in low power alongside bluetooth).
pub const LOGIC_CONVERTER: usize = 2;

/// A switched power path: either a component rail or a converter enable line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rail {
    Component(ComponentId),
    Converter(usize),
}

impl fmt::Display for Rail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rail::Component(c) => write!(f, "{}", c),
            Rail::Converter(i) => write!(f, "converter{}", i),
        }
    }
}
