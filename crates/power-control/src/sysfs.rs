//! Sysfs GPIO rail switch

use crate::component::{ComponentId, Rail};
use crate::controller::RailSwitch;
use crate::PowerError;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::trace;

/// Rail switch backed by Linux sysfs GPIO value files.
///
/// Each rail maps to an exported GPIO line; energizing writes `1` to its
/// value file. Writes are idempotent at the kernel level, so re-asserting
/// the current state is harmless.
pub struct SysfsRailSwitch {
    gpio_root: PathBuf,
    mapping: HashMap<Rail, u32>,
}

impl SysfsRailSwitch {
    pub fn new(gpio_root: impl Into<PathBuf>, mapping: HashMap<Rail, u32>) -> Self {
        Self {
            gpio_root: gpio_root.into(),
            mapping,
        }
    }

    /// Default line assignment for the reference rig.
    pub fn default_mapping() -> HashMap<Rail, u32> {
        let mut mapping = HashMap::new();
        mapping.insert(Rail::Component(ComponentId::Camera), 15);
        mapping.insert(Rail::Component(ComponentId::Lidar), 16);
        mapping.insert(Rail::Component(ComponentId::Audio), 17);
        mapping.insert(Rail::Component(ComponentId::FlashLamp), 18);
        mapping.insert(Rail::Component(ComponentId::Storage), 19);
        mapping.insert(Rail::Component(ComponentId::Bluetooth), 20);
        for (index, line) in (21..26).enumerate() {
            mapping.insert(Rail::Converter(index), line);
        }
        mapping
    }

    fn value_path(&self, line: u32) -> PathBuf {
        self.gpio_root.join(format!("gpio{}/value", line))
    }
}

impl RailSwitch for SysfsRailSwitch {
    fn set_rail(&mut self, rail: Rail, energized: bool) -> Result<(), PowerError> {
        let line = *self
            .mapping
            .get(&rail)
            .ok_or_else(|| PowerError::UnmappedRail(rail.to_string()))?;

        let value = if energized { "1" } else { "0" };
        trace!(%rail, line, value, "rail write");
        fs::write(self.value_path(line), value).map_err(|source| PowerError::RailWrite {
            rail: rail.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mapping_covers_every_rail() {
        let mapping = SysfsRailSwitch::default_mapping();
        for component in ComponentId::ALL {
            assert!(mapping.contains_key(&Rail::Component(component)));
        }
        for index in 0..crate::component::CONVERTERS.len() {
            assert!(mapping.contains_key(&Rail::Converter(index)));
        }
    }

    #[test]
    fn test_unmapped_rail_is_an_error() {
        let mut switch = SysfsRailSwitch::new("/sys/class/gpio", HashMap::new());
        let err = switch
            .set_rail(Rail::Component(ComponentId::Camera), true)
            .unwrap_err();
        assert!(matches!(err, PowerError::UnmappedRail(_)));
    }

    #[test]
    fn test_writes_value_file() {
        let root = std::env::temp_dir().join(format!("rearguard-gpio-{}", std::process::id()));
        std::fs::create_dir_all(root.join("gpio15")).unwrap();

        let mut mapping = HashMap::new();
        mapping.insert(Rail::Component(ComponentId::Camera), 15);
        let mut switch = SysfsRailSwitch::new(root.clone(), mapping);

        switch.set_rail(Rail::Component(ComponentId::Camera), true).unwrap();
        assert_eq!(std::fs::read_to_string(root.join("gpio15/value")).unwrap(), "1");
        switch.set_rail(Rail::Component(ComponentId::Camera), false).unwrap();
        assert_eq!(std::fs::read_to_string(root.join("gpio15/value")).unwrap(), "0");

        let _ = std::fs::remove_dir_all(&root);
    }
}
