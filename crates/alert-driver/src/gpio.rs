//! Sysfs GPIO-backed alert outputs

use crate::driver::{FlashLamp, Sounder};
use crate::AlertError;
use std::fs;
use std::path::{Path, PathBuf};

fn write_value(path: &Path, on: bool) -> Result<(), AlertError> {
    fs::write(path, if on { "1" } else { "0" })?;
    Ok(())
}

/// Warning lamp on an exported GPIO line.
pub struct SysfsFlashLamp {
    value_path: PathBuf,
}

impl SysfsFlashLamp {
    pub fn new(gpio_root: impl Into<PathBuf>, line: u32) -> Self {
        Self {
            value_path: gpio_root.into().join(format!("gpio{}/value", line)),
        }
    }
}

impl FlashLamp for SysfsFlashLamp {
    fn set_lit(&mut self, lit: bool) -> Result<(), AlertError> {
        write_value(&self.value_path, lit)
    }
}

/// Sounder enable line (amplifier gate) on an exported GPIO line.
pub struct SysfsSounder {
    value_path: PathBuf,
}

impl SysfsSounder {
    pub fn new(gpio_root: impl Into<PathBuf>, line: u32) -> Self {
        Self {
            value_path: gpio_root.into().join(format!("gpio{}/value", line)),
        }
    }
}

impl Sounder for SysfsSounder {
    fn set_active(&mut self, active: bool) -> Result<(), AlertError> {
        write_value(&self.value_path, active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lamp_writes_value_file() {
        let root = std::env::temp_dir().join(format!("rearguard-lamp-{}", std::process::id()));
        fs::create_dir_all(root.join("gpio12")).unwrap();

        let mut lamp = SysfsFlashLamp::new(root.clone(), 12);
        lamp.set_lit(true).unwrap();
        assert_eq!(fs::read_to_string(root.join("gpio12/value")).unwrap(), "1");
        lamp.set_lit(false).unwrap();
        assert_eq!(fs::read_to_string(root.join("gpio12/value")).unwrap(), "0");

        let _ = fs::remove_dir_all(&root);
    }
}
