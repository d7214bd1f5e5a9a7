//! Power Controller Implementation

use crate::component::{
    ComponentId, Rail, BLUETOOTH_CONVERTER, CONVERTERS, LOGIC_CONVERTER,
};
use crate::PowerError;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Fixed draw attributed to sleep mode (watts).
const SLEEP_DRAW_W: f64 = 0.2;

/// Fixed draw attributed to low-power mode (watts).
const LOW_POWER_DRAW_W: f64 = 0.8;

/// System power mode, ordered by energy draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PowerMode {
    Sleep,
    LowPower,
    Active,
}

impl PowerMode {
    /// Component rails carrying power in this mode.
    pub fn energized_components(self) -> &'static [ComponentId] {
        match self {
            // Only the beacon radio stays up; battery management is unswitched.
            PowerMode::Sleep => &[ComponentId::Bluetooth],
            PowerMode::LowPower => &[
                ComponentId::Bluetooth,
                ComponentId::Lidar,
                ComponentId::Storage,
            ],
            PowerMode::Active => &ComponentId::ALL,
        }
    }

    /// Converter enable lines held high in this mode.
    pub fn energized_converters(self) -> &'static [usize] {
        match self {
            PowerMode::Sleep => &[BLUETOOTH_CONVERTER],
            PowerMode::LowPower => &[LOGIC_CONVERTER, BLUETOOTH_CONVERTER],
            PowerMode::Active => &[0, 1, 2, 3, 4],
        }
    }
}

/// Battery pack parameters for the autonomy estimate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatteryConfig {
    /// Nominal cell voltage (volts).
    pub cell_voltage_v: f64,
    /// Capacity per cell (amp hours).
    pub capacity_ah: f64,
    /// Number of cells in the pack.
    pub cell_count: u32,
}

impl BatteryConfig {
    /// Total pack energy (watt hours).
    pub fn capacity_wh(&self) -> f64 {
        self.cell_voltage_v * self.capacity_ah * f64::from(self.cell_count)
    }
}

impl Default for BatteryConfig {
    fn default() -> Self {
        // Two 25 Ah LiFePO4 cells.
        Self {
            cell_voltage_v: 3.2,
            capacity_ah: 25.0,
            cell_count: 2,
        }
    }
}

/// Switched power path actuation. Implementations must be idempotent:
/// re-asserting the current state of a rail is a no-op.
pub trait RailSwitch {
    fn set_rail(&mut self, rail: Rail, energized: bool) -> Result<(), PowerError>;
}

/// Power-mode state machine over the rig's rail switch.
///
/// Any mode may transition to any other. Each transition is a total
/// reassignment: every component rail and converter line is written,
/// not just the ones that changed.
pub struct PowerController {
    rails: Box<dyn RailSwitch + Send>,
    battery: BatteryConfig,
    mode: PowerMode,
}

impl PowerController {
    /// Create a controller and drive all rails to the sleep table.
    pub fn new(
        rails: Box<dyn RailSwitch + Send>,
        battery: BatteryConfig,
    ) -> Result<Self, PowerError> {
        let mut controller = Self {
            rails,
            battery,
            mode: PowerMode::Sleep,
        };
        controller.apply_mode(PowerMode::Sleep)?;
        controller.log_power_status();
        Ok(controller)
    }

    /// Current mode.
    pub fn mode(&self) -> PowerMode {
        self.mode
    }

    /// Transition to `mode`, rewriting every rail to the target table.
    pub fn set_mode(&mut self, mode: PowerMode) -> Result<(), PowerError> {
        debug!(from = ?self.mode, to = ?mode, "power mode transition");
        self.apply_mode(mode)?;
        self.log_power_status();
        Ok(())
    }

    fn apply_mode(&mut self, mode: PowerMode) -> Result<(), PowerError> {
        let components = mode.energized_components();
        for component in ComponentId::ALL {
            self.rails
                .set_rail(Rail::Component(component), components.contains(&component))?;
        }

        let converters = mode.energized_converters();
        for index in 0..CONVERTERS.len() {
            self.rails
                .set_rail(Rail::Converter(index), converters.contains(&index))?;
        }

        self.mode = mode;
        Ok(())
    }

    /// Instantaneous draw in the current mode (watts).
    ///
    /// Sleep and low power use fixed measured figures; active sums the
    /// rated draw of every energized component.
    pub fn instantaneous_draw_w(&self) -> f64 {
        match self.mode {
            PowerMode::Sleep => SLEEP_DRAW_W,
            PowerMode::LowPower => LOW_POWER_DRAW_W,
            PowerMode::Active => self
                .mode
                .energized_components()
                .iter()
                .map(|c| c.rated_draw_w())
                .sum(),
        }
    }

    /// Estimated runtime on the pack at the current draw (hours).
    pub fn estimate_battery_life(&self) -> f64 {
        let draw_w = self.instantaneous_draw_w();
        // Active always energizes at least one component, so the draw is
        // never zero; fall back to the sleep figure rather than divide by it.
        let draw_w = if draw_w > 0.0 { draw_w } else { SLEEP_DRAW_W };
        self.battery.capacity_wh() / draw_w
    }

    fn log_power_status(&self) {
        let components: Vec<&str> = self
            .mode
            .energized_components()
            .iter()
            .map(|c| c.name())
            .collect();
        info!(
            mode = ?self.mode,
            draw_w = self.instantaneous_draw_w(),
            estimated_hours = self.estimate_battery_life(),
            energized = ?components,
            "power status"
        );
    }
}
