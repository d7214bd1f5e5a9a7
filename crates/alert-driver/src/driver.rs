//! Alert Driver Implementation

use crate::AlertError;
use risk_engine::AlertAction;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// How long the sounder stays on per alarm.
const ALARM_DURATION: Duration = Duration::from_secs(1);

/// Binary warning lamp output.
pub trait FlashLamp {
    fn set_lit(&mut self, lit: bool) -> Result<(), AlertError>;
}

/// Binary sounder output.
pub trait Sounder {
    fn set_active(&mut self, active: bool) -> Result<(), AlertError>;
}

/// Blink pattern for the lamp. Each step toggles the lamp and holds for
/// the step's duration; the lamp always ends dark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashPattern {
    /// Fast strobe for imminent danger.
    Urgent,
    /// Slower double blink for attention.
    Attention,
}

impl FlashPattern {
    pub fn steps(self) -> &'static [Duration] {
        const URGENT: [Duration; 6] = [Duration::from_millis(100); 6];
        const ATTENTION: [Duration; 4] = [
            Duration::from_millis(200),
            Duration::from_millis(300),
            Duration::from_millis(200),
            Duration::from_millis(300),
        ];
        match self {
            FlashPattern::Urgent => &URGENT,
            FlashPattern::Attention => &ATTENTION,
        }
    }
}

/// Drives the lamp and sounder from a risk-engine alert action.
pub struct AlertDriver {
    lamp: Box<dyn FlashLamp + Send>,
    sounder: Box<dyn Sounder + Send>,
}

impl AlertDriver {
    pub fn new(lamp: Box<dyn FlashLamp + Send>, sounder: Box<dyn Sounder + Send>) -> Self {
        Self { lamp, sounder }
    }

    /// Execute one alert action. Safe to call every tick; each call leaves
    /// both outputs at rest before returning, success or failure.
    pub async fn execute(&mut self, action: AlertAction) -> Result<(), AlertError> {
        debug!(?action, "executing alert");
        match action {
            AlertAction::None => Ok(()),
            AlertAction::Flash => self.flash(FlashPattern::Attention).await,
            AlertAction::FlashAndAlarm => {
                // The alarm still runs when the lamp faults; either output
                // alone is better than none.
                let flash = self.flash(FlashPattern::Urgent).await;
                let alarm = self.alarm().await;
                flash.and(alarm)
            }
        }
    }

    async fn flash(&mut self, pattern: FlashPattern) -> Result<(), AlertError> {
        let result = self.run_pattern(pattern).await;
        if result.is_err() {
            // Rest state on fault, even if the safing write itself fails.
            if let Err(e) = self.lamp.set_lit(false) {
                warn!(error = %e, "failed to safe lamp after fault");
            }
        }
        result
    }

    async fn run_pattern(&mut self, pattern: FlashPattern) -> Result<(), AlertError> {
        let mut lit = false;
        for step in pattern.steps() {
            lit = !lit;
            self.lamp.set_lit(lit)?;
            sleep(*step).await;
        }
        self.lamp.set_lit(false)
    }

    async fn alarm(&mut self) -> Result<(), AlertError> {
        self.sounder.set_active(true)?;
        sleep(ALARM_DURATION).await;
        let result = self.sounder.set_active(false);
        if let Err(ref e) = result {
            warn!(error = %e, "failed to silence sounder");
        }
        result
    }
}
