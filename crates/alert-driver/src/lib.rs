//! Alert Driver
//!
//! Turns an alert action into timed actuation of two binary outputs:
//! - Warning flash lamp (urgent and attention blink patterns)
//! - Sounder (fixed-duration alarm)
//!
//! Both outputs are forced back to their rest state after every action,
//! including when actuation fails partway through a pattern.

pub mod driver;
pub mod gpio;

pub use driver::{AlertDriver, FlashLamp, FlashPattern, Sounder};
pub use gpio::{SysfsFlashLamp, SysfsSounder};

use thiserror::Error;

/// Alert actuation error types
#[derive(Error, Debug)]
pub enum AlertError {
    #[error("lamp actuation failed: {0}")]
    Lamp(String),

    #[error("sounder actuation failed: {0}")]
    Sounder(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
