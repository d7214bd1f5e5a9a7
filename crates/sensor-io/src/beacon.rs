//! BLE Beacon Link
//!
//! Drives an AT-command BLE module (AT-09 class) in scanner role and turns
//! its `OK+DISC` responses into distance estimates for the paired token.

use crate::{BeaconReading, BeaconScanner, SensorError};
use std::io::{Read, Write};
use std::time::Duration;
use tokio_serial::SerialPort;
use tracing::{debug, warn};

/// RSSI observed at one meter from the token (dBm).
const MEASURED_POWER_DBM: f64 = -59.0;

/// Path-loss exponent for the log-distance model.
const PATH_LOSS_EXPONENT: f64 = 2.5;

/// RSSI substituted for malformed scan fields (dBm); far enough to never
/// qualify as nearby.
const FALLBACK_RSSI_DBM: i32 = -100;

/// Serial read timeout per scan window.
const READ_TIMEOUT: Duration = Duration::from_millis(500);

/// Estimated distance (meters) from a received signal strength.
///
/// Log-distance model: `d = 10 ^ ((P_1m - rssi) / (10 * n))`.
pub fn distance_from_rssi(rssi_dbm: i32) -> f64 {
    10f64.powf((MEASURED_POWER_DBM - f64::from(rssi_dbm)) / (10.0 * PATH_LOSS_EXPONENT))
}

/// One parsed `OK+DISC` scan response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscResponse {
    pub name: String,
    pub rssi_dbm: i32,
    pub uuid: String,
}

/// Parse a module scan line, e.g. `OK+DISC:HOLY-IOT,-65,FDA50693-A4E2-...`.
///
/// A malformed RSSI field degrades to [`FALLBACK_RSSI_DBM`] instead of
/// dropping the response, so a noisy line still counts as a far sighting.
pub fn parse_disc_line(line: &str) -> Option<DiscResponse> {
    let rest = line.trim().strip_prefix("OK+DISC:")?;
    let mut fields = rest.splitn(3, ',');

    let name = fields.next()?.to_string();
    let rssi_field = fields.next()?;
    let uuid = fields.next()?.to_string();

    let rssi_dbm = rssi_field.trim().parse().unwrap_or(FALLBACK_RSSI_DBM);

    Some(DiscResponse {
        name,
        rssi_dbm,
        uuid,
    })
}

/// Beacon scanner over an AT-command serial module.
pub struct SerialBeaconScanner<P> {
    port: P,
    target_uuid: String,
}

impl SerialBeaconScanner<Box<dyn SerialPort>> {
    /// Open the module on a serial device and put it in scanner role.
    pub fn open(path: &str, baud: u32, target_uuid: impl Into<String>) -> Result<Self, SensorError> {
        let port = tokio_serial::new(path, baud)
            .timeout(READ_TIMEOUT)
            .open()
            .map_err(|e| SensorError::Serial(e.to_string()))?;
        Self::with_port(port, target_uuid)
    }
}

impl<P: Read + Write> SerialBeaconScanner<P> {
    /// Wrap an already-open port and configure the module.
    pub fn with_port(port: P, target_uuid: impl Into<String>) -> Result<Self, SensorError> {
        let mut scanner = Self {
            port,
            target_uuid: target_uuid.into(),
        };
        scanner.configure()?;
        Ok(scanner)
    }

    /// Scanner role, manual scans, then reset to apply.
    fn configure(&mut self) -> Result<(), SensorError> {
        for command in ["AT+ROLE0\r\n", "AT+IMME1\r\n", "AT+RESET\r\n"] {
            self.port.write_all(command.as_bytes())?;
            std::thread::sleep(Duration::from_millis(100));
        }
        // The module drops the link briefly while rebooting.
        std::thread::sleep(Duration::from_secs(1));
        Ok(())
    }

    fn read_scan_window(&mut self) -> String {
        let mut raw = Vec::new();
        let mut chunk = [0u8; 256];
        loop {
            match self.port.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => raw.extend_from_slice(&chunk[..n]),
                Err(e)
                    if e.kind() == std::io::ErrorKind::TimedOut
                        || e.kind() == std::io::ErrorKind::WouldBlock =>
                {
                    break
                }
                Err(e) => {
                    warn!(error = %e, "beacon scan read failed");
                    break;
                }
            }
        }
        String::from_utf8_lossy(&raw).into_owned()
    }
}

impl<P: Read + Write> BeaconScanner for SerialBeaconScanner<P> {
    fn detect(&mut self) -> Result<BeaconReading, SensorError> {
        self.port.write_all(b"AT+DISI?\r\n")?;

        let window = self.read_scan_window();
        for line in window.lines() {
            let Some(response) = parse_disc_line(line) else {
                continue;
            };
            if !response.uuid.contains(&self.target_uuid) {
                continue;
            }

            let distance_m = distance_from_rssi(response.rssi_dbm);
            debug!(
                rssi = response.rssi_dbm,
                distance = distance_m,
                "paired token sighted"
            );
            return Ok(BeaconReading {
                present: true,
                distance_m: Some(distance_m),
            });
        }

        Ok(BeaconReading::absent())
    }
}
