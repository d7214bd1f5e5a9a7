//! Rearguard - Main Entry Point

use anyhow::Context;
use incident_log::FileIncidentSink;
use power_control::SysfsRailSwitch;
use rearguard::{init_logging, rig, Supervisor, SupervisorConfig};
use sensor_io::SerialBeaconScanner;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    info!("=== Rearguard v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Starting rear-collision warning supervisor...");

    let config_path = std::env::args().nth(1);
    let config = SupervisorConfig::load(config_path.as_deref()).context("loading configuration")?;

    // Startup construction is the only fatal path; everything after this
    // degrades in place.
    let beacon = SerialBeaconScanner::open(
        &config.beacon.port,
        config.beacon.baud,
        config.beacon.target_uuid.clone(),
    )
    .context("initializing beacon module")?;
    let rails = SysfsRailSwitch::new(config.gpio_root.clone(), SysfsRailSwitch::default_mapping());
    let incidents = FileIncidentSink::new(config.incident_log.clone());
    let rig_builder = rig::bench_rig_builder(&config);

    let mut supervisor = Supervisor::new(
        config,
        Box::new(beacon),
        Box::new(rails),
        Box::new(incidents),
        rig_builder,
    )
    .context("initializing power control")?;

    supervisor.run().await;

    Ok(())
}
