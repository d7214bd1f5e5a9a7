//! Supervisory Loop Implementation

use crate::config::SupervisorConfig;
use crate::presence::PresenceDebouncer;
use crate::SupervisorError;
use alert_driver::AlertDriver;
use incident_log::{IncidentRecord, IncidentSink};
use power_control::{PowerController, PowerMode, RailSwitch};
use risk_engine::{RiskEvaluator, RiskLevel, SensorReading};
use sensor_io::{BeaconReading, BeaconScanner, EgoSpeedSource, FollowerVision, RangeFinder};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// The sensing and alerting peripherals that only exist while the rig has
/// been activated at least once. Built lazily on the first activation and
/// kept for the life of the process; sleep mode powers its rails down but
/// the handles stay.
pub struct DetectionRig {
    pub rangefinder: Box<dyn RangeFinder + Send>,
    pub vision: Box<dyn FollowerVision + Send>,
    pub ego_speed: Box<dyn EgoSpeedSource + Send>,
    pub alerts: AlertDriver,
}

/// Factory for the lazily-constructed detection rig.
pub type RigBuilder = Box<dyn FnMut() -> Result<DetectionRig, SupervisorError> + Send>;

/// Tick-based controller tying presence, power and the risk pipeline
/// together. Single-threaded by design: every field is owned here and
/// each tick runs to completion.
pub struct Supervisor {
    config: SupervisorConfig,
    evaluator: RiskEvaluator,
    power: PowerController,
    beacon: Box<dyn BeaconScanner + Send>,
    incidents: Box<dyn IncidentSink + Send>,
    presence: PresenceDebouncer,
    rig: Option<DetectionRig>,
    rig_builder: RigBuilder,
}

impl Supervisor {
    /// Construct the supervisor and drive the rails to sleep. Failure here
    /// is fatal to startup; there is no degraded state without a working
    /// power controller.
    pub fn new(
        config: SupervisorConfig,
        beacon: Box<dyn BeaconScanner + Send>,
        rails: Box<dyn RailSwitch + Send>,
        incidents: Box<dyn IncidentSink + Send>,
        rig_builder: RigBuilder,
    ) -> Result<Self, SupervisorError> {
        let power = PowerController::new(rails, config.battery.clone())?;
        let presence = PresenceDebouncer::new(config.beacon.presence_threshold);
        let evaluator = RiskEvaluator::new(config.risk.clone());
        info!("supervisor initialized in sleep mode");
        Ok(Self {
            config,
            evaluator,
            power,
            beacon,
            incidents,
            presence,
            rig: None,
            rig_builder,
        })
    }

    pub fn power_mode(&self) -> PowerMode {
        self.power.mode()
    }

    pub fn presence_count(&self) -> u32 {
        self.presence.count()
    }

    /// Run until process termination.
    pub async fn run(&mut self) {
        info!("supervisory loop started");
        loop {
            let pause = self.step().await;
            sleep(pause).await;
        }
    }

    /// One control tick plus its failure recovery. Returns the pause to
    /// observe before the next tick: the mode's polling interval on
    /// success, the long backoff after a failure.
    pub async fn step(&mut self) -> Duration {
        match self.tick().await {
            Ok(()) => self.config.cadence.interval_for(self.power.mode()),
            Err(e) => {
                error!(error = %e, "tick failed, forcing sleep");
                // Fail safe: never leave actuators powered after a fault.
                if let Err(e) = self.power.set_mode(PowerMode::Sleep) {
                    error!(error = %e, "could not force sleep mode");
                }
                self.config.cadence.error_backoff()
            }
        }
    }

    async fn tick(&mut self) -> Result<(), SupervisorError> {
        let sample = match self.beacon.detect() {
            Ok(sample) => sample,
            Err(e) => {
                // A failed scan degrades to an absent sample; the debouncer
                // absorbs the noise.
                warn!(error = %e, "beacon scan failed");
                BeaconReading::absent()
            }
        };

        let qualifying = sample.present
            && sample
                .distance_m
                .is_some_and(|d| d <= self.config.beacon.qualify_range_m);
        self.presence.update(qualifying);

        if self.presence.is_armed() {
            if self.power.mode() == PowerMode::Sleep {
                self.activate().await?;
            }
            if self.power.mode() == PowerMode::Active {
                self.surveil().await?;
            }
        } else if self.presence.is_idle() && self.power.mode() != PowerMode::Sleep {
            info!("presence token out of range, entering sleep");
            self.power.set_mode(PowerMode::Sleep)?;
        }

        Ok(())
    }

    /// Staged wake-up: low power first, a warmup pause, then full power.
    /// The detection rig is built exactly once, on the first activation.
    async fn activate(&mut self) -> Result<(), SupervisorError> {
        self.power.set_mode(PowerMode::LowPower)?;
        sleep(self.config.cadence.warmup()).await;

        if self.rig.is_none() {
            self.rig = Some((self.rig_builder)()?);
            debug!("detection rig constructed");
        }

        self.power.set_mode(PowerMode::Active)?;
        info!("system activated, full power");
        Ok(())
    }

    async fn surveil(&mut self) -> Result<(), SupervisorError> {
        let Some(rig) = self.rig.as_mut() else {
            // Active mode implies the rig exists; treat the mismatch as a
            // quiet tick rather than panicking in the control path.
            warn!("active mode without a detection rig");
            return Ok(());
        };

        let distance_m = rig.rangefinder.read_distance()?;
        let ego_speed_kmh = rig.ego_speed.read_ego_speed_kmh();

        let Some(follower) = rig.vision.detect_follower()? else {
            return Ok(());
        };
        if follower.class != self.config.tracked_class {
            return Ok(());
        }

        let reading = SensorReading {
            distance_m,
            ego_speed_kmh,
            follower_speed_kmh: follower.speed_kmh,
        };
        let (level, action) = self.evaluator.evaluate(&reading);
        debug!(?level, ?action, distance = ?distance_m, "risk evaluated");

        if level == RiskLevel::Error {
            warn!("unusable sensor reading, no actuation");
            return Ok(());
        }

        if let Err(e) = rig.alerts.execute(action).await {
            // Actuator already safed itself; the loop carries on.
            warn!(error = %e, "alert actuation failed");
        }

        if level.is_incident() {
            if let Some(distance_m) = distance_m {
                let record = IncidentRecord::now(distance_m, ego_speed_kmh, follower.speed_kmh);
                if let Err(e) = self.incidents.append(&record) {
                    warn!(error = %e, "incident append failed");
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alert_driver::{AlertError, FlashLamp, Sounder};
    use incident_log::IncidentError;
    use power_control::{PowerError, Rail};
    use sensor_io::sim::{
        FaultyRangeFinder, FixedEgoSpeed, FixedRangeFinder, FixedVision, ScriptedBeacon,
    };
    use sensor_io::{FollowerObservation, VehicleClass};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct NullRails;

    impl RailSwitch for NullRails {
        fn set_rail(&mut self, _rail: Rail, _energized: bool) -> Result<(), PowerError> {
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct SharedSink(Arc<Mutex<Vec<IncidentRecord>>>);

    impl IncidentSink for SharedSink {
        fn append(&mut self, record: &IncidentRecord) -> Result<(), IncidentError> {
            self.0.lock().unwrap().push(*record);
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct CountingOutput(Arc<AtomicUsize>);

    impl CountingOutput {
        fn writes(&self) -> usize {
            self.0.load(Ordering::SeqCst)
        }
    }

    impl FlashLamp for CountingOutput {
        fn set_lit(&mut self, _lit: bool) -> Result<(), AlertError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    impl Sounder for CountingOutput {
        fn set_active(&mut self, _active: bool) -> Result<(), AlertError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct Harness {
        supervisor: Supervisor,
        incidents: SharedSink,
        lamp: CountingOutput,
        builds: Arc<AtomicUsize>,
    }

    fn near() -> BeaconReading {
        BeaconReading {
            present: true,
            distance_m: Some(0.8),
        }
    }

    /// Supervisor with scripted beacon samples and a rig whose rangefinder
    /// and vision are fixed per test.
    fn harness(
        samples: Vec<BeaconReading>,
        rangefinder: impl Fn() -> Box<dyn RangeFinder + Send> + Send + 'static,
        vision: FixedVision,
    ) -> Harness {
        let incidents = SharedSink::default();
        let lamp = CountingOutput::default();
        let builds = Arc::new(AtomicUsize::new(0));

        let observation = vision.observation;
        let builder_lamp = lamp.clone();
        let builder_builds = builds.clone();
        let rig_builder: RigBuilder = Box::new(move || {
            builder_builds.fetch_add(1, Ordering::SeqCst);
            Ok(DetectionRig {
                rangefinder: rangefinder(),
                vision: Box::new(FixedVision::new(observation)),
                ego_speed: Box::new(FixedEgoSpeed(60.0)),
                alerts: AlertDriver::new(
                    Box::new(builder_lamp.clone()),
                    Box::new(CountingOutput::default()),
                ),
            })
        });

        let supervisor = Supervisor::new(
            SupervisorConfig::default(),
            Box::new(ScriptedBeacon::new(samples)),
            Box::new(NullRails),
            Box::new(incidents.clone()),
            rig_builder,
        )
        .unwrap();

        Harness {
            supervisor,
            incidents,
            lamp,
            builds,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounced_activation() {
        let mut h = harness(
            vec![near(); 5],
            || Box::new(FixedRangeFinder::new(Some(200.0))),
            FixedVision::truck(60.0),
        );

        h.supervisor.step().await;
        assert_eq!(h.supervisor.power_mode(), PowerMode::Sleep);
        h.supervisor.step().await;
        assert_eq!(h.supervisor.power_mode(), PowerMode::Sleep);

        // Third qualifying sample arms the debouncer and wakes the rig.
        h.supervisor.step().await;
        assert_eq!(h.supervisor.power_mode(), PowerMode::Active);
        assert_eq!(h.builds.load(Ordering::SeqCst), 1);

        // The rig is built exactly once across further ticks.
        h.supervisor.step().await;
        assert_eq!(h.builds.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_decay_to_zero_sleeps() {
        let mut samples = vec![near(); 3];
        samples.extend(vec![BeaconReading::absent(); 4]);
        let mut h = harness(
            samples,
            || Box::new(FixedRangeFinder::new(Some(200.0))),
            FixedVision::truck(60.0),
        );

        for _ in 0..3 {
            h.supervisor.step().await;
        }
        assert_eq!(h.supervisor.power_mode(), PowerMode::Active);

        // Decay 3 -> 2 -> 1: still active, not yet idle.
        h.supervisor.step().await;
        h.supervisor.step().await;
        assert_eq!(h.supervisor.power_mode(), PowerMode::Active);

        // Reaching zero drops to sleep.
        h.supervisor.step().await;
        assert_eq!(h.supervisor.power_mode(), PowerMode::Sleep);
        assert_eq!(h.supervisor.presence_count(), 0);

        // Further absences stay floored at zero.
        h.supervisor.step().await;
        assert_eq!(h.supervisor.presence_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_danger_approach_alerts_and_logs() {
        let mut h = harness(
            vec![near(); 6],
            || Box::new(FixedRangeFinder::new(Some(10.0))),
            FixedVision::truck(62.0),
        );

        for _ in 0..4 {
            h.supervisor.step().await;
        }

        // Danger band, slow closing: lamp pattern ran, incident logged.
        assert!(h.lamp.writes() > 0);
        assert!(!h.incidents.0.lock().unwrap().is_empty());
        let record = h.incidents.0.lock().unwrap()[0];
        assert!((record.distance_m - 10.0).abs() < 1e-9);
        assert!((record.follower_speed_kmh - 62.0).abs() < 1e-9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_range_reading_suppresses_actuation() {
        let mut h = harness(
            vec![near(); 6],
            || Box::new(FixedRangeFinder::new(None)),
            FixedVision::truck(90.0),
        );

        for _ in 0..5 {
            h.supervisor.step().await;
        }

        // Error classification: no actuation, no incidents, still active.
        assert_eq!(h.lamp.writes(), 0);
        assert!(h.incidents.0.lock().unwrap().is_empty());
        assert_eq!(h.supervisor.power_mode(), PowerMode::Active);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sensor_fault_forces_sleep_without_alerting() {
        let mut h = harness(
            vec![near(); 6],
            || Box::new(FaultyRangeFinder),
            FixedVision::truck(90.0),
        );

        h.supervisor.step().await;
        h.supervisor.step().await;

        // Third tick activates, then the rangefinder fault aborts the tick.
        let pause = h.supervisor.step().await;
        assert_eq!(h.supervisor.power_mode(), PowerMode::Sleep);
        assert_eq!(pause, crate::config::CadenceConfig::default().error_backoff());
        assert_eq!(h.lamp.writes(), 0);
        assert!(h.incidents.0.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_untracked_follower_is_ignored() {
        let mut h = harness(
            vec![near(); 6],
            || Box::new(FixedRangeFinder::new(Some(4.0))),
            FixedVision::new(Some(FollowerObservation {
                class: VehicleClass::Car,
                speed_kmh: 120.0,
            })),
        );

        for _ in 0..5 {
            h.supervisor.step().await;
        }

        assert_eq!(h.lamp.writes(), 0);
        assert!(h.incidents.0.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cadence_follows_mode() {
        let mut h = harness(
            vec![near(); 6],
            || Box::new(FixedRangeFinder::new(Some(200.0))),
            FixedVision::truck(60.0),
        );

        let sleeping = h.supervisor.step().await;
        assert_eq!(sleeping, Duration::from_millis(1000));

        h.supervisor.step().await;
        let active = h.supervisor.step().await;
        assert_eq!(active, Duration::from_millis(100));
    }
}
