use serde::Serialize;

use crate::action::ActionSink;
use crate::clock::{Clock, SystemClock};
use crate::config::{GestureConfig, Thresholds};
use crate::error::Result;
use crate::gesture::{CalibrationManager, DebounceState, GestureStateMachine, Position, TiltAction};
use crate::permission::{CapabilityGate, PermissionProvider};
use crate::sensor::{SensorBus, SensorSubscription, TiltReading};
use crate::signal_processing::SmoothingFilter;

/// What the engine did with one reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SampleOutcome {
    /// Raw angle after missing-value substitution
    pub raw: f32,
    /// Moving-average angle
    pub smoothed: f32,
    /// Smoothed angle relative to the baseline
    pub delta: f32,
    pub previous: Position,
    pub position: Position,
    pub action: Option<TiltAction>,
    /// The reading was consumed as the new calibration baseline
    pub calibration: bool,
}

impl SampleOutcome {
    pub fn position_changed(&self) -> bool {
        self.previous != self.position
    }
}

/// Read-only view for on-screen feedback; never an input to detection
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GestureSnapshot {
    pub position: Position,
    pub last_raw: f32,
    pub smoothed: f32,
    pub baseline: f32,
    pub calibrated: bool,
    pub calibration_pending: bool,
    /// A return to neutral is waiting out the settle delay
    pub settle_pending: bool,
    pub enabled: bool,
    pub motion_available: bool,
}

enum Session {
    Idle,
    /// Readings arrive through a bus subscription and are consumed by `pump`
    Subscribed(SensorSubscription),
    /// The host pushes readings with `handle_reading`
    Direct,
}

/// Tilt gesture engine for one game round
///
/// Owns all detection state: smoothing window, baseline, position, debounce
/// flags and the settle timer. Readings are processed one at a time to
/// completion. Dispatched gestures are delivered to the `ActionSink`.
///
/// Lifecycle:
/// - `request_permission` opens the capability gate and, on success, arms a
///   calibration for the next reading
/// - `enable` subscribes to the sensor bus; refused while the gate is closed
/// - `calibrate` arms a one-shot baseline capture
/// - `disable` detaches from the bus and drops any pending settle deadline,
///   leaving position, baseline and debounce state as they were
pub struct TiltEngine<S: ActionSink, C: Clock = SystemClock> {
    config: GestureConfig,
    gate: CapabilityGate,
    calibration: CalibrationManager,
    filter: SmoothingFilter,
    machine: GestureStateMachine,
    session: Session,
    sink: S,
    clock: C,
    last_raw: f32,
}

impl<S: ActionSink> TiltEngine<S, SystemClock> {
    pub fn new(config: GestureConfig, sink: S) -> Result<Self> {
        Self::with_clock(config, sink, SystemClock::new())
    }
}

impl<S: ActionSink, C: Clock> TiltEngine<S, C> {
    /// Create an engine with an explicit time source
    ///
    /// The capability gate starts open; call `probe_capability` on
    /// platforms that may gate orientation events.
    pub fn with_clock(config: GestureConfig, sink: S, clock: C) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            filter: SmoothingFilter::new(config.smoothing_window),
            machine: GestureStateMachine::new(&config),
            calibration: CalibrationManager::new(),
            gate: CapabilityGate::open(),
            session: Session::Idle,
            config,
            sink,
            clock,
            last_raw: 0.0,
        })
    }

    /// Replace the capability gate with the platform's probe result
    pub fn probe_capability(&mut self, provider: &dyn PermissionProvider) {
        self.gate = CapabilityGate::probe(provider);
        if !self.gate.is_open() {
            log::info!("Motion events require permission");
        }
    }

    /// Ask for motion access; on success, arm an implicit calibration
    ///
    /// Returns whether motion is available. Denials and platform errors are
    /// logged and leave the engine unable to enable; the call may be retried.
    pub fn request_permission(&mut self, provider: &mut dyn PermissionProvider) -> bool {
        if self.gate.request(provider) {
            self.calibrate();
            true
        } else {
            false
        }
    }

    /// Start consuming readings from `bus`
    pub fn enable(&mut self, bus: &SensorBus) -> bool {
        if !self.can_enable() {
            return false;
        }
        if !matches!(self.session, Session::Subscribed(_)) {
            self.session = Session::Subscribed(bus.subscribe());
        }
        self.config.enabled = true;
        true
    }

    /// Start accepting readings pushed through `handle_reading`
    pub fn enable_direct(&mut self) -> bool {
        if !self.can_enable() {
            return false;
        }
        self.session = Session::Direct;
        self.config.enabled = true;
        true
    }

    fn can_enable(&self) -> bool {
        if self.gate.is_open() {
            true
        } else {
            log::warn!("Motion controls not enabled: permission not granted");
            false
        }
    }

    /// Stop consuming readings and detach from the bus
    pub fn disable(&mut self) {
        self.session = Session::Idle;
        self.machine.cancel_timers();
        self.config.enabled = false;
    }

    /// Enable or disable to match `enabled`
    pub fn set_enabled(&mut self, enabled: bool, bus: &SensorBus) -> bool {
        if enabled {
            self.enable(bus)
        } else {
            self.disable();
            false
        }
    }

    /// Apply the configured `enabled` flag
    pub fn sync_enabled(&mut self, bus: &SensorBus) -> bool {
        self.set_enabled(self.config.enabled, bus)
    }

    /// Arm a one-shot baseline capture for the next reading
    ///
    /// Returns `false` when a capture was already pending.
    pub fn calibrate(&mut self) -> bool {
        self.calibration.request()
    }

    /// Change thresholds mid-session; effective from the next reading
    pub fn set_thresholds(&mut self, thresholds: Thresholds) -> Result<()> {
        thresholds.validate()?;
        self.config.set_thresholds(thresholds);
        self.machine.set_thresholds(thresholds);
        Ok(())
    }

    /// Process every reading queued on the bus subscription, oldest first
    pub fn pump(&mut self) -> Vec<SampleOutcome> {
        let readings = match &self.session {
            Session::Subscribed(subscription) => subscription.drain(),
            _ => return Vec::new(),
        };

        readings
            .into_iter()
            .filter_map(|reading| self.handle_reading(reading))
            .collect()
    }

    /// Process one reading to completion
    ///
    /// Returns `None` while disabled. A pending calibration consumes the
    /// reading as the new baseline instead of classifying it.
    pub fn handle_reading(&mut self, reading: TiltReading) -> Option<SampleOutcome> {
        if matches!(self.session, Session::Idle) {
            return None;
        }

        let now_ms = self.clock.now_ms();
        let raw = reading.angle();
        self.last_raw = raw;
        let previous = self.machine.position();

        if self
            .calibration
            .try_complete(raw, &mut self.filter, &mut self.machine)
        {
            return Some(SampleOutcome {
                raw,
                smoothed: self.filter.latest(),
                delta: 0.0,
                previous,
                position: self.machine.position(),
                action: None,
                calibration: true,
            });
        }

        let smoothed = self.filter.observe(raw);
        let delta = self.calibration.delta(smoothed);
        log::trace!(
            "t={} ms raw={:.1}° smoothed={:.1}° delta={:.1}°",
            now_ms,
            raw,
            smoothed,
            delta
        );

        let transition = self.machine.on_sample(delta, now_ms);
        if let Some(action) = transition.action {
            self.sink.dispatch(action);
        }

        Some(SampleOutcome {
            raw,
            smoothed,
            delta,
            previous: transition.previous,
            position: transition.position,
            action: transition.action,
            calibration: false,
        })
    }

    /// Fire the settle timer if due, without waiting for the next reading
    pub fn poll_timers(&mut self) -> bool {
        self.machine.poll(self.clock.now_ms())
    }

    pub fn snapshot(&self) -> GestureSnapshot {
        GestureSnapshot {
            position: self.machine.position(),
            last_raw: self.last_raw,
            smoothed: self.filter.latest(),
            baseline: self.calibration.baseline(),
            calibrated: self.calibration.is_calibrated(),
            calibration_pending: self.calibration.is_pending(),
            settle_pending: self.machine.settle_pending(),
            enabled: self.is_enabled(),
            motion_available: self.gate.is_open(),
        }
    }

    pub fn position(&self) -> Position {
        self.machine.position()
    }

    pub fn debounce(&self) -> &DebounceState {
        self.machine.debounce()
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self.session, Session::Idle)
    }

    pub fn motion_available(&self) -> bool {
        self.gate.is_open()
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Direct access for manual controls that share the gesture entry points
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionRecorder;
    use crate::clock::ManualClock;
    use crate::permission::{NoPermissionRequired, PermissionStatus};

    struct Gated(PermissionStatus);

    impl PermissionProvider for Gated {
        fn requires_permission(&self) -> bool {
            true
        }

        fn request_permission(&mut self) -> Result<PermissionStatus> {
            Ok(self.0)
        }
    }

    fn engine() -> (TiltEngine<ActionRecorder, ManualClock>, ManualClock) {
        let clock = ManualClock::new(0);
        let engine =
            TiltEngine::with_clock(GestureConfig::default(), ActionRecorder::new(), clock.clone())
                .unwrap();
        (engine, clock)
    }

    #[test]
    fn test_initial_snapshot() {
        let (engine, _) = engine();
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.position, Position::Neutral);
        assert_eq!(snapshot.last_raw, 0.0);
        assert_eq!(snapshot.smoothed, 0.0);
        assert!(!snapshot.enabled);
        assert!(!snapshot.calibrated);
        assert!(snapshot.motion_available);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = GestureConfig::default();
        config.neutral_threshold = 50.0;
        assert!(TiltEngine::new(config, ActionRecorder::new()).is_err());
    }

    #[test]
    fn test_disabled_engine_ignores_readings() {
        let (mut engine, _) = engine();
        assert!(engine.handle_reading(TiltReading::new(90.0)).is_none());
        assert_eq!(engine.snapshot().last_raw, 0.0);
    }

    #[test]
    fn test_calibration_consumes_reading() {
        let (mut engine, _) = engine();
        engine.enable_direct();
        engine.calibrate();

        let outcome = engine.handle_reading(TiltReading::new(10.0)).unwrap();
        assert!(outcome.calibration);
        assert_eq!(outcome.position, Position::Neutral);

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.baseline, 10.0);
        assert_eq!(snapshot.smoothed, 10.0);
        assert!(snapshot.calibrated);
        assert!(!snapshot.calibration_pending);
    }

    #[test]
    fn test_gated_platform_refuses_enable_until_granted() {
        let (mut engine, _) = engine();
        let bus = SensorBus::new();

        let mut denied = Gated(PermissionStatus::Denied);
        engine.probe_capability(&denied);
        assert!(!engine.enable(&bus));
        assert_eq!(bus.listener_count(), 0);

        assert!(!engine.request_permission(&mut denied));
        assert!(!engine.snapshot().calibration_pending);

        let mut granted = Gated(PermissionStatus::Granted);
        assert!(engine.request_permission(&mut granted));
        assert!(engine.snapshot().calibration_pending);
        assert!(engine.enable(&bus));
        assert_eq!(bus.listener_count(), 1);
    }

    #[test]
    fn test_ungated_request_calibrates() {
        let (mut engine, _) = engine();
        let mut provider = NoPermissionRequired;
        engine.probe_capability(&provider);
        assert!(engine.request_permission(&mut provider));
        assert!(engine.snapshot().calibration_pending);
    }

    #[test]
    fn test_manual_controls_share_sink() {
        let (mut engine, _) = engine();
        engine.sink_mut().on_tilt_up();
        engine.sink_mut().on_tilt_down();
        assert_eq!(
            engine.into_sink().actions(),
            &[TiltAction::Correct, TiltAction::Skip]
        );
    }

    #[test]
    fn test_set_thresholds_validates() {
        let (mut engine, _) = engine();
        assert!(engine.set_thresholds(Thresholds { neutral: 40.0, action: 20.0 }).is_err());
        assert!(engine.set_thresholds(Thresholds::new(5.0, 20.0).unwrap()).is_ok());
        assert_eq!(engine.config().action_threshold, 20.0);
    }

    #[test]
    fn test_sync_enabled_follows_config() {
        let clock = ManualClock::new(0);
        let mut config = GestureConfig::default();
        config.enabled = true;
        let mut engine = TiltEngine::with_clock(config, ActionRecorder::new(), clock).unwrap();
        let bus = SensorBus::new();

        assert!(engine.sync_enabled(&bus));
        assert!(engine.is_enabled());
        assert!(!engine.set_enabled(false, &bus));
        assert_eq!(bus.listener_count(), 0);
    }
}
