#![allow(dead_code)]

use tiltguess::action::ActionRecorder;
use tiltguess::clock::ManualClock;
use tiltguess::config::GestureConfig;
use tiltguess::sensor::{SensorBus, TiltReading, TimedReading};
use tiltguess::{SampleOutcome, TiltAction, TiltEngine};

/// Engine wired to a sensor bus and a manual clock
pub struct Harness {
    pub engine: TiltEngine<ActionRecorder, ManualClock>,
    pub clock: ManualClock,
    pub bus: SensorBus,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(GestureConfig::default())
    }

    pub fn with_config(config: GestureConfig) -> Self {
        let clock = ManualClock::new(0);
        let bus = SensorBus::new();
        let mut engine =
            TiltEngine::with_clock(config, ActionRecorder::new(), clock.clone()).unwrap();
        assert!(engine.enable(&bus));
        Self { engine, clock, bus }
    }

    /// Calibrate against `angle` at time `t_ms`
    pub fn calibrate(&mut self, t_ms: u64, angle: f32) {
        self.engine.calibrate();
        let outcomes = self.feed(t_ms, &[angle]);
        assert!(outcomes[0].calibration);
    }

    /// Publish readings at `t_ms` and process them
    pub fn feed(&mut self, t_ms: u64, angles: &[f32]) -> Vec<SampleOutcome> {
        self.clock.set(t_ms);
        for &angle in angles {
            self.bus.publish(TiltReading::new(angle));
        }
        self.engine.pump()
    }

    /// Publish the same reading `count` times at `t_ms`
    pub fn hold(&mut self, t_ms: u64, angle: f32, count: usize) -> Vec<SampleOutcome> {
        self.feed(t_ms, &vec![angle; count])
    }

    /// Replay timestamped readings one at a time
    pub fn replay(&mut self, readings: &[TimedReading]) -> Vec<SampleOutcome> {
        let mut outcomes = Vec::new();
        for r in readings {
            self.clock.set(r.t_ms);
            self.bus.publish(r.reading);
            outcomes.extend(self.engine.pump());
        }
        outcomes
    }

    pub fn actions(&self) -> &[TiltAction] {
        self.engine.sink().actions()
    }

    pub fn count(&self, action: TiltAction) -> usize {
        self.engine.sink().count(action)
    }

    /// Publish raw readings (possibly without an angle) at `t_ms`
    pub fn feed_readings(&mut self, t_ms: u64, readings: &[TiltReading]) -> Vec<SampleOutcome> {
        self.clock.set(t_ms);
        for &reading in readings {
            self.bus.publish(reading);
        }
        self.engine.pump()
    }
}
