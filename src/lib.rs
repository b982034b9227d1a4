pub mod action;
pub mod clock;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod gesture;
pub mod output;
pub mod permission;
pub mod sensor;
pub mod signal_processing;

#[cfg(feature = "simulation")]
pub mod simulation;

pub use action::{ActionRecorder, ActionSink, CallbackSink};
pub use config::{GestureConfig, Thresholds};
pub use engine::{GestureSnapshot, SampleOutcome, TiltEngine};
pub use error::{Result, TiltError};
pub use gesture::{Position, TiltAction};
pub use sensor::{SensorBus, TiltReading};
