//! Default tuning constants for gesture detection
//!
//! Angles are in degrees relative to the calibration baseline; times are in
//! milliseconds on the engine clock.

/// Deviation at or below which the device is considered level.
pub const DEFAULT_NEUTRAL_THRESHOLD: f32 = 15.0;

/// Deviation above which a tilt counts as a deliberate gesture.
pub const DEFAULT_ACTION_THRESHOLD: f32 = 45.0;

/// Number of raw readings averaged by the smoothing filter.
pub const DEFAULT_SMOOTHING_WINDOW: usize = 5;

/// Minimum time between two dispatched actions.
pub const DEFAULT_MIN_ACTION_INTERVAL_MS: u64 = 1000;

/// Delay after returning to neutral before the processing flag clears.
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 500;

/// Per-subscriber queue depth on the sensor bus. Readings beyond this are dropped.
pub const SENSOR_QUEUE_CAPACITY: usize = 64;
