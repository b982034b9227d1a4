//! Configuration for the tilt gesture engine.
//!
//! ## Thresholds
//!
//! Tilt is measured as the smoothed deviation from the calibration baseline.
//! Deviations at or below `neutral_threshold` are "level", deviations above
//! `action_threshold` are gestures, and the band in between is a dead zone
//! that never dispatches anything:
//!
//! ```ignore
//! |delta| <= 15°         neutral
//! 15° < |delta| <= 45°   dead zone
//! |delta| > 45°          up (delta > 0) / down
//! ```

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::constants::{
    DEFAULT_ACTION_THRESHOLD, DEFAULT_MIN_ACTION_INTERVAL_MS, DEFAULT_NEUTRAL_THRESHOLD,
    DEFAULT_SETTLE_DELAY_MS, DEFAULT_SMOOTHING_WINDOW,
};
use crate::error::{Result, TiltError};

/// Neutral/action threshold pair in degrees
///
/// Invariant: `0 <= neutral < action`, both finite.
///
/// # Parsing formats
/// - `15/45` - neutral 15°, action 45°
/// - `15,45` - same, comma separated
///
/// # Example
/// ```
/// use tiltguess::config::Thresholds;
///
/// let t: Thresholds = "10/30".parse().unwrap();
/// assert_eq!(t.neutral, 10.0);
/// assert_eq!(t.action, 30.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub neutral: f32,
    pub action: f32,
}

impl Thresholds {
    /// Create a validated threshold pair
    pub fn new(neutral: f32, action: f32) -> Result<Self> {
        let thresholds = Self { neutral, action };
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.neutral.is_finite() || !self.action.is_finite() {
            return Err(TiltError::Config("thresholds must be finite".into()));
        }
        if self.neutral < 0.0 {
            return Err(TiltError::Config(format!(
                "neutral threshold must be non-negative, got {}",
                self.neutral
            )));
        }
        if self.neutral >= self.action {
            return Err(TiltError::Config(format!(
                "neutral threshold ({}) must be below action threshold ({})",
                self.neutral, self.action
            )));
        }
        Ok(())
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            neutral: DEFAULT_NEUTRAL_THRESHOLD,
            action: DEFAULT_ACTION_THRESHOLD,
        }
    }
}

impl fmt::Display for Thresholds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.neutral, self.action)
    }
}

impl FromStr for Thresholds {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        let (neutral, action) = s
            .split_once('/')
            .or_else(|| s.split_once(','))
            .ok_or_else(|| format!("expected NEUTRAL/ACTION, got: {}", s))?;

        let neutral: f32 = neutral
            .trim()
            .parse()
            .map_err(|_| format!("invalid neutral threshold: {}", neutral))?;
        let action: f32 = action
            .trim()
            .parse()
            .map_err(|_| format!("invalid action threshold: {}", action))?;

        Self::new(neutral, action).map_err(|e| e.to_string())
    }
}

/// Gesture engine configuration
///
/// Use `GestureConfig::default()` for the game's standard tuning, or load
/// overrides from TOML. Missing keys fall back to defaults.
///
/// # Example
/// ```
/// use tiltguess::config::GestureConfig;
///
/// let config = GestureConfig::from_toml_str("neutral_threshold = 10.0").unwrap();
/// assert_eq!(config.neutral_threshold, 10.0);
/// assert_eq!(config.action_threshold, 45.0);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Deviation in degrees at or below which the device is neutral
    pub neutral_threshold: f32,
    /// Deviation in degrees above which a tilt is a gesture
    pub action_threshold: f32,
    /// Number of raw readings in the moving average
    pub smoothing_window: usize,
    /// Minimum milliseconds between two dispatched actions
    pub min_action_interval_ms: u64,
    /// Milliseconds after a return to neutral before a new action may arm
    pub settle_delay_ms: u64,
    /// Whether the engine should be listening for readings
    pub enabled: bool,
}

impl GestureConfig {
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            neutral: self.neutral_threshold,
            action: self.action_threshold,
        }
    }

    pub fn set_thresholds(&mut self, thresholds: Thresholds) {
        self.neutral_threshold = thresholds.neutral;
        self.action_threshold = thresholds.action;
    }

    pub fn validate(&self) -> Result<()> {
        self.thresholds().validate()?;
        if self.smoothing_window == 0 {
            return Err(TiltError::Config(
                "smoothing window must hold at least one reading".into(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| TiltError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            neutral_threshold: DEFAULT_NEUTRAL_THRESHOLD,
            action_threshold: DEFAULT_ACTION_THRESHOLD,
            smoothing_window: DEFAULT_SMOOTHING_WINDOW,
            min_action_interval_ms: DEFAULT_MIN_ACTION_INTERVAL_MS,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            enabled: false,
        }
    }
}
