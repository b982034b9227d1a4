use std::fmt;

use serde::Serialize;

/// Classified device position relative to the calibration baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    #[default]
    Neutral,
    Up,
    Down,
}

impl Position {
    /// Action-zone position for a baseline-relative delta.
    ///
    /// Exactly zero maps to `Down`; it can only reach here with a negative
    /// action threshold, which validation forbids.
    pub fn from_delta(delta: f32) -> Self {
        if delta > 0.0 { Self::Up } else { Self::Down }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Game action produced by a dispatched gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TiltAction {
    /// Tilted up: the word was guessed
    Correct,
    /// Tilted down: the word was passed
    Skip,
}

impl TiltAction {
    pub fn for_position(position: Position) -> Option<Self> {
        match position {
            Position::Up => Some(Self::Correct),
            Position::Down => Some(Self::Skip),
            Position::Neutral => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Correct => "correct",
            Self::Skip => "skip",
        }
    }
}

impl fmt::Display for TiltAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
