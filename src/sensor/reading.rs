use serde::Serialize;

/// One reading from the device's front-to-back tilt axis
///
/// Platforms may deliver readings without an angle; those count as 0°.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TiltReading {
    pub beta: Option<f32>,
}

impl TiltReading {
    pub fn new(beta: f32) -> Self {
        Self { beta: Some(beta) }
    }

    pub fn missing() -> Self {
        Self { beta: None }
    }

    /// Angle in degrees, with missing or non-finite readings mapped to 0
    pub fn angle(&self) -> f32 {
        match self.beta {
            Some(beta) if beta.is_finite() => beta,
            _ => 0.0,
        }
    }
}

impl From<f32> for TiltReading {
    fn from(beta: f32) -> Self {
        Self::new(beta)
    }
}

impl From<Option<f32>> for TiltReading {
    fn from(beta: Option<f32>) -> Self {
        Self { beta }
    }
}

/// Reading stamped with its arrival time on the trace clock
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimedReading {
    pub t_ms: u64,
    pub reading: TiltReading,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_angle_is_zero() {
        assert_eq!(TiltReading::missing().angle(), 0.0);
        assert_eq!(TiltReading::new(f32::NAN).angle(), 0.0);
        assert_eq!(TiltReading::from(12.5).angle(), 12.5);
    }
}
