use std::fs;
use std::path::Path;

use super::TimedReading;
use super::trace::parse_trace;
use crate::error::Result;

/// Pull-based supplier of timestamped tilt readings
pub trait TiltSource {
    fn next_reading(&mut self) -> Result<Option<TimedReading>>;
}

/// Replays a recorded trace file
pub struct TraceFileSource {
    readings: Vec<TimedReading>,
    position: usize,
}

impl TraceFileSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_str(&content)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        Ok(Self::from_readings(parse_trace(content)?))
    }

    pub fn from_readings(readings: Vec<TimedReading>) -> Self {
        Self {
            readings,
            position: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

impl TiltSource for TraceFileSource {
    fn next_reading(&mut self) -> Result<Option<TimedReading>> {
        let reading = self.readings.get(self.position).copied();
        if reading.is_some() {
            self.position += 1;
        }
        Ok(reading)
    }
}
