use rand::RngExt;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use crate::error::{Result, TiltError};
use crate::sensor::{TiltReading, TimedReading};

/// Sensor imperfections applied on top of a clean script
#[derive(Clone, Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct TraceNoiseConfig {
    pub seed: Option<u64>,
    /// Standard deviation of Gaussian angle jitter in degrees
    pub jitter_std_deg: f32,
    /// Probability that a reading arrives without an angle
    pub dropout_probability: f32,
}

impl TraceNoiseConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.jitter_std_deg >= 0.0 && self.jitter_std_deg.is_finite()) {
            return Err(TiltError::Config(format!(
                "jitter must be a non-negative number of degrees, got {}",
                self.jitter_std_deg
            )));
        }
        if !(0.0..=1.0).contains(&self.dropout_probability) {
            return Err(TiltError::Config(format!(
                "dropout probability must be within 0..=1, got {}",
                self.dropout_probability
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureDirection {
    Up,
    Down,
}

impl std::str::FromStr for GestureDirection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "u" | "correct" => Ok(Self::Up),
            "down" | "d" | "skip" => Ok(Self::Down),
            other => Err(format!("unknown gesture: {}", other)),
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Segment {
    Hold { angle: f32, duration_ms: u64 },
    Ramp { to: f32, duration_ms: u64 },
}

/// Piecewise tilt-angle script sampled into a synthetic trace
///
/// # Example
/// ```
/// use tiltguess::simulation::{GestureDirection, TraceScript};
///
/// let trace = TraceScript::new(0.0)
///     .hold(0.0, 500)
///     .gesture(GestureDirection::Up, 70.0, 400)
///     .generate();
/// assert!(!trace.is_empty());
/// ```
#[derive(Clone, Debug)]
pub struct TraceScript {
    start_angle: f32,
    segments: Vec<Segment>,
    sample_interval_ms: u64,
    noise: TraceNoiseConfig,
}

/// Time to tilt from level to a gesture angle and back
const GESTURE_RAMP_MS: u64 = 150;

/// Level pause after each scripted gesture
const GESTURE_REST_MS: u64 = 1200;

impl TraceScript {
    pub fn new(start_angle: f32) -> Self {
        Self {
            start_angle,
            segments: Vec::new(),
            sample_interval_ms: 20,
            noise: TraceNoiseConfig::default(),
        }
    }

    pub fn sample_interval_ms(mut self, interval_ms: u64) -> Self {
        self.sample_interval_ms = interval_ms.max(1);
        self
    }

    pub fn hold(mut self, angle: f32, duration_ms: u64) -> Self {
        self.segments.push(Segment::Hold { angle, duration_ms });
        self
    }

    pub fn ramp(mut self, to: f32, duration_ms: u64) -> Self {
        self.segments.push(Segment::Ramp { to, duration_ms });
        self
    }

    /// Tilt away from the starting level, hold, come back and rest
    pub fn gesture(self, direction: GestureDirection, amplitude: f32, hold_ms: u64) -> Self {
        let level = self.start_angle;
        let peak = match direction {
            GestureDirection::Up => level + amplitude.abs(),
            GestureDirection::Down => level - amplitude.abs(),
        };
        self.ramp(peak, GESTURE_RAMP_MS)
            .hold(peak, hold_ms)
            .ramp(level, GESTURE_RAMP_MS)
            .hold(level, GESTURE_REST_MS)
    }

    pub fn jitter(mut self, std_dev_deg: f32) -> Self {
        self.noise.jitter_std_deg = std_dev_deg.max(0.0);
        self
    }

    pub fn dropouts(mut self, probability: f32) -> Self {
        self.noise.dropout_probability = probability.clamp(0.0, 1.0);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.noise.seed = Some(seed);
        self
    }

    /// Apply a whole noise configuration, clamped like `jitter` and `dropouts`
    pub fn with_noise(mut self, noise: TraceNoiseConfig) -> Self {
        self.noise.seed = noise.seed;
        self.jitter(noise.jitter_std_deg)
            .dropouts(noise.dropout_probability)
    }

    pub fn duration_ms(&self) -> u64 {
        self.segments
            .iter()
            .map(|s| match s {
                Segment::Hold { duration_ms, .. } | Segment::Ramp { duration_ms, .. } => {
                    *duration_ms
                }
            })
            .sum()
    }

    /// Noise-free angle at time `t_ms`
    pub fn angle_at(&self, t_ms: u64) -> f32 {
        let mut level = self.start_angle;
        let mut segment_start = 0;

        for segment in &self.segments {
            match *segment {
                Segment::Hold { angle, duration_ms } => {
                    if t_ms < segment_start + duration_ms {
                        return angle;
                    }
                    level = angle;
                    segment_start += duration_ms;
                }
                Segment::Ramp { to, duration_ms } => {
                    if t_ms < segment_start + duration_ms {
                        let frac = (t_ms - segment_start) as f32 / duration_ms as f32;
                        return level + (to - level) * frac;
                    }
                    level = to;
                    segment_start += duration_ms;
                }
            }
        }
        level
    }

    /// Sample the script into timestamped readings
    pub fn generate(&self) -> Vec<TimedReading> {
        let mut rng = create_rng(self.noise.seed);
        let jitter = if self.noise.jitter_std_deg > 0.0 {
            Normal::new(0.0, self.noise.jitter_std_deg as f64).ok()
        } else {
            None
        };

        let duration = self.duration_ms();
        let mut readings = Vec::with_capacity((duration / self.sample_interval_ms) as usize + 1);

        let mut t_ms = 0;
        while t_ms <= duration {
            let dropped = self.noise.dropout_probability > 0.0
                && rng.random::<f32>() < self.noise.dropout_probability;

            let reading = if dropped {
                TiltReading::missing()
            } else {
                let noise = jitter.as_ref().map_or(0.0, |n| n.sample(&mut rng) as f32);
                TiltReading::new(self.angle_at(t_ms) + noise)
            };

            readings.push(TimedReading { t_ms, reading });
            t_ms += self.sample_interval_ms;
        }

        readings
    }
}

fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => rand::make_rng(),
    }
}
