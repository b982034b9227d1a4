/// Bounded moving-average filter for raw tilt angles
///
/// Keeps the most recent `capacity` readings in a circular buffer and reports
/// their arithmetic mean. Until the window has filled, the mean is taken over
/// the readings seen so far rather than padding with zeros, so the first
/// reading after a reset is passed through unchanged.
pub struct SmoothingFilter {
    buffer: Vec<f32>,
    index: usize,
    filled: bool,
    latest: f32,
}

impl SmoothingFilter {
    /// Create a new smoothing filter
    ///
    /// # Arguments
    /// * `capacity` - Number of readings to average (clamped to at least 1)
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![0.0; capacity.max(1)],
            index: 0,
            filled: false,
            latest: 0.0,
        }
    }

    /// Add a raw angle and return the updated smoothed angle
    ///
    /// The oldest reading is evicted once the window is full.
    pub fn observe(&mut self, raw_angle: f32) -> f32 {
        self.buffer[self.index] = raw_angle;
        self.index = (self.index + 1) % self.buffer.len();

        if self.index == 0 {
            self.filled = true;
        }

        self.latest = self.average();
        self.latest
    }

    /// Mean of the readings currently in the window (0 when empty)
    pub fn average(&self) -> f32 {
        let count = self.len();
        if count == 0 {
            return 0.0;
        }
        let sum: f32 = if self.filled {
            self.buffer.iter().sum()
        } else {
            self.buffer[..self.index].iter().sum()
        };
        sum / count as f32
    }

    /// Smoothed value produced by the last `observe` call
    pub fn latest(&self) -> f32 {
        self.latest
    }

    /// Clear the window and start it again from a single reading
    pub fn reseed(&mut self, raw_angle: f32) -> f32 {
        self.reset();
        self.observe(raw_angle)
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.index = 0;
        self.filled = false;
        self.latest = 0.0;
    }

    /// Number of readings currently averaged
    pub fn len(&self) -> usize {
        if self.filled {
            self.buffer.len()
        } else {
            self.index
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }
}
