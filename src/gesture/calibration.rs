use crate::gesture::state_machine::GestureStateMachine;
use crate::signal_processing::SmoothingFilter;

/// One-shot neutral baseline capture
///
/// `request` arms a single pending capture; the next reading delivered to
/// `try_complete` becomes the baseline. Repeated requests while one is
/// pending collapse into it, so a stalled sensor never accumulates captures.
pub struct CalibrationManager {
    baseline: f32,
    calibrated: bool,
    pending: bool,
}

impl CalibrationManager {
    pub fn new() -> Self {
        Self {
            baseline: 0.0,
            calibrated: false,
            pending: false,
        }
    }

    /// Arm a capture for the next reading. Returns `false` if one was already pending.
    pub fn request(&mut self) -> bool {
        if self.pending {
            log::debug!("Calibration already pending");
            return false;
        }
        self.pending = true;
        true
    }

    /// Consume `raw_angle` as the new baseline if a capture is pending
    ///
    /// On completion the smoothing window restarts from this reading and the
    /// state machine returns to neutral with a fresh debounce state and no
    /// pending timer. Returns `true` if the reading was consumed.
    pub fn try_complete(
        &mut self,
        raw_angle: f32,
        filter: &mut SmoothingFilter,
        machine: &mut GestureStateMachine,
    ) -> bool {
        if !self.pending {
            return false;
        }

        self.pending = false;
        self.baseline = raw_angle;
        self.calibrated = true;

        filter.reseed(raw_angle);
        machine.reset();

        log::info!("Calibrated: baseline {:.1}°", raw_angle);
        true
    }

    /// Deviation of a smoothed angle from the baseline
    pub fn delta(&self, smoothed: f32) -> f32 {
        smoothed - self.baseline
    }

    pub fn baseline(&self) -> f32 {
        self.baseline
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibrated
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

impl Default for CalibrationManager {
    fn default() -> Self {
        Self::new()
    }
}
