use crate::config::{GestureConfig, Thresholds};
use crate::gesture::debounce::{DebounceState, SettleTimer};
use crate::gesture::position::{Position, TiltAction};

/// Result of classifying one smoothed sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub previous: Position,
    pub position: Position,
    pub action: Option<TiltAction>,
}

impl Transition {
    pub fn position_changed(&self) -> bool {
        self.previous != self.position
    }
}

/// Hysteresis classifier and debounced action dispatcher
///
/// Classifies baseline-relative tilt into neutral / dead / action zones:
///
/// - **Neutral** (`|delta| <= neutral`): position returns to `Neutral` and
///   the device counts as having come back level. A pending processing flag
///   is cleared after the settle delay, not immediately, so a gesture that
///   swings back through neutral cannot re-arm mid-motion.
/// - **Action** (`|delta| > action`): position follows the sign of `delta`.
///   An action is dispatched only when the debounce gate is open; otherwise
///   the position still updates for display and the tilt must come back out
///   of the action zone before it can fire.
/// - **Dead** (in between): a non-neutral position is treated as heading
///   back and drops to `Neutral`. Nothing is dispatched from here.
pub struct GestureStateMachine {
    thresholds: Thresholds,
    min_action_interval_ms: u64,
    settle_delay_ms: u64,
    position: Position,
    debounce: DebounceState,
    settle: SettleTimer,
}

impl GestureStateMachine {
    pub fn new(config: &GestureConfig) -> Self {
        Self {
            thresholds: config.thresholds(),
            min_action_interval_ms: config.min_action_interval_ms,
            settle_delay_ms: config.settle_delay_ms,
            position: Position::Neutral,
            debounce: DebounceState::new(),
            settle: SettleTimer::new(),
        }
    }

    /// Classify a baseline-relative delta observed at `now_ms`
    pub fn on_sample(&mut self, delta: f32, now_ms: u64) -> Transition {
        self.poll(now_ms);

        let previous = self.position;
        let magnitude = delta.abs();
        let mut action = None;

        if magnitude <= self.thresholds.neutral {
            self.position = Position::Neutral;
            self.debounce.has_returned_to_neutral = true;
            if self.debounce.is_processing_action {
                self.settle.schedule(now_ms, self.settle_delay_ms);
            }
        } else if magnitude > self.thresholds.action {
            let candidate = Position::from_delta(delta);
            if self.debounce.can_dispatch(now_ms, self.min_action_interval_ms) {
                self.debounce.record_dispatch(now_ms);
                action = TiltAction::for_position(candidate);
            } else {
                // A blocked tilt that is simply held must not fire once the gate reopens
                self.debounce.has_returned_to_neutral = false;
            }
            self.position = candidate;
        } else if self.position != Position::Neutral {
            self.position = Position::Neutral;
            self.debounce.has_returned_to_neutral = true;
        }

        if let Some(action) = action {
            log::debug!(
                "Dispatch {} at {} ms (delta {:.1}°)",
                action,
                now_ms,
                delta
            );
        } else if previous != self.position {
            log::debug!("Position {} -> {} (delta {:.1}°)", previous, self.position, delta);
        }

        Transition {
            previous,
            position: self.position,
            action,
        }
    }

    /// Fire the settle timer if it is due. Returns `true` if it fired.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        if self.settle.poll(now_ms) {
            self.debounce.is_processing_action = false;
            log::trace!("Processing flag cleared at {} ms", now_ms);
            true
        } else {
            false
        }
    }

    /// Return to the initial state: neutral, re-armed, no pending timer
    pub fn reset(&mut self) {
        self.position = Position::Neutral;
        self.debounce.reset();
        self.settle.cancel();
    }

    /// Drop any pending settle deadline without touching position or debounce
    pub fn cancel_timers(&mut self) {
        self.settle.cancel();
    }

    pub fn set_thresholds(&mut self, thresholds: Thresholds) {
        self.thresholds = thresholds;
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn debounce(&self) -> &DebounceState {
        &self.debounce
    }

    pub fn settle_pending(&self) -> bool {
        self.settle.is_pending()
    }
}
