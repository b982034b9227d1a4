use serde::Serialize;

/// Re-arm gate between dispatched actions
///
/// A new action may only be dispatched once the device has returned to
/// neutral, the settle delay after the previous action has elapsed, and the
/// minimum inter-action interval has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DebounceState {
    /// Set on dispatch, cleared by the settle timer after a neutral pass
    pub is_processing_action: bool,
    /// Set when the position falls back to neutral, cleared on dispatch
    pub has_returned_to_neutral: bool,
    /// Clock time of the last dispatch, `None` until the first one
    pub last_action_ms: Option<u64>,
}

impl DebounceState {
    pub fn new() -> Self {
        Self {
            is_processing_action: false,
            has_returned_to_neutral: true,
            last_action_ms: None,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Whether an action-zone sample at `now_ms` may dispatch
    pub fn can_dispatch(&self, now_ms: u64, min_interval_ms: u64) -> bool {
        let cooled_down = self
            .last_action_ms
            .is_none_or(|last| now_ms.saturating_sub(last) >= min_interval_ms);
        self.has_returned_to_neutral && !self.is_processing_action && cooled_down
    }

    pub fn record_dispatch(&mut self, now_ms: u64) {
        self.is_processing_action = true;
        self.has_returned_to_neutral = false;
        self.last_action_ms = Some(now_ms);
    }
}

impl Default for DebounceState {
    fn default() -> Self {
        Self::new()
    }
}

/// Cancellable one-shot deadline that clears the processing flag
///
/// The timer only records when it is due; its owner polls it with the current
/// clock time. Scheduling while already pending keeps the earlier deadline.
#[derive(Debug, Clone, Copy, Default)]
pub struct SettleTimer {
    deadline_ms: Option<u64>,
}

impl SettleTimer {
    pub fn new() -> Self {
        Self { deadline_ms: None }
    }

    pub fn schedule(&mut self, now_ms: u64, delay_ms: u64) {
        if self.deadline_ms.is_none() {
            self.deadline_ms = Some(now_ms.saturating_add(delay_ms));
        }
    }

    pub fn cancel(&mut self) {
        self.deadline_ms = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline_ms.is_some()
    }

    /// Returns `true` exactly once, on the first poll at or after the deadline
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.deadline_ms {
            Some(deadline) if now_ms >= deadline => {
                self.deadline_ms = None;
                true
            }
            _ => false,
        }
    }
}
