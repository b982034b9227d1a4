use crate::gesture::TiltAction;

/// Game-side receiver of dispatched gestures
///
/// On-screen buttons call the same methods, so a manual "correct" and a
/// tilted "correct" are indistinguishable to the game.
pub trait ActionSink {
    fn on_tilt_up(&mut self);
    fn on_tilt_down(&mut self);

    fn dispatch(&mut self, action: TiltAction) {
        match action {
            TiltAction::Correct => self.on_tilt_up(),
            TiltAction::Skip => self.on_tilt_down(),
        }
    }
}

impl<S: ActionSink + ?Sized> ActionSink for &mut S {
    fn on_tilt_up(&mut self) {
        (**self).on_tilt_up();
    }

    fn on_tilt_down(&mut self) {
        (**self).on_tilt_down();
    }
}

impl<S: ActionSink + ?Sized> ActionSink for Box<S> {
    fn on_tilt_up(&mut self) {
        (**self).on_tilt_up();
    }

    fn on_tilt_down(&mut self) {
        (**self).on_tilt_down();
    }
}

/// Sink built from a pair of closures
pub struct CallbackSink<U, D> {
    on_up: U,
    on_down: D,
}

impl<U: FnMut(), D: FnMut()> CallbackSink<U, D> {
    pub fn new(on_up: U, on_down: D) -> Self {
        Self { on_up, on_down }
    }
}

impl<U: FnMut(), D: FnMut()> ActionSink for CallbackSink<U, D> {
    fn on_tilt_up(&mut self) {
        (self.on_up)();
    }

    fn on_tilt_down(&mut self) {
        (self.on_down)();
    }
}

/// Sink that records every action in order
#[derive(Debug, Clone, Default)]
pub struct ActionRecorder {
    actions: Vec<TiltAction>,
}

impl ActionRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actions(&self) -> &[TiltAction] {
        &self.actions
    }

    pub fn count(&self, action: TiltAction) -> usize {
        self.actions.iter().filter(|&&a| a == action).count()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn clear(&mut self) {
        self.actions.clear();
    }
}

impl ActionSink for ActionRecorder {
    fn on_tilt_up(&mut self) {
        self.actions.push(TiltAction::Correct);
    }

    fn on_tilt_down(&mut self) {
        self.actions.push(TiltAction::Skip);
    }
}
