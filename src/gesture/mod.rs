pub mod calibration;
pub mod debounce;
pub mod position;
pub mod state_machine;

pub use calibration::CalibrationManager;
pub use debounce::{DebounceState, SettleTimer};
pub use position::{Position, TiltAction};
pub use state_machine::{GestureStateMachine, Transition};
