mod script;

pub use script::{GestureDirection, TraceNoiseConfig, TraceScript};
