pub mod bus;
pub mod reading;
pub mod source;
pub mod trace;

pub use bus::{SensorBus, SensorSubscription};
pub use reading::{TiltReading, TimedReading};
pub use source::{TiltSource, TraceFileSource};
pub use trace::{format_trace, parse_trace};
