pub mod smoothing;

pub use smoothing::SmoothingFilter;
