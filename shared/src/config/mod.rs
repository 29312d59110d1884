//! Configuration types shared across crates

pub mod throttle;

pub use throttle::ThrottleWindows;
