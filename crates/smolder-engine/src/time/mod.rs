//! Wall-clock frame timing.
//!
//! The runtime owns one `FrameClock` and calls `tick()` once per presented
//! frame; the resulting `FrameTime::dt` feeds the simulation's own clock.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
