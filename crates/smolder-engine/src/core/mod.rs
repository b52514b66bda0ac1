//! Core engine-facing contracts.
//!
//! Defines the interface between the runtime (platform loop) and higher
//! layers: lifecycle callbacks plus a per-frame context bundling the window,
//! GPU, polled input and frame timing.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
pub(crate) use ctx::logical_viewport;
