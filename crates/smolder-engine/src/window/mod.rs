//! Platform event loop.
//!
//! Owns the winit event loop, the single application window and its GPU
//! context, and drives `core::App` callbacks.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
