//! Smolder engine crate.
//!
//! Platform + GPU runtime used by the effect layer: window and event loop,
//! input polling, frame timing, logging setup, and a program/uniform/draw
//! backend over wgpu.

pub mod core;
pub mod device;
pub mod input;
pub mod time;
pub mod window;

pub mod coords;
pub mod logging;
pub mod paint;
pub mod render;
