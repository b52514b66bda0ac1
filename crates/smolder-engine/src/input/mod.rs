//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! The runtime translates platform events into `InputEvent`s through
//! `platform::winit` and folds them into one `InputState` per window.

pub(crate) mod platform;
mod state;
mod types;

pub use state::InputState;
pub use types::{InputEvent, Key, KeyState, MouseButton, MouseButtonState, PointerButtonEvent};
