//! Coordinate and geometry types shared across the engine and the effect layer.
//!
//! Canonical CPU space:
//! - Logical pixels (DPI-aware)
//! - Origin top-left
//! - +X right, +Y down
//!
//! Screen-space programs convert to NDC with an orthographic projection
//! built from the current `Viewport`.

mod rect;
mod vec2;
mod viewport;

pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
