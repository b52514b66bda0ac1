//! Color model shared between the effect layer and the GPU backend.
//!
//! All colors handed to programs are linear premultiplied RGBA; geometry
//! types stay in `coords`.

pub mod color;

pub use color::Color;
