//! Smolder FX: a rotating RGB triangle over drifting ambient discs, under a
//! vignette, with a row of clickable controls.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use smolder_fx::Application;
//!
//! Application::new().size(900.0, 600.0).run()?;
//! ```
//!
//! Everything except [`Application`] is GPU-free: [`Scene`] owns the state
//! advanced each tick, and [`FrameCompositor`] turns a [`FrameView`] into
//! draws against any `smolder_engine::render::GraphicsBackend`.

pub mod app;
pub mod clock;
pub mod compositor;
pub mod config;
pub mod interaction;
pub mod particles;
pub mod resources;
pub mod scene;

#[cfg(test)]
mod testing;

pub use app::Application;
pub use clock::{AnimationClock, RotationDirection};
pub use compositor::{FrameCompositor, FrameView, Pass};
pub use config::{
    AmbientPolicy, ControlLayout, Palette, ParticleParams, SampleRange, SceneConfig, ShapeParams,
};
pub use interaction::{Control, ControlId, InteractionModel, InteractionState, Pointer};
pub use particles::{Disc, Particle, ParticleSystem};
pub use resources::SceneResources;
pub use scene::Scene;
