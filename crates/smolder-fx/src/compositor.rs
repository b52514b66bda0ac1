//! Fixed-order frame composition.
//!
//! Every frame is issued as four passes, back to front: ambient discs, the
//! primary shape, the vignette, then the controls. The compositor only reads
//! scene state; it never mutates it.

use glam::{Mat4, Vec3, Vec4};

use smolder_engine::coords::{Rect, Vec2, Viewport};
use smolder_engine::paint::Color;
use smolder_engine::render::{BackendError, GraphicsBackend, Uniform};

use crate::clock::AnimationClock;
use crate::config::{Palette, SceneConfig, ShapeParams};
use crate::interaction::{Control, ControlId, InteractionState};
use crate::particles::ParticleSystem;
use crate::resources::{GuiMode, SceneResources};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Pass {
    Ambient,
    Shape,
    Vignette,
    Controls,
}

impl Pass {
    pub const fn label(self) -> &'static str {
        match self {
            Pass::Ambient => "ambient",
            Pass::Shape => "shape",
            Pass::Vignette => "vignette",
            Pass::Controls => "controls",
        }
    }
}

/// Read-only snapshot of everything one frame draws.
#[derive(Copy, Clone)]
pub struct FrameView<'a> {
    pub state: &'a InteractionState,
    pub clock: &'a AnimationClock,
    pub particles: &'a ParticleSystem,
    pub controls: &'a [Control],
    /// Pointer position, for hover.
    pub pointer: Option<Vec2>,
    pub viewport: Viewport,
}

pub struct FrameCompositor {
    resources: SceneResources,
    shape: ShapeParams,
    palette: Palette,
    vignette_strength: f32,
    hover_boost: f32,
}

impl FrameCompositor {
    pub fn new(resources: SceneResources, config: &SceneConfig) -> Self {
        Self {
            resources,
            shape: config.shape,
            palette: config.palette,
            vignette_strength: config.vignette_strength,
            hover_boost: config.hover_boost,
        }
    }

    /// Issues all passes of one frame.
    pub fn compose<B>(&self, backend: &mut B, view: &FrameView<'_>) -> Result<(), BackendError>
    where
        B: GraphicsBackend + ?Sized,
    {
        let proj = projection(view.viewport);

        if view.state.ambient_enabled {
            self.draw_ambient(backend, view, proj)?;
        }
        self.draw_shape(backend, view)?;
        self.draw_vignette(backend, view, proj)?;
        self.draw_controls(backend, view, proj)?;
        Ok(())
    }

    fn draw_ambient<B>(
        &self,
        backend: &mut B,
        view: &FrameView<'_>,
        proj: Mat4,
    ) -> Result<(), BackendError>
    where
        B: GraphicsBackend + ?Sized,
    {
        backend.begin_pass(Pass::Ambient.label());
        backend.use_program(self.resources.gui)?;
        backend.set_uniform("proj", Uniform::Mat4(proj))?;
        backend.set_uniform("mode", Uniform::Int(GuiMode::Disc as i32))?;

        for disc in view.particles.discs() {
            let bounds = Rect::around_disc(disc.center, disc.radius);
            backend.set_uniform("model", Uniform::Mat4(rect_model(bounds)))?;
            backend.set_uniform("color", color_uniform(disc.color))?;
            backend.draw(self.resources.quad)?;
        }
        Ok(())
    }

    fn draw_shape<B>(&self, backend: &mut B, view: &FrameView<'_>) -> Result<(), BackendError>
    where
        B: GraphicsBackend + ?Sized,
    {
        let angle = view
            .clock
            .rotation_angle(self.shape.angular_speed, view.state.direction);

        backend.begin_pass(Pass::Shape.label());
        backend.use_program(self.resources.shape)?;
        backend.set_uniform("model", Uniform::Mat4(self.shape_transform(angle)))?;
        backend.set_uniform("time", Uniform::Float(view.clock.elapsed() as f32))?;
        backend.draw(self.resources.triangle)
    }

    fn draw_vignette<B>(
        &self,
        backend: &mut B,
        view: &FrameView<'_>,
        proj: Mat4,
    ) -> Result<(), BackendError>
    where
        B: GraphicsBackend + ?Sized,
    {
        backend.begin_pass(Pass::Vignette.label());
        backend.use_program(self.resources.vignette)?;
        backend.set_uniform("proj", Uniform::Mat4(proj))?;
        backend.set_uniform("model", Uniform::Mat4(rect_model(view.viewport.rect())))?;
        backend.set_uniform("strength", Uniform::Float(self.vignette_strength))?;
        backend.draw(self.resources.quad)
    }

    fn draw_controls<B>(
        &self,
        backend: &mut B,
        view: &FrameView<'_>,
        proj: Mat4,
    ) -> Result<(), BackendError>
    where
        B: GraphicsBackend + ?Sized,
    {
        backend.begin_pass(Pass::Controls.label());
        backend.use_program(self.resources.gui)?;
        backend.set_uniform("proj", Uniform::Mat4(proj))?;
        backend.set_uniform("mode", Uniform::Int(GuiMode::Rect as i32))?;

        for control in view.controls {
            let hovered = view.pointer.is_some_and(|p| control.contains(p));
            let color = self.control_color(control, view.state, hovered);

            backend.set_uniform("model", Uniform::Mat4(rect_model(control.rect)))?;
            backend.set_uniform("color", color_uniform(color))?;
            backend.draw(self.resources.quad)?;
        }
        Ok(())
    }

    /// Rotation by `angle` about the pivot, then the fixed offset.
    pub fn shape_transform(&self, angle: f32) -> Mat4 {
        let pivot = self.shape.pivot.extend(0.0);
        let offset = self.shape.offset.extend(0.0);
        Mat4::from_translation(pivot + offset)
            * Mat4::from_rotation_z(angle)
            * Mat4::from_translation(-pivot)
    }

    /// Color a control is drawn with this frame.
    pub fn control_color(
        &self,
        control: &Control,
        state: &InteractionState,
        hovered: bool,
    ) -> Color {
        let base = match control.id {
            ControlId::RunPause if state.running => self.palette.running,
            ControlId::RunPause => self.palette.paused,
            ControlId::AmbientToggle if state.ambient_enabled => self.palette.ambient_on,
            ControlId::AmbientToggle => self.palette.ambient_off,
            ControlId::SpinLeft | ControlId::SpinRight => control.color,
        };

        if hovered {
            base.brightened(self.hover_boost)
        } else {
            base
        }
    }
}

/// Pixel space (top-left origin) to clip space.
pub fn projection(viewport: Viewport) -> Mat4 {
    Mat4::orthographic_rh(
        0.0,
        viewport.width.max(1.0),
        viewport.height.max(1.0),
        0.0,
        -1.0,
        1.0,
    )
}

/// Maps the unit quad onto `rect`.
pub fn rect_model(rect: Rect) -> Mat4 {
    Mat4::from_translation(Vec3::new(rect.origin.x, rect.origin.y, 0.0))
        * Mat4::from_scale(Vec3::new(rect.size.x, rect.size.y, 1.0))
}

#[inline]
fn color_uniform(c: Color) -> Uniform {
    Uniform::Vec4(Vec4::from_array(c.to_array()))
}
