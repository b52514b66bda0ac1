use anyhow::{Context, Result};
use winit::dpi::LogicalSize;

use smolder_engine::coords::{Vec2, Viewport};
use smolder_engine::core::{App as EngineApp, AppControl, FrameCtx};
use smolder_engine::device::{Gpu, GpuInit};
use smolder_engine::input::MouseButton;
use smolder_engine::render::WgpuBackend;
use smolder_engine::window::{Runtime, RuntimeConfig};

use crate::compositor::FrameCompositor;
use crate::config::SceneConfig;
use crate::interaction::Pointer;
use crate::resources::SceneResources;
use crate::scene::Scene;

// ── Application ───────────────────────────────────────────────────────────

/// Window + scene builder.
///
/// ```rust,ignore
/// Application::new()
///     .size(1280.0, 720.0)
///     .seed(7)
///     .run()?;
/// ```
pub struct Application {
    title:  String,
    width:  f64,
    height: f64,
    seed:   Option<u64>,
    config: SceneConfig,
}

impl Application {
    pub fn new() -> Self {
        Self {
            title:  "RGB Triangle: Effects + GUI".to_string(),
            width:  900.0,
            height: 600.0,
            seed:   None,
            config: SceneConfig::default(),
        }
    }

    /// Set the window title.
    pub fn title(mut self, t: impl Into<String>) -> Self {
        self.title = t.into();
        self
    }

    /// Set the initial window size in logical pixels.
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.width  = width;
        self.height = height;
        self
    }

    /// Seed particle spawning for a reproducible ambience.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn config(mut self, config: SceneConfig) -> Self {
        self.config = config;
        self
    }

    /// Opens the window and runs until it is closed or the exit key is held.
    ///
    /// Returns the first fatal error (program build, draw recording, GPU setup).
    pub fn run(self) -> Result<()> {
        let runtime = RuntimeConfig {
            title:        self.title,
            initial_size: LogicalSize::new(self.width, self.height),
        };
        let viewport = Viewport::new(self.width as f32, self.height as f32);

        log::info!(
            "starting {}x{} scene ({} particles, {:?})",
            self.width,
            self.height,
            self.config.particles.count,
            self.config.ambient_policy
        );

        let app = SceneApp::new(Scene::new(self.config, viewport, self.seed));

        // Colors are authored for a non-sRGB target.
        let gpu_init = GpuInit {
            prefer_srgb: false,
            ..GpuInit::default()
        };

        Runtime::run(runtime, gpu_init, app)
    }
}

impl Default for Application {
    fn default() -> Self {
        Self::new()
    }
}

// ── SceneApp ──────────────────────────────────────────────────────────────

/// Engine-facing side of [`Application`]: one tick then one frame per redraw.
struct SceneApp {
    scene: Scene,
    gpu:   Option<GpuSide>,
}

/// Created in `on_init`, once a device exists.
struct GpuSide {
    backend:    WgpuBackend,
    compositor: FrameCompositor,
}

impl SceneApp {
    fn new(scene: Scene) -> Self {
        Self { scene, gpu: None }
    }
}

impl EngineApp for SceneApp {
    fn on_init(&mut self, gpu: &Gpu<'_>) -> Result<()> {
        let mut backend = WgpuBackend::new(gpu.device(), gpu.surface_format());
        let resources =
            SceneResources::load(&mut backend).context("failed to build scene programs")?;
        let compositor = FrameCompositor::new(resources, self.scene.config());

        self.gpu = Some(GpuSide { backend, compositor });
        Ok(())
    }

    fn on_resize(&mut self, viewport: Viewport) {
        log::debug!("viewport {}x{}", viewport.width, viewport.height);
        self.scene.resize(viewport);
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl> {
        let pointer = Pointer {
            pos:  ctx.input.pointer_pos.map(Vec2::from),
            down: ctx.input.button_down(MouseButton::Left),
        };

        // ── Tick ──────────────────────────────────────────────────────────
        if let Some(id) = self.scene.tick(ctx.time.dt, pointer) {
            log::debug!("{} clicked: {:?}", id.label(), self.scene.state());
        }

        if ctx.input.key_down(self.scene.config().exit_key) {
            log::info!("exit key held");
            return Ok(AppControl::Exit);
        }

        // ── Frame ─────────────────────────────────────────────────────────
        let Some(gpu) = self.gpu.as_mut() else {
            anyhow::bail!("frame requested before GPU resources were created");
        };

        gpu.backend.begin_frame();
        gpu.compositor
            .compose(&mut gpu.backend, &self.scene.view(pointer.pos))
            .context("failed to record frame")?;

        let backend = &mut gpu.backend;
        Ok(ctx.render(self.scene.config().clear_color, |rctx, target| {
            backend.flush(rctx, target)
        }))
    }
}
