use smolder_engine::coords::{Vec2, Viewport};

use crate::clock::AnimationClock;
use crate::compositor::FrameView;
use crate::config::{AmbientPolicy, SceneConfig};
use crate::interaction::{Control, ControlId, InteractionModel, InteractionState, Pointer};
use crate::particles::ParticleSystem;

/// All mutable scene state, advanced once per tick.
///
/// GPU-free: frames are produced from [`Scene::view`] by a `FrameCompositor`.
pub struct Scene {
    config: SceneConfig,
    viewport: Viewport,
    clock: AnimationClock,
    particles: ParticleSystem,
    interaction: InteractionModel,
    controls: Vec<Control>,
}

impl Scene {
    /// Builds the scene for `viewport`. `seed` makes particle spawning
    /// reproducible; `None` seeds from the OS.
    pub fn new(config: SceneConfig, viewport: Viewport, seed: Option<u64>) -> Self {
        let mut particles = match seed {
            Some(seed) => ParticleSystem::with_seed(config.particles, viewport, seed),
            None => ParticleSystem::new(config.particles, viewport),
        };
        particles.initialize(config.particles.count);

        let controls = config.controls.build(viewport, &config.palette);

        Self {
            config,
            viewport,
            clock: AnimationClock::new(),
            particles,
            interaction: InteractionModel::new(InteractionState::default()),
            controls,
        }
    }

    /// Re-anchors the controls and the particle spawn area.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.particles.set_viewport(viewport);
        self.controls = self.config.controls.build(viewport, &self.config.palette);
    }

    /// Advances the clock, then the particles, then processes pointer input.
    ///
    /// A click is applied after the clock and particles moved, so its effect is
    /// visible from the next tick on. Returns the activated control, if any.
    pub fn tick(&mut self, dt: f32, pointer: Pointer) -> Option<ControlId> {
        let state = *self.interaction.state();

        self.clock.advance(f64::from(dt), state.running);

        let simulate = match self.config.ambient_policy {
            AmbientPolicy::KeepSimulating => true,
            AmbientPolicy::PauseWhenHidden => state.ambient_enabled,
        };
        if simulate {
            self.particles.advance(dt, self.clock.elapsed());
        }

        self.interaction.on_tick(pointer, &self.controls)
    }

    /// Snapshot for composing the current frame.
    pub fn view(&self, pointer: Option<Vec2>) -> FrameView<'_> {
        FrameView {
            state: self.interaction.state(),
            clock: &self.clock,
            particles: &self.particles,
            controls: &self.controls,
            pointer,
            viewport: self.viewport,
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn state(&self) -> &InteractionState {
        self.interaction.state()
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }
}
