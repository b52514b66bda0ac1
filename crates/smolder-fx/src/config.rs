use glam::Vec2;

use smolder_engine::input::Key;
use smolder_engine::paint::Color;

/// Whether hidden ambient particles keep simulating.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum AmbientPolicy {
    /// Particles advance every tick; toggling ambient only hides them.
    #[default]
    KeepSimulating,
    /// Particles freeze while the ambient layer is disabled.
    PauseWhenHidden,
}

/// Closed sampling interval.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SampleRange {
    pub min: f32,
    pub max: f32,
}

impl SampleRange {
    #[inline]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Maps `t` in `[0, 1)` onto the range; a degenerate range yields `min`.
    #[inline]
    pub fn lerp(self, t: f32) -> f32 {
        self.min + t * (self.max - self.min)
    }

    #[inline]
    pub fn contains(self, v: f32) -> bool {
        v >= self.min && v <= self.max
    }
}

/// Ambient particle tuning.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ParticleParams {
    /// Pool size.
    pub count: usize,
    /// Per-axis velocity, px/s.
    pub speed: SampleRange,
    /// Radius, px. Must stay positive.
    pub radius: SampleRange,
    /// Initial life.
    pub life: SampleRange,
    /// Life lost per second.
    pub decay_rate: f32,
    /// A particle whose `y + radius` drops below this is respawned.
    pub cull_threshold: f32,
    /// Lateral sway, px/s at peak.
    pub sway_amplitude: f32,
    /// Sway angular frequency, rad/s.
    pub sway_frequency: f32,
    /// Straight RGB of every disc.
    pub tint: [f32; 3],
    pub max_alpha: f32,
    pub alpha_scale: f32,
}

impl Default for ParticleParams {
    fn default() -> Self {
        Self {
            count: 64,
            speed: SampleRange::new(-20.0, 20.0),
            radius: SampleRange::new(20.0, 50.0),
            life: SampleRange::new(0.4, 1.0),
            decay_rate: 0.2,
            cull_threshold: -10.0,
            sway_amplitude: 5.0,
            sway_frequency: 2.0,
            tint: [0.85, 0.85, 0.9],
            max_alpha: 0.6,
            alpha_scale: 0.6,
        }
    }
}

impl ParticleParams {
    /// Disc color for a particle with `life` remaining.
    pub fn disc_color(&self, life: f32) -> Color {
        let [r, g, b] = self.tint;
        Color::from_straight(r, g, b, (life * self.alpha_scale).min(self.max_alpha))
    }
}

/// Primary shape motion, in normalized device units.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ShapeParams {
    /// rad/s.
    pub angular_speed: f32,
    /// Rotation center.
    pub pivot: Vec2,
    /// Displacement applied after rotating about `pivot`.
    pub offset: Vec2,
}

impl Default for ShapeParams {
    fn default() -> Self {
        Self {
            angular_speed: 1.0,
            pivot: Vec2::new(0.0, -0.2),
            offset: Vec2::new(0.0, 0.2),
        }
    }
}

/// Bottom-row control placement, logical px.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ControlLayout {
    pub padding: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for ControlLayout {
    fn default() -> Self {
        Self {
            padding: 12.0,
            width: 120.0,
            height: 36.0,
        }
    }
}

/// Control colors (premultiplied).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Palette {
    pub run_pause: Color,
    pub spin: Color,
    pub ambient_toggle: Color,

    pub running: Color,
    pub paused: Color,
    pub ambient_on: Color,
    pub ambient_off: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            run_pause: Color::from_straight(0.25, 0.5, 0.95, 0.95),
            spin: Color::from_straight(0.95, 0.7, 0.25, 0.95),
            ambient_toggle: Color::from_straight(0.4, 0.4, 0.4, 0.95),

            running: Color::from_straight(0.2, 0.75, 0.3, 0.95),
            paused: Color::from_straight(0.85, 0.25, 0.25, 0.95),
            ambient_on: Color::from_straight(0.2, 0.7, 0.8, 0.95),
            ambient_off: Color::from_straight(0.4, 0.4, 0.4, 0.95),
        }
    }
}

/// Every tunable of the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub particles: ParticleParams,
    pub shape: ShapeParams,
    pub controls: ControlLayout,
    pub palette: Palette,
    pub vignette_strength: f32,
    /// Hovered controls have all straight components scaled by this.
    pub hover_boost: f32,
    pub clear_color: Color,
    pub ambient_policy: AmbientPolicy,
    /// Holding this key ends the loop.
    pub exit_key: Key,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            particles: ParticleParams::default(),
            shape: ShapeParams::default(),
            controls: ControlLayout::default(),
            palette: Palette::default(),
            vignette_strength: 0.6,
            hover_boost: 1.15,
            clear_color: Color::opaque(0.08, 0.08, 0.10),
            ambient_policy: AmbientPolicy::default(),
            exit_key: Key::Escape,
        }
    }
}
