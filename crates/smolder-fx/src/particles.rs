//! Ambient particle pool.
//!
//! A fixed number of soft discs drift across the viewport. Particles are never
//! removed: one that fades out or leaves through the top edge is replaced in
//! place by a freshly sampled particle, so the pool size stays constant.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use smolder_engine::coords::{Vec2, Viewport};
use smolder_engine::paint::Color;

use crate::config::ParticleParams;

/// One particle, in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    /// px/s.
    pub velocity: Vec2,
    pub radius: f32,
    pub life: f32,
}

/// Draw description of a visible particle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Disc {
    pub center: Vec2,
    pub radius: f32,
    pub color: Color,
}

pub struct ParticleSystem {
    params: ParticleParams,
    viewport: Viewport,
    rng: StdRng,
    particles: Vec<Particle>,
}

impl ParticleSystem {
    /// Pool seeded from the OS.
    pub fn new(params: ParticleParams, viewport: Viewport) -> Self {
        Self::with_rng(params, viewport, StdRng::from_os_rng())
    }

    /// Deterministic pool: the same seed and the same tick sequence yield the
    /// same particles.
    pub fn with_seed(params: ParticleParams, viewport: Viewport, seed: u64) -> Self {
        Self::with_rng(params, viewport, StdRng::seed_from_u64(seed))
    }

    fn with_rng(params: ParticleParams, viewport: Viewport, rng: StdRng) -> Self {
        Self {
            params,
            viewport,
            rng,
            particles: Vec::new(),
        }
    }

    /// Replaces the pool with `count` fresh particles.
    pub fn initialize(&mut self, count: usize) {
        self.particles.clear();
        self.particles.reserve(count);
        for _ in 0..count {
            let p = self.spawn();
            self.particles.push(p);
        }
    }

    /// Area used for future spawns. Live particles are left where they are.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Steps every particle by `dt` seconds; `elapsed` drives the lateral sway.
    ///
    /// Returns how many particles were respawned.
    pub fn advance(&mut self, dt: f32, elapsed: f64) -> usize {
        let mut respawned = 0;

        for i in 0..self.particles.len() {
            let expired = {
                let params = &self.params;
                let p = &mut self.particles[i];

                p.position += p.velocity * dt;
                p.life -= dt * params.decay_rate;
                p.position.x += sway(params, elapsed, i) * dt;

                p.life <= 0.0 || p.position.y + p.radius < params.cull_threshold
            };

            if expired {
                self.particles[i] = self.spawn();
                respawned += 1;
            }
        }

        respawned
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Visible discs in pool order.
    pub fn discs(&self) -> impl Iterator<Item = Disc> + '_ {
        let params = &self.params;
        self.particles.iter().filter(|p| p.life > 0.0).map(move |p| Disc {
            center: p.position,
            radius: p.radius,
            color: params.disc_color(p.life),
        })
    }

    fn spawn(&mut self) -> Particle {
        let params = self.params;
        let viewport = self.viewport;
        let rng = &mut self.rng;
        let mut unit = || rng.random::<f32>();

        Particle {
            position: Vec2::new(unit() * viewport.width, unit() * viewport.height),
            velocity: Vec2::new(params.speed.lerp(unit()), params.speed.lerp(unit())),
            radius: params.radius.lerp(unit()),
            life: params.life.lerp(unit()),
        }
    }
}

/// Lateral sway speed of the particle at `index`, px/s.
fn sway(params: &ParticleParams, elapsed: f64, index: usize) -> f32 {
    let phase = elapsed * f64::from(params.sway_frequency) + index as f64;
    phase.sin() as f32 * params.sway_amplitude
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(900.0, 600.0)
    }

    fn seeded(count: usize, seed: u64) -> ParticleSystem {
        let mut sys = ParticleSystem::with_seed(ParticleParams::default(), viewport(), seed);
        sys.initialize(count);
        sys
    }

    // ── spawning ──────────────────────────────────────────────────────────

    #[test]
    fn initialize_samples_within_ranges() {
        let params = ParticleParams::default();
        let sys = seeded(256, 7);
        assert_eq!(sys.len(), 256);

        for p in sys.particles() {
            assert!(p.position.x >= 0.0 && p.position.x < 900.0);
            assert!(p.position.y >= 0.0 && p.position.y < 600.0);
            assert!(params.speed.contains(p.velocity.x));
            assert!(params.speed.contains(p.velocity.y));
            assert!(params.radius.contains(p.radius));
            assert!(params.life.contains(p.life));
        }
    }

    #[test]
    fn initialize_replaces_previous_pool() {
        let mut sys = seeded(10, 1);
        sys.initialize(3);
        assert_eq!(sys.len(), 3);
        sys.initialize(0);
        assert!(sys.is_empty());
    }

    #[test]
    fn same_seed_same_particles() {
        let mut a = seeded(32, 42);
        let mut b = seeded(32, 42);
        assert_eq!(a.particles(), b.particles());

        for step in 0..200 {
            let t = step as f64 * 0.05;
            assert_eq!(a.advance(0.05, t), b.advance(0.05, t));
        }
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn different_seeds_differ() {
        assert_ne!(seeded(8, 1).particles(), seeded(8, 2).particles());
    }

    // ── advance ───────────────────────────────────────────────────────────

    #[test]
    fn advance_keeps_pool_size() {
        let mut sys = seeded(64, 3);
        for step in 0..1_000 {
            sys.advance(0.1, step as f64 * 0.1);
            assert_eq!(sys.len(), 64);
        }
    }

    #[test]
    fn life_strictly_decreases_without_respawn() {
        let mut sys = seeded(16, 9);
        let before: Vec<f32> = sys.particles().iter().map(|p| p.life).collect();

        let respawned = sys.advance(0.01, 0.0);
        assert_eq!(respawned, 0);

        for (old, p) in before.iter().zip(sys.particles()) {
            assert!(p.life < *old);
            assert!((old - p.life - 0.01 * 0.2).abs() < 1e-6);
        }
    }

    #[test]
    fn advance_integrates_velocity_and_sway() {
        let mut sys = ParticleSystem::with_seed(ParticleParams::default(), viewport(), 0);
        sys.particles = vec![Particle {
            position: Vec2::new(100.0, 100.0),
            velocity: Vec2::new(10.0, -4.0),
            radius: 30.0,
            life: 1.0,
        }];

        // elapsed = 0, index 0: sway phase is 0.
        sys.advance(0.5, 0.0);
        let p = sys.particles()[0];
        assert_eq!(p.position, Vec2::new(105.0, 98.0));
        assert!((p.life - 0.9).abs() < 1e-6);
    }

    #[test]
    fn sway_depends_on_index_and_time() {
        let params = ParticleParams::default();
        assert_eq!(sway(&params, 0.0, 0), 0.0);
        let expected = (1.0f64.sin() as f32) * 5.0;
        assert!((sway(&params, 0.0, 1) - expected).abs() < 1e-6);
        let expected = ((0.25f64 * 2.0 + 3.0).sin() as f32) * 5.0;
        assert!((sway(&params, 0.25, 3) - expected).abs() < 1e-6);
    }

    #[test]
    fn particle_above_top_edge_is_respawned() {
        let mut sys = ParticleSystem::with_seed(ParticleParams::default(), viewport(), 5);
        let gone = Particle {
            position: Vec2::new(50.0, -100.0),
            velocity: Vec2::zero(),
            radius: 20.0,
            life: 1.0,
        };
        sys.particles = vec![gone];

        assert_eq!(sys.advance(0.016, 0.0), 1);
        let p = sys.particles()[0];
        assert!(p.position.y >= 0.0);
        assert!(p.life >= 0.4);
    }

    #[test]
    fn particle_touching_cull_line_survives() {
        let mut sys = ParticleSystem::with_seed(ParticleParams::default(), viewport(), 5);
        let at_line = Particle {
            position: Vec2::new(50.0, -30.0),
            velocity: Vec2::zero(),
            radius: 20.0,
            life: 1.0,
        };
        let past_line = Particle { position: Vec2::new(80.0, -30.5), ..at_line };
        sys.particles = vec![at_line, past_line];

        assert_eq!(sys.advance(0.016, 0.0), 1);
        assert_eq!(sys.particles()[0].position.y, -30.0);
        assert!(sys.particles()[1].position.y >= 0.0);
    }

    #[test]
    fn faded_particle_is_respawned() {
        let mut sys = ParticleSystem::with_seed(ParticleParams::default(), viewport(), 5);
        sys.particles = vec![Particle {
            position: Vec2::new(50.0, 300.0),
            velocity: Vec2::zero(),
            radius: 20.0,
            life: 0.001,
        }];

        assert_eq!(sys.advance(0.1, 0.0), 1);
        assert!(sys.particles()[0].life > 0.0);
    }

    #[test]
    fn resize_affects_only_new_spawns() {
        let mut sys = seeded(4, 11);
        let before = sys.particles().to_vec();
        sys.set_viewport(Viewport::new(10.0, 10.0));
        assert_eq!(sys.particles(), &before[..]);

        sys.initialize(32);
        assert!(sys.particles().iter().all(|p| p.position.x < 10.0 && p.position.y < 10.0));
    }

    // ── discs ─────────────────────────────────────────────────────────────

    #[test]
    fn discs_follow_particles() {
        let sys = seeded(16, 21);
        let discs: Vec<Disc> = sys.discs().collect();
        assert_eq!(discs.len(), 16);

        for (d, p) in discs.iter().zip(sys.particles()) {
            assert_eq!(d.center, p.position);
            assert_eq!(d.radius, p.radius);
            assert!(d.color.a <= 0.6);
            assert!((d.color.a - (p.life * 0.6).min(0.6)).abs() < 1e-6);
        }
    }
}
