/// Rotation direction of the primary shape.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum RotationDirection {
    Negative,
    #[default]
    Positive,
}

impl RotationDirection {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            RotationDirection::Negative => -1.0,
            RotationDirection::Positive => 1.0,
        }
    }
}

/// Simulated time: accumulates only while running.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct AnimationClock {
    elapsed: f64,
}

impl AnimationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `dt` seconds when `running`; otherwise leaves the clock frozen.
    #[inline]
    pub fn advance(&mut self, dt: f64, running: bool) {
        if running {
            self.elapsed += dt;
        }
    }

    /// Seconds of simulated time.
    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Current shape angle in radians. Derived each frame, never stored.
    #[inline]
    pub fn rotation_angle(&self, angular_speed: f32, direction: RotationDirection) -> f32 {
        (self.elapsed * f64::from(angular_speed) * f64::from(direction.sign())) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paused_advance_leaves_elapsed_unchanged() {
        let mut c = AnimationClock::new();
        c.advance(0.5, true);
        for dt in [0.0, 0.016, 1.0, 100.0] {
            c.advance(dt, false);
            assert_eq!(c.elapsed(), 0.5);
        }
    }

    #[test]
    fn running_advance_adds_dt_exactly() {
        let mut c = AnimationClock::new();
        c.advance(0.25, true);
        let before = c.elapsed();
        c.advance(0.125, true);
        assert_eq!(c.elapsed(), before + 0.125);
    }

    #[test]
    fn angle_after_pi_seconds_is_pi() {
        let mut c = AnimationClock::new();
        c.advance(3.14159, true);
        let angle = c.rotation_angle(1.0, RotationDirection::Positive);
        assert!((angle - std::f32::consts::PI).abs() < 1e-4);
    }

    #[test]
    fn negative_direction_flips_angle() {
        let mut c = AnimationClock::new();
        c.advance(2.0, true);
        assert_eq!(c.rotation_angle(0.5, RotationDirection::Negative), -1.0);
    }

    #[test]
    fn pause_resume_is_idempotent() {
        let mut c = AnimationClock::new();
        c.advance(1.0, true);
        c.advance(1.0, false);
        c.advance(1.0, false);
        c.advance(1.0, true);
        assert_eq!(c.elapsed(), 2.0);
    }
}
