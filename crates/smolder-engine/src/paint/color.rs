/// Linear premultiplied RGBA color.
///
/// Invariant:
/// - `rgb` components are expected to be multiplied by `a` (premultiplied alpha).
///
/// Programs output premultiplied color and the backend blends with
/// `One, OneMinusSrcAlpha`, which is source-over for this representation.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32, // premultiplied
    pub g: f32, // premultiplied
    pub b: f32, // premultiplied
    pub a: f32,
}

impl Color {
    #[inline]
    pub const fn transparent() -> Self {
        Self { r: 0.0, g: 0.0, b: 0.0, a: 0.0 }
    }

    /// Fully opaque color; premultiplied and straight forms coincide.
    #[inline]
    pub const fn opaque(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Creates a premultiplied color from straight alpha components.
    ///
    /// Inputs are clamped to `[0, 1]` first.
    #[inline]
    pub fn from_straight(r: f32, g: f32, b: f32, a: f32) -> Self {
        let a = a.clamp(0.0, 1.0);
        Self {
            r: (r.clamp(0.0, 1.0)) * a,
            g: (g.clamp(0.0, 1.0)) * a,
            b: (b.clamp(0.0, 1.0)) * a,
            a,
        }
    }

    /// Returns a straight-alpha representation.
    ///
    /// For `a == 0`, RGB is returned as 0.
    #[inline]
    pub fn to_straight(self) -> (f32, f32, f32, f32) {
        if self.a <= 0.0 {
            (0.0, 0.0, 0.0, 0.0)
        } else {
            let inv = 1.0 / self.a;
            (self.r * inv, self.g * inv, self.b * inv, self.a)
        }
    }

    /// Multiplies all four straight components by `factor`, clamping the result.
    ///
    /// Used for hover highlighting, where alpha is boosted along with RGB.
    #[inline]
    pub fn brightened(self, factor: f32) -> Self {
        let (r, g, b, a) = self.to_straight();
        Self::from_straight(r * factor, g * factor, b * factor, a * factor)
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn from_straight_premultiplies() {
        let c = Color::from_straight(0.5, 1.0, 0.0, 0.5);
        assert!(approx(c.r, 0.25));
        assert!(approx(c.g, 0.5));
        assert_eq!(c.b, 0.0);
        assert_eq!(c.a, 0.5);
    }

    #[test]
    fn straight_round_trip() {
        let (r, g, b, a) = Color::from_straight(0.2, 0.75, 0.3, 0.95).to_straight();
        assert!(approx(r, 0.2) && approx(g, 0.75) && approx(b, 0.3) && approx(a, 0.95));
    }

    #[test]
    fn transparent_to_straight_is_zero() {
        assert_eq!(Color::transparent().to_straight(), (0.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn brightened_scales_and_clamps() {
        let c = Color::from_straight(0.4, 0.4, 0.4, 0.95).brightened(1.15);
        let (r, _, _, a) = c.to_straight();
        assert!(approx(r, 0.46));
        // 0.95 * 1.15 exceeds 1 and saturates.
        assert_eq!(a, 1.0);
    }
}
