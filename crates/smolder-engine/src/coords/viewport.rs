use super::Rect;

/// Viewport size in logical pixels.
///
/// Used as the basis for screen-space projection and for sampling spawn
/// positions of ambient particles.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// The full viewport as a rectangle anchored at the origin.
    #[inline]
    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sized_viewport_is_invalid() {
        assert!(!Viewport::new(0.0, 600.0).is_valid());
        assert!(!Viewport::new(900.0, 0.0).is_valid());
        assert!(Viewport::new(900.0, 600.0).is_valid());
    }

    #[test]
    fn rect_covers_viewport() {
        assert_eq!(Viewport::new(900.0, 600.0).rect(), Rect::new(0.0, 0.0, 900.0, 600.0));
    }
}
