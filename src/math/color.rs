/// Linear RGBA color with components nominally in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Creates a color from its components.
    #[must_use]
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Component-wise linear interpolation. `t` is not clamped.
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        Self {
            r: super::lerp(self.r, other.r, t),
            g: super::lerp(self.g, other.g, t),
            b: super::lerp(self.b, other.b, t),
            a: super::lerp(self.a, other.a, t),
        }
    }

    /// Largest absolute component difference between two colors.
    #[must_use]
    pub fn max_difference(&self, other: &Self) -> f64 {
        (self.r - other.r)
            .abs()
            .max((self.g - other.g).abs())
            .max((self.b - other.b).abs())
            .max((self.a - other.a).abs())
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}
