use crate::math::vector::slerp;
use crate::math::{Color, Point3, Vector3};

/// How editing one tangent handle propagates to the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandleMode {
    /// Handles are reflections of each other through the point.
    #[default]
    Mirrored,
    /// Handles are independent.
    Broken,
    /// Handles stay collinear but keep their own lengths.
    Free,
}

impl HandleMode {
    /// Most permissive of two modes: `Broken` over `Free` over `Mirrored`.
    #[must_use]
    pub fn loosest(self, other: Self) -> Self {
        match (self, other) {
            (Self::Broken, _) | (_, Self::Broken) => Self::Broken,
            (Self::Free, _) | (_, Self::Free) => Self::Free,
            _ => Self::Mirrored,
        }
    }
}

/// A spline anchor with two tangent handles and per-point attributes.
///
/// Handles are stored as absolute positions. Setters keep the handle pair
/// consistent with [`HandleMode`]: moving one handle re-derives the other
/// as a documented side effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPoint {
    position: Point3,
    tangent_in: Point3,
    tangent_out: Point3,
    normal: Vector3,
    size: f64,
    color: Color,
    handle_mode: HandleMode,
}

impl ControlPoint {
    /// Creates a point with both handles collapsed onto `position`,
    /// normal +Y, size 1 and white color.
    #[must_use]
    pub fn new(position: Point3) -> Self {
        Self {
            position,
            tangent_in: position,
            tangent_out: position,
            normal: Vector3::y(),
            size: 1.0,
            color: Color::WHITE,
            handle_mode: HandleMode::Mirrored,
        }
    }

    /// Creates a point with explicit handles, stored as given.
    #[must_use]
    pub fn with_tangents(
        position: Point3,
        tangent_in: Point3,
        tangent_out: Point3,
        handle_mode: HandleMode,
    ) -> Self {
        Self {
            tangent_in,
            tangent_out,
            handle_mode,
            ..Self::new(position)
        }
    }

    /// Returns the anchor position.
    #[must_use]
    pub fn position(&self) -> Point3 {
        self.position
    }

    /// Returns the incoming handle position.
    #[must_use]
    pub fn tangent_in(&self) -> Point3 {
        self.tangent_in
    }

    /// Returns the outgoing handle position.
    #[must_use]
    pub fn tangent_out(&self) -> Point3 {
        self.tangent_out
    }

    #[must_use]
    pub fn normal(&self) -> Vector3 {
        self.normal
    }

    #[must_use]
    pub fn size(&self) -> f64 {
        self.size
    }

    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    #[must_use]
    pub fn handle_mode(&self) -> HandleMode {
        self.handle_mode
    }

    /// Moves the point, translating both handles by the same delta.
    pub fn set_position(&mut self, position: Point3) {
        let delta = position - self.position;
        self.position = position;
        self.tangent_in += delta;
        self.tangent_out += delta;
    }

    /// Sets the incoming handle and re-derives the outgoing one per the handle mode.
    pub fn set_tangent_in(&mut self, tangent: Point3) {
        self.tangent_in = tangent;
        self.tangent_out = self.paired_handle(&tangent, &self.tangent_out);
    }

    /// Sets the outgoing handle and re-derives the incoming one per the handle mode.
    pub fn set_tangent_out(&mut self, tangent: Point3) {
        self.tangent_out = tangent;
        self.tangent_in = self.paired_handle(&tangent, &self.tangent_in);
    }

    /// Sets the normal. Zero vectors are accepted and stored as-is.
    pub fn set_normal(&mut self, normal: Vector3) {
        self.normal = normal;
    }

    pub fn set_size(&mut self, size: f64) {
        self.size = size;
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Changes the handle mode. Handles are not touched until the next handle edit.
    pub fn set_handle_mode(&mut self, mode: HandleMode) {
        self.handle_mode = mode;
    }

    /// Position of the handle opposite to `moved`, given its current position `other`.
    fn paired_handle(&self, moved: &Point3, other: &Point3) -> Point3 {
        let reflected = self.position - moved;
        match self.handle_mode {
            HandleMode::Mirrored => self.position + reflected,
            HandleMode::Free => {
                let length = (other - self.position).norm();
                match reflected.try_normalize(crate::math::TOLERANCE) {
                    Some(dir) => self.position + dir * length,
                    None => *other,
                }
            }
            HandleMode::Broken => *other,
        }
    }

    /// Interpolates two control points.
    ///
    /// The handle mode is the loosest of the two. Handles come from the two
    /// inner levels of De Casteljau's construction over
    /// `a.position, a.tangent_out, b.tangent_in, b.position`, so the result
    /// keeps the curvature of the Bezier segment between `a` and `b`.
    #[must_use]
    pub fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        let p01 = a.position.coords.lerp(&a.tangent_out.coords, t);
        let p12 = a.tangent_out.coords.lerp(&b.tangent_in.coords, t);
        let p23 = b.tangent_in.coords.lerp(&b.position.coords, t);

        Self {
            position: Point3::from(a.position.coords.lerp(&b.position.coords, t)),
            tangent_in: Point3::from(p01.lerp(&p12, t)),
            tangent_out: Point3::from(p12.lerp(&p23, t)),
            normal: slerp(&a.normal, &b.normal, t),
            size: crate::math::lerp(a.size, b.size, t),
            color: a.color.lerp(&b.color, t),
            handle_mode: a.handle_mode.loosest(b.handle_mode),
        }
    }
}

impl Default for ControlPoint {
    fn default() -> Self {
        Self::new(Point3::origin())
    }
}
