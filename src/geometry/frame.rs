use crate::math::vector::{perpendicular, slerp};
use crate::math::{Color, Point3, Rotation, Vector3, TOLERANCE};

/// An evaluated point on a spline: position, orientation and attributes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub position: Point3,
    pub up: Vector3,
    /// Unit tangent direction after evaluation.
    pub forward: Vector3,
    pub color: Color,
    pub size: f64,
    /// Parameter that produced this frame.
    pub percent: f64,
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            position: Point3::origin(),
            up: Vector3::y(),
            forward: Vector3::z(),
            color: Color::WHITE,
            size: 1.0,
            percent: 0.0,
        }
    }
}

impl Frame {
    /// Unit right vector, `up × forward`.
    ///
    /// When `up` and `forward` are parallel (or either is zero) the cross
    /// product degenerates and an axis perpendicular to `forward` is used.
    #[must_use]
    pub fn right(&self) -> Vector3 {
        match self.up.cross(&self.forward).try_normalize(TOLERANCE) {
            Some(right) => right,
            None => perpendicular(&self.forward),
        }
    }

    /// Orientation mapping +Z onto `forward` and +Y towards `up`.
    #[must_use]
    pub fn rotation(&self) -> Rotation {
        if self.forward.norm_squared() < TOLERANCE {
            return Rotation::identity();
        }
        let up = if self.up.cross(&self.forward).norm_squared() < TOLERANCE {
            self.forward.cross(&self.right())
        } else {
            self.up
        };
        Rotation::face_towards(&self.forward, &up)
    }

    /// Position displaced by a local offset scaled by `size`.
    ///
    /// `offset.x` runs along [`Frame::right`], `offset.y` along `up`
    /// and `offset.z` along `forward`.
    #[must_use]
    pub fn offset_position(&self, offset: &Vector3) -> Point3 {
        let up = self.up.try_normalize(TOLERANCE).unwrap_or_else(Vector3::y);
        self.position
            + (self.right() * offset.x + up * offset.y + self.forward * offset.z) * self.size
    }

    /// Interpolates two frames.
    ///
    /// Position, size, color and percent blend linearly; `forward` and `up`
    /// blend spherically so directions keep their length through the blend.
    #[must_use]
    pub fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            position: Point3::from(a.position.coords.lerp(&b.position.coords, t)),
            up: slerp(&a.up, &b.up, t),
            forward: slerp(&a.forward, &b.forward, t),
            color: a.color.lerp(&b.color, t),
            size: crate::math::lerp(a.size, b.size, t),
            percent: crate::math::lerp(a.percent, b.percent, t),
        }
    }
}
