use crate::math::{Point3, Vector3};

use super::{Interpolate, PointSpan};

/// Uniform cubic B-spline over the same four-point window as Catmull-Rom.
///
/// The tangent is a symmetric difference of positions `step` segment units
/// apart rather than the analytic derivative. Open splines fall back to a
/// one-sided difference at their ends; closed splines wrap around the seam.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BSpline {
    step: f64,
}

impl BSpline {
    /// Creates a B-spline interpolator whose tangent difference spans `step`
    /// segment units. Non-positive steps fall back to `0.01`.
    #[must_use]
    pub fn new(step: f64) -> Self {
        let step = if step.is_finite() && step > 0.0 { step } else { 0.01 };
        Self { step }
    }

    /// Returns the tangent difference step in segment units.
    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Position at a continuous segment coordinate `u` in `[0, segments]`.
    fn position_at(span: PointSpan<'_>, u: f64) -> Point3 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let segment = span.clamp_segment(u.max(0.0).floor() as usize);
        #[allow(clippy::cast_precision_loss)]
        let t = (u - segment as f64).clamp(0.0, 1.0);
        basis_position(&span.window(segment), t)
    }
}

fn basis_position(p: &[Point3; 4], t: f64) -> Point3 {
    let [p0, p1, p2, p3] = p.map(|q| q.coords);
    let t2 = t * t;
    let t3 = t2 * t;
    let v = ((-p0 + p1 * 3.0 - p2 * 3.0 + p3) * t3
        + (p0 * 3.0 - p1 * 6.0 + p2 * 3.0) * t2
        + (p2 - p0) * (3.0 * t)
        + (p0 + p1 * 4.0 + p2))
        / 6.0;
    Point3::from(v)
}

impl Interpolate for BSpline {
    fn position(&self, span: PointSpan<'_>, segment: usize, t: f64) -> Point3 {
        basis_position(&span.window(segment), t)
    }

    fn tangent(&self, span: PointSpan<'_>, segment: usize, t: f64) -> Vector3 {
        #[allow(clippy::cast_precision_loss)]
        let segments = span.segment_count() as f64;
        #[allow(clippy::cast_precision_loss)]
        let u = span.clamp_segment(segment) as f64 + t;

        let (back, front) = if span.is_closed() {
            (
                (u - self.step).rem_euclid(segments),
                (u + self.step).rem_euclid(segments),
            )
        } else {
            ((u - self.step).max(0.0), (u + self.step).min(segments))
        };

        Self::position_at(span, front) - Self::position_at(span, back)
    }
}
