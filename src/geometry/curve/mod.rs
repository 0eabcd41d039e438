mod bezier;
mod bspline;
mod catmull_rom;
mod linear;

pub use bezier::Bezier;
pub use bspline::BSpline;
pub use catmull_rom::CatmullRom;
pub use linear::Linear;

use crate::geometry::ControlPoint;
use crate::math::{Point3, Vector3};

/// Interpolation family of a spline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurveFamily {
    /// Interpolating spline through every point, with configurable knot spacing.
    #[default]
    CatmullRom,
    /// Uniform cubic B-spline; approximating, smooth to the second derivative.
    BSpline,
    /// Cubic Bezier segments driven by each point's tangent handles.
    Bezier,
    /// Straight segments between points.
    Linear,
}

/// Read-only view of a point list for one evaluation.
///
/// Resolves segment neighbours for open and closed splines. A closed flag on
/// fewer than three points is ignored.
#[derive(Debug, Clone, Copy)]
pub struct PointSpan<'a> {
    points: &'a [ControlPoint],
    closed: bool,
}

impl<'a> PointSpan<'a> {
    #[must_use]
    pub fn new(points: &'a [ControlPoint], closed: bool) -> Self {
        Self {
            points,
            closed: closed && points.len() >= 3,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Number of segments: `n` when closed, `n - 1` when open.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        let n = self.points.len();
        if self.closed {
            n
        } else {
            n.saturating_sub(1)
        }
    }

    /// Returns the point at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds; callers only pass resolved indices.
    #[must_use]
    pub fn point(&self, index: usize) -> &'a ControlPoint {
        &self.points[index]
    }

    /// Clamps a segment index into the valid range.
    #[must_use]
    pub fn clamp_segment(&self, segment: usize) -> usize {
        segment.min(self.segment_count().saturating_sub(1))
    }

    /// Index of the point ending `segment`.
    #[must_use]
    pub fn end_index(&self, segment: usize) -> usize {
        let n = self.points.len();
        if self.closed {
            (segment + 1) % n
        } else {
            (segment + 1).min(n - 1)
        }
    }

    /// Index of the point before `index`, if any.
    #[must_use]
    pub fn previous_index(&self, index: usize) -> Option<usize> {
        if index > 0 {
            Some(index - 1)
        } else if self.closed {
            Some(self.points.len() - 1)
        } else {
            None
        }
    }

    /// Index of the point after `index`, if any.
    #[must_use]
    pub fn next_index(&self, index: usize) -> Option<usize> {
        if index + 1 < self.points.len() {
            Some(index + 1)
        } else if self.closed {
            Some(0)
        } else {
            None
        }
    }

    /// The four positions `P0..P3` around `segment`, which runs from `P1` to `P2`.
    ///
    /// Missing neighbours of an open spline are extrapolated linearly from the
    /// two nearest real points; closed splines wrap around.
    #[must_use]
    pub fn window(&self, segment: usize) -> [Point3; 4] {
        let segment = self.clamp_segment(segment);
        let p1 = self.points[segment].position();
        let p2 = self.points[self.end_index(segment)].position();

        let p0 = match self.previous_index(segment) {
            Some(i) => self.points[i].position(),
            None => p1 + (p1 - p2),
        };
        let p3 = match self.next_index(segment).and_then(|i| self.next_index(i)) {
            Some(i) if self.closed || segment + 2 < self.points.len() => self.points[i].position(),
            _ => p2 + (p2 - p1),
        };
        [p0, p1, p2, p3]
    }
}

/// The two primitives every curve family provides.
///
/// `segment` is a segment index from [`PointSpan::segment_count`] and `t` the
/// local parameter in `[0, 1]`. Spans passed in hold at least two points.
pub trait Interpolate {
    /// Position on `segment` at local parameter `t`.
    fn position(&self, span: PointSpan<'_>, segment: usize, t: f64) -> Point3;

    /// Unnormalized tangent on `segment` at local parameter `t`.
    fn tangent(&self, span: PointSpan<'_>, segment: usize, t: f64) -> Vector3;

    /// Position and tangent together, for families that share intermediate terms.
    fn position_and_tangent(&self, span: PointSpan<'_>, segment: usize, t: f64) -> (Point3, Vector3) {
        (self.position(span, segment, t), self.tangent(span, segment, t))
    }
}

/// A configured curve family, selected once per spline.
#[derive(Debug, Clone, Copy)]
pub enum Interpolator {
    CatmullRom(CatmullRom),
    BSpline(BSpline),
    Bezier(Bezier),
    Linear(Linear),
}

impl Interpolator {
    /// Returns the family this interpolator evaluates.
    #[must_use]
    pub fn family(&self) -> CurveFamily {
        match self {
            Self::CatmullRom(_) => CurveFamily::CatmullRom,
            Self::BSpline(_) => CurveFamily::BSpline,
            Self::Bezier(_) => CurveFamily::Bezier,
            Self::Linear(_) => CurveFamily::Linear,
        }
    }
}

impl Interpolate for Interpolator {
    fn position(&self, span: PointSpan<'_>, segment: usize, t: f64) -> Point3 {
        match self {
            Self::CatmullRom(c) => c.position(span, segment, t),
            Self::BSpline(c) => c.position(span, segment, t),
            Self::Bezier(c) => c.position(span, segment, t),
            Self::Linear(c) => c.position(span, segment, t),
        }
    }

    fn tangent(&self, span: PointSpan<'_>, segment: usize, t: f64) -> Vector3 {
        match self {
            Self::CatmullRom(c) => c.tangent(span, segment, t),
            Self::BSpline(c) => c.tangent(span, segment, t),
            Self::Bezier(c) => c.tangent(span, segment, t),
            Self::Linear(c) => c.tangent(span, segment, t),
        }
    }

    fn position_and_tangent(&self, span: PointSpan<'_>, segment: usize, t: f64) -> (Point3, Vector3) {
        match self {
            Self::CatmullRom(c) => c.position_and_tangent(span, segment, t),
            Self::BSpline(c) => c.position_and_tangent(span, segment, t),
            Self::Bezier(c) => c.position_and_tangent(span, segment, t),
            Self::Linear(c) => c.position_and_tangent(span, segment, t),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::geometry::ControlPoint;
    use crate::math::Point3;

    pub fn points(coords: &[[f64; 3]]) -> Vec<ControlPoint> {
        coords
            .iter()
            .map(|c| ControlPoint::new(Point3::new(c[0], c[1], c[2])))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::points;
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn open_window_extrapolates_ends() {
        let pts = points(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [3.0, 0.0, 0.0]]);
        let span = PointSpan::new(&pts, false);
        assert_eq!(span.segment_count(), 2);

        let first = span.window(0);
        assert_relative_eq!(first[0], Point3::new(-1.0, 0.0, 0.0));
        assert_relative_eq!(first[3], Point3::new(3.0, 0.0, 0.0));

        let last = span.window(1);
        assert_relative_eq!(last[0], Point3::new(0.0, 0.0, 0.0));
        assert_relative_eq!(last[3], Point3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn closed_window_wraps() {
        let pts = points(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]]);
        let span = PointSpan::new(&pts, true);
        assert_eq!(span.segment_count(), 3);

        let seam = span.window(2);
        assert_relative_eq!(seam[0], Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(seam[1], Point3::new(1.0, 1.0, 0.0));
        assert_relative_eq!(seam[2], Point3::new(0.0, 0.0, 0.0));
        assert_relative_eq!(seam[3], Point3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn closed_flag_needs_three_points() {
        let pts = points(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
        let span = PointSpan::new(&pts, true);
        assert!(!span.is_closed());
        assert_eq!(span.segment_count(), 1);
    }

    #[test]
    fn interpolator_reports_family() {
        let family = Interpolator::Linear(Linear::new(false)).family();
        assert_eq!(family, CurveFamily::Linear);
    }
}
