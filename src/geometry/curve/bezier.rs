use crate::math::{Point3, Vector3, TOLERANCE};

use super::{Interpolate, PointSpan};

/// Cubic Bezier segments built from each point's outgoing handle and the
/// next point's incoming handle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bezier;

impl Bezier {
    fn control_polygon(span: PointSpan<'_>, segment: usize) -> [Point3; 4] {
        let segment = span.clamp_segment(segment);
        let from = span.point(segment);
        let to = span.point(span.end_index(segment));
        [
            from.position(),
            from.tangent_out(),
            to.tangent_in(),
            to.position(),
        ]
    }
}

fn cubic_position(p: &[Point3; 4], t: f64) -> Point3 {
    let [a, b, c, d] = p.map(|q| q.coords);
    let mt = 1.0 - t;
    Point3::from(
        a * (mt * mt * mt) + b * (3.0 * mt * mt * t) + c * (3.0 * mt * t * t) + d * (t * t * t),
    )
}

/// Derivative of the cubic. Retracted handles give a zero derivative at the
/// segment ends; the nearest non-degenerate chord of the control polygon is
/// used instead.
fn cubic_tangent(p: &[Point3; 4], t: f64) -> Vector3 {
    let [a, b, c, d] = p.map(|q| q.coords);
    let mt = 1.0 - t;
    let derivative = (b - a) * (3.0 * mt * mt) + (c - b) * (6.0 * mt * t) + (d - c) * (3.0 * t * t);
    if derivative.norm_squared() > TOLERANCE * TOLERANCE {
        return derivative;
    }

    let fallbacks = if t < 0.5 {
        [c - a, d - a]
    } else {
        [d - b, d - a]
    };
    fallbacks
        .into_iter()
        .find(|v| v.norm_squared() > TOLERANCE * TOLERANCE)
        .unwrap_or(derivative)
}

impl Interpolate for Bezier {
    fn position(&self, span: PointSpan<'_>, segment: usize, t: f64) -> Point3 {
        cubic_position(&Self::control_polygon(span, segment), t)
    }

    fn tangent(&self, span: PointSpan<'_>, segment: usize, t: f64) -> Vector3 {
        cubic_tangent(&Self::control_polygon(span, segment), t)
    }

    fn position_and_tangent(&self, span: PointSpan<'_>, segment: usize, t: f64) -> (Point3, Vector3) {
        let polygon = Self::control_polygon(span, segment);
        (cubic_position(&polygon, t), cubic_tangent(&polygon, t))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::points;
    use super::*;
    use crate::geometry::{ControlPoint, HandleMode};
    use approx::assert_relative_eq;

    const TOL: f64 = 1e-12;

    #[test]
    fn endpoints_and_midpoint() {
        let pts = vec![
            ControlPoint::with_tangents(
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(0.0, 0.0, -1.0),
                Point3::new(0.0, 0.0, 1.0),
                HandleMode::Mirrored,
            ),
            ControlPoint::with_tangents(
                Point3::new(3.0, 0.0, 0.0),
                Point3::new(3.0, 0.0, 1.0),
                Point3::new(3.0, 0.0, -1.0),
                HandleMode::Mirrored,
            ),
        ];
        let span = PointSpan::new(&pts, false);

        assert_relative_eq!(Bezier.position(span, 0, 0.0), pts[0].position(), epsilon = TOL);
        assert_relative_eq!(Bezier.position(span, 0, 1.0), pts[1].position(), epsilon = TOL);
        // (A + 3B + 3C + D) / 8
        assert_relative_eq!(Bezier.position(span, 0, 0.5), Point3::new(1.5, 0.0, 0.75), epsilon = TOL);
        assert_relative_eq!(Bezier.tangent(span, 0, 0.0), Vector3::new(0.0, 0.0, 3.0), epsilon = TOL);
    }

    #[test]
    fn retracted_handles_use_chord() {
        let pts = points(&[[0.0, 0.0, 0.0], [2.0, 0.0, 0.0]]);
        let span = PointSpan::new(&pts, false);
        let start = Bezier.tangent(span, 0, 0.0);
        let end = Bezier.tangent(span, 0, 1.0);
        assert_relative_eq!(start.normalize(), Vector3::x(), epsilon = TOL);
        assert_relative_eq!(end.normalize(), Vector3::x(), epsilon = TOL);
    }

    #[test]
    fn closed_segment_wraps_to_first_point() {
        let pts = points(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0]]);
        let span = PointSpan::new(&pts, true);
        assert_relative_eq!(Bezier.position(span, 2, 1.0), pts[0].position(), epsilon = TOL);
    }

    #[test]
    fn segment_index_is_clamped() {
        let pts = points(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
        let span = PointSpan::new(&pts, false);
        assert_relative_eq!(Bezier.position(span, 9, 1.0), pts[1].position(), epsilon = TOL);
    }
}
