use crate::math::vector::slerp;
use crate::math::{Point3, Vector3};

use super::{Interpolate, PointSpan};

/// Straight segments between consecutive points.
///
/// With `average_tangents` the facing direction turns smoothly through each
/// corner: over the half segment around a point it is a spherical blend of the
/// incoming and outgoing segment directions. Positions are unaffected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Linear {
    average_tangents: bool,
}

impl Linear {
    #[must_use]
    pub fn new(average_tangents: bool) -> Self {
        Self { average_tangents }
    }

    #[must_use]
    pub fn averages_tangents(&self) -> bool {
        self.average_tangents
    }
}

fn segment_direction(span: PointSpan<'_>, segment: usize) -> Vector3 {
    span.point(span.end_index(segment)).position() - span.point(segment).position()
}

impl Interpolate for Linear {
    fn position(&self, span: PointSpan<'_>, segment: usize, t: f64) -> Point3 {
        let segment = span.clamp_segment(segment);
        let from = span.point(segment).position();
        let to = span.point(span.end_index(segment)).position();
        Point3::from(from.coords.lerp(&to.coords, t))
    }

    fn tangent(&self, span: PointSpan<'_>, segment: usize, t: f64) -> Vector3 {
        let segment = span.clamp_segment(segment);
        let direction = segment_direction(span, segment);
        if !self.average_tangents {
            return direction;
        }

        let segments = span.segment_count();
        if t < 0.5 {
            let previous = if segment > 0 {
                Some(segment - 1)
            } else if span.is_closed() {
                Some(segments - 1)
            } else {
                None
            };
            match previous {
                Some(previous) => slerp(&segment_direction(span, previous), &direction, 0.5 + t),
                None => direction,
            }
        } else {
            let next = if segment + 1 < segments {
                Some(segment + 1)
            } else if span.is_closed() {
                Some(0)
            } else {
                None
            };
            match next {
                Some(next) => slerp(&direction, &segment_direction(span, next), t - 0.5),
                None => direction,
            }
        }
    }
}
