use crate::error::{Result, StructureError};
use crate::geometry::curve::{CurveFamily, Interpolate, Interpolator, Linear};
use crate::geometry::{ControlPoint, HandleMode};
use crate::math::{Vector3, TOLERANCE};

use super::Spline;

impl Spline {
    /// Returns the control points.
    #[must_use]
    pub fn points(&self) -> &[ControlPoint] {
        &self.points
    }

    /// Returns the control point at `index`, if any.
    #[must_use]
    pub fn point(&self, index: usize) -> Option<&ControlPoint> {
        self.points.get(index)
    }

    /// Number of control points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Replaces all control points.
    pub fn set_points(&mut self, points: Vec<ControlPoint>) {
        self.points = points;
        self.clear_closed_if_too_short();
        self.mark_changed();
    }

    /// Replaces the control point at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range.
    pub fn set_point(&mut self, index: usize, point: ControlPoint) -> Result<()> {
        let len = self.points.len();
        let slot = self
            .points
            .get_mut(index)
            .ok_or(StructureError::IndexOutOfRange { index, len })?;
        *slot = point;
        self.mark_changed();
        Ok(())
    }

    /// Appends a control point.
    pub fn add_point(&mut self, point: ControlPoint) {
        self.points.push(point);
        self.mark_changed();
    }

    /// Removes and returns the control point at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range.
    pub fn remove_point(&mut self, index: usize) -> Result<ControlPoint> {
        let len = self.points.len();
        if index >= len {
            return Err(StructureError::IndexOutOfRange { index, len }.into());
        }
        let removed = self.points.remove(index);
        self.clear_closed_if_too_short();
        self.mark_changed();
        Ok(removed)
    }

    fn clear_closed_if_too_short(&mut self) {
        if self.settings.closed && self.points.len() < 3 {
            tracing::debug!(points = self.points.len(), "spline opened, too few points to stay closed");
            self.settings.closed = false;
        }
    }

    /// Closes the spline, joining the last point back to the first.
    ///
    /// # Errors
    ///
    /// Fails with [`StructureError::NotEnoughPoints`] below 3 points. The
    /// failure is logged and the spline is unchanged.
    pub fn close(&mut self) -> Result<()> {
        let actual = self.points.len();
        if actual < 3 {
            tracing::warn!(actual, "cannot close spline with fewer than 3 points");
            return Err(StructureError::NotEnoughPoints {
                required: 3,
                actual,
            }
            .into());
        }
        if !self.settings.closed {
            self.settings.closed = true;
            self.mark_changed();
        }
        Ok(())
    }

    /// Opens a closed spline at point `index`.
    ///
    /// Points are rotated so `index` comes first and a copy of it is appended,
    /// so the open spline still traces the whole loop.
    ///
    /// # Errors
    ///
    /// Fails if the spline is not closed or `index` is out of range. The
    /// failure is logged and the spline is unchanged.
    pub fn break_at(&mut self, index: usize) -> Result<()> {
        if !self.is_closed() {
            tracing::warn!(index, "cannot break a spline that is not closed");
            return Err(StructureError::NotClosed.into());
        }
        let len = self.points.len();
        if index >= len {
            tracing::warn!(index, len, "break index out of range");
            return Err(StructureError::IndexOutOfRange { index, len }.into());
        }

        self.points.rotate_left(index);
        let first = self.points[0];
        self.points.push(first);
        self.settings.closed = false;
        self.mark_changed();
        Ok(())
    }

    /// Rewrites the points as Bezier anchors and switches the family to Bezier.
    ///
    /// Anchors are the segment end positions of the current family; handles sit
    /// a third of the segment derivative away from them. Catmull-Rom and linear
    /// splines keep their exact shape; B-splines are approximated through their
    /// sampled tangents.
    pub fn convert_to_bezier(&mut self) {
        if self.settings.family == CurveFamily::Bezier {
            return;
        }
        if self.points.len() >= 2 {
            self.points = self.bezier_points();
        }
        self.set_family(CurveFamily::Bezier);
    }

    fn bezier_points(&self) -> Vec<ControlPoint> {
        let span = self.span();
        let segments = span.segment_count();
        let interpolator = match self.interpolator {
            Interpolator::Linear(_) => Interpolator::Linear(Linear::new(false)),
            other => other,
        };

        self.points
            .iter()
            .enumerate()
            .map(|(i, original)| {
                let outgoing = (i < segments).then_some(i);
                let incoming = span
                    .previous_index(i)
                    .filter(|&segment| segment < segments);

                let position = match (outgoing, incoming) {
                    (Some(segment), _) => interpolator.position(span, segment, 0.0),
                    (None, Some(segment)) => interpolator.position(span, segment, 1.0),
                    (None, None) => original.position(),
                };
                let out_arm = outgoing.map(|segment| interpolator.tangent(span, segment, 0.0) / 3.0);
                let in_arm = incoming.map(|segment| interpolator.tangent(span, segment, 1.0) / 3.0);
                let out_arm = out_arm.or(in_arm).unwrap_or_else(Vector3::zeros);
                let in_arm = in_arm.unwrap_or(out_arm);

                let mut point = ControlPoint::with_tangents(
                    position,
                    position - in_arm,
                    position + out_arm,
                    handle_mode_for(&in_arm, &out_arm),
                );
                point.set_normal(original.normal());
                point.set_size(original.size());
                point.set_color(original.color());
                point
            })
            .collect()
    }
}

/// Tightest handle mode that describes the two handle arms.
fn handle_mode_for(in_arm: &Vector3, out_arm: &Vector3) -> HandleMode {
    let scale = in_arm.norm().max(out_arm.norm()).max(1.0);
    if (in_arm - out_arm).norm() < TOLERANCE * scale * 1e3 {
        return HandleMode::Mirrored;
    }
    match (in_arm.try_normalize(TOLERANCE), out_arm.try_normalize(TOLERANCE)) {
        (Some(a), Some(b)) if a.dot(&b) > 1.0 - 1e-9 => HandleMode::Free,
        _ => HandleMode::Broken,
    }
}
