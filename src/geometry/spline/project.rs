use crate::math::{clamp01, Point3};
use crate::sampling::ClipRange;

use super::Spline;

/// Samples scanned per refinement level for every point of the spline,
/// before the per-segment sample rate is taken into account.
const MIN_SLICES: usize = 10;
const SLICE_FACTOR: usize = 5;

impl Spline {
    /// Finds the percent in `[from, to]` whose position is closest to
    /// `position`.
    ///
    /// Each of the `subdivisions` levels scans the current bracket evenly,
    /// keeps the closest sample and narrows the bracket to one scan step on
    /// either side of it. With `0` subdivisions only the bracket ends and
    /// midpoint are compared. Percents are clamped and swapped when
    /// `from > to`.
    ///
    /// On a closed spline searched over its whole range, a result close to the
    /// seam is checked against the opposite half so the seam cannot hide a
    /// closer match.
    #[must_use]
    pub fn project(&self, position: &Point3, subdivisions: u32, from: f64, to: f64) -> f64 {
        let (mut from, mut to) = (clamp01(from), clamp01(to));
        if to < from {
            std::mem::swap(&mut from, &mut to);
        }
        match self.points.len() {
            0 => return 0.0,
            1 => return from,
            _ => {}
        }

        let slices = (self.iterations() / self.points.len()).max(MIN_SLICES) * SLICE_FACTOR;
        let best = self.closest_percent(position, from, to, slices, subdivisions);
        if !self.is_closed() || from > 0.0 || to < 1.0 {
            return best;
        }

        let margin = self.move_step();
        if best >= margin && best <= 1.0 - margin {
            return best;
        }
        let (start, end) = if best < 0.5 { (0.5, 1.0) } else { (0.0, 0.5) };
        let other = self.closest_percent(position, start, end, slices, subdivisions);
        let best_distance = self.squared_distance(position, best);
        let other_distance = self.squared_distance(position, other);
        tracing::trace!(best, other, best_distance, other_distance, "projection seam recheck");
        if other_distance < best_distance {
            other
        } else {
            best
        }
    }

    /// Like [`Spline::project`], searching a looped `clip` as the union of
    /// `[clip.from, 1]` and `[0, clip.to]` instead of swapping its ends.
    #[must_use]
    pub fn project_looped(&self, position: &Point3, subdivisions: u32, clip: ClipRange) -> f64 {
        if !clip.is_looped() {
            return self.project(position, subdivisions, clip.from(), clip.to());
        }
        let tail = self.project(position, subdivisions, clip.from(), 1.0);
        let head = self.project(position, subdivisions, 0.0, clip.to());
        if self.squared_distance(position, head) < self.squared_distance(position, tail) {
            head
        } else {
            tail
        }
    }

    fn squared_distance(&self, position: &Point3, percent: f64) -> f64 {
        (self.evaluate_position(percent) - position).norm_squared()
    }

    fn closest_percent(
        &self,
        position: &Point3,
        mut start: f64,
        mut end: f64,
        slices: usize,
        depth: u32,
    ) -> f64 {
        let mut best = start;
        let mut best_distance = self.squared_distance(position, start);

        for _ in 0..depth {
            #[allow(clippy::cast_precision_loss)]
            let tick = (end - start) / slices as f64;
            if tick <= 0.0 {
                break;
            }
            for i in 0..=slices {
                #[allow(clippy::cast_precision_loss)]
                let percent = if i == slices { end } else { start + tick * i as f64 };
                let distance = self.squared_distance(position, percent);
                if distance < best_distance {
                    best = percent;
                    best_distance = distance;
                }
            }
            start = (best - tick).max(start);
            end = (best + tick).min(end);
        }

        let middle = start + (end - start) * 0.5;
        for percent in [start, end, middle] {
            let distance = self.squared_distance(position, percent);
            if distance < best_distance {
                best = percent;
                best_distance = distance;
            }
        }
        best
    }
}
