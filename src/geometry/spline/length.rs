use crate::math::{clamp01, move_towards};
use crate::sampling::ClipRange;

use super::Spline;

/// Smallest parameter step a walk may take; keeps walks terminating near 1.
pub(super) const MIN_WALK_STEP: f64 = 4.0 * f64::EPSILON;

impl Spline {
    /// Approximates the arc length between two percents.
    ///
    /// Walks from `from` to `to` in parameter steps of
    /// `move_step / resolution` and sums the chord lengths between evaluated
    /// positions. `resolution` is a density multiplier: `1` walks the
    /// full-density sample grid, larger values refine it. Percents are clamped
    /// and swapped when `from > to`. Non-positive or non-finite resolutions
    /// yield `0`.
    #[must_use]
    pub fn calculate_length(&self, from: f64, to: f64, resolution: f64) -> f64 {
        if self.points.len() < 2 || !resolution.is_finite() || resolution <= 0.0 {
            return 0.0;
        }
        let (mut from, mut to) = (clamp01(from), clamp01(to));
        if to < from {
            std::mem::swap(&mut from, &mut to);
        }

        let step = (self.move_step() / resolution).max(MIN_WALK_STEP);
        let mut percent = from;
        let mut last = self.evaluate_position(percent);
        let mut length = 0.0;
        while percent != to {
            percent = move_towards(percent, to, step);
            let position = self.evaluate_position(percent);
            length += (position - last).norm();
            last = position;
        }
        length
    }

    /// Like [`Spline::calculate_length`], following a looped `clip` across
    /// the end of the spline: from `clip.from` to `1`, then from `0` to
    /// `clip.to`.
    #[must_use]
    pub fn calculate_looped_length(&self, clip: ClipRange, resolution: f64) -> f64 {
        if clip.is_looped() {
            self.calculate_length(clip.from(), 1.0, resolution)
                + self.calculate_length(0.0, clip.to(), resolution)
        } else {
            self.calculate_length(clip.from(), clip.to(), resolution)
        }
    }

    /// Length of the whole spline at full sample density.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.calculate_length(0.0, 1.0, 1.0)
    }
}
