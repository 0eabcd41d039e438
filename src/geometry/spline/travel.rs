use crate::math::{clamp01, lerp, move_towards};

use super::length::MIN_WALK_STEP;
use super::Spline;

/// Walk direction along a spline or sample cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards percent `1`.
    #[default]
    Forward,
    /// Towards percent `0`.
    Backward,
}

impl Direction {
    /// `1.0` for [`Direction::Forward`], `-1.0` for [`Direction::Backward`].
    #[must_use]
    pub fn sign(self) -> f64 {
        match self {
            Self::Forward => 1.0,
            Self::Backward => -1.0,
        }
    }

    /// The percent a walk in this direction ends at.
    #[must_use]
    pub fn target(self) -> f64 {
        match self {
            Self::Forward => 1.0,
            Self::Backward => 0.0,
        }
    }

    #[must_use]
    pub fn reversed(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

impl Spline {
    /// Finds the percent reached after moving `distance` along the curve.
    ///
    /// Walks in parameter steps of `move_step / resolution` and accumulates
    /// chord lengths; inside the final step the percent is interpolated by the
    /// remaining distance. Returns the reached percent and the distance
    /// actually moved, which is shorter than `distance` when the walk hits
    /// the end of the spline.
    #[must_use]
    pub fn travel(&self, start: f64, distance: f64, direction: Direction, resolution: f64) -> (f64, f64) {
        let start = clamp01(start);
        if self.points.len() < 2
            || distance.is_nan()
            || distance <= 0.0
            || !resolution.is_finite()
            || resolution <= 0.0
        {
            return (start, 0.0);
        }

        let step = (self.move_step() / resolution).max(MIN_WALK_STEP);
        let target = direction.target();
        let mut percent = start;
        let mut last = self.evaluate_position(percent);
        let mut moved = 0.0;
        while percent != target {
            let next = move_towards(percent, target, step);
            let position = self.evaluate_position(next);
            let chord = (position - last).norm();
            if moved + chord >= distance {
                let ratio = if chord > 0.0 { (distance - moved) / chord } else { 1.0 };
                return (lerp(percent, next, ratio), distance);
            }
            moved += chord;
            last = position;
            percent = next;
        }
        (percent, moved)
    }
}
