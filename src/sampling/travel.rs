use crate::geometry::{Direction, Frame};
use crate::math::{lerp, Point3, Vector3};

use super::{ClipRange, SampleCache};

/// Distance bookkeeping of one walk over the cached samples.
struct Walk<'a> {
    cache: &'a SampleCache,
    offset: Option<Vector3>,
    distance: f64,
    moved: f64,
    last: Point3,
}

impl Walk<'_> {
    fn position_of(&self, frame: &Frame) -> Point3 {
        match &self.offset {
            Some(offset) => frame.offset_position(offset),
            None => frame.position,
        }
    }

    /// Moves from `percent` to `frame`. Returns the reached percent when the
    /// distance runs out on the way.
    fn step(&mut self, percent: f64, frame: &Frame) -> Option<f64> {
        let position = self.position_of(frame);
        let chord = (position - self.last).norm();
        if self.moved + chord >= self.distance {
            let ratio = if chord > 0.0 {
                (self.distance - self.moved) / chord
            } else {
                1.0
            };
            self.moved = self.distance;
            return Some(lerp(percent, frame.percent, ratio));
        }
        self.moved += chord;
        self.last = position;
        None
    }

    /// Walks from `from` to `to` through every cached sample between them.
    fn leg(&mut self, from: f64, to: f64) -> Option<f64> {
        let cache = self.cache;
        let mut percent = from;
        if to >= from {
            let first = cache.samples.partition_point(|f| f.percent <= from);
            for frame in cache.samples[first..].iter().take_while(|f| f.percent < to) {
                if let Some(reached) = self.step(percent, frame) {
                    return Some(reached);
                }
                percent = frame.percent;
            }
        } else {
            let first = cache.samples.partition_point(|f| f.percent < from);
            for frame in cache.samples[..first].iter().rev().take_while(|f| f.percent > to) {
                if let Some(reached) = self.step(percent, frame) {
                    return Some(reached);
                }
                percent = frame.percent;
            }
        }
        let end = Frame {
            percent: to,
            ..cache.evaluate(to)
        };
        self.step(percent, &end)
    }

    /// Continues from the opposite end of the cache without covering distance.
    fn jump(&mut self, percent: f64) {
        self.last = self.position_of(&self.cache.evaluate(percent));
    }
}

impl SampleCache {
    /// Finds the percent reached after moving `distance` over the samples.
    ///
    /// Walks sample by sample from `start` and interpolates inside the final
    /// chord. The walk stops at the end of `clip` in `direction`. A looped clip
    /// continues across the cache edge: walking forward past percent `1`
    /// resumes at `0` (and backward past `0` at `1`) without counting the jump
    /// as distance. A `start` outside `clip` is moved onto its nearest end.
    ///
    /// Returns the reached percent and the distance moved.
    #[must_use]
    pub fn travel(&self, start: f64, distance: f64, direction: Direction, clip: ClipRange) -> (f64, f64) {
        self.walk(start, distance, direction, clip, None)
    }

    /// Like [`SampleCache::travel`], measuring distance between sample
    /// positions displaced by `offset` (see [`Frame::offset_position`]).
    #[must_use]
    pub fn travel_with_offset(
        &self,
        start: f64,
        distance: f64,
        direction: Direction,
        offset: &Vector3,
        clip: ClipRange,
    ) -> (f64, f64) {
        self.walk(start, distance, direction, clip, Some(*offset))
    }

    fn walk(
        &self,
        start: f64,
        distance: f64,
        direction: Direction,
        clip: ClipRange,
        offset: Option<Vector3>,
    ) -> (f64, f64) {
        let start = clip.clamp(start);
        if self.samples.len() < 2 || distance.is_nan() || distance <= 0.0 {
            return (start, 0.0);
        }

        let mut walk = Walk {
            cache: self,
            offset,
            distance,
            moved: 0.0,
            last: Point3::origin(),
        };
        walk.jump(start);

        let (limit, crosses_edge) = match direction {
            Direction::Forward => (clip.to(), clip.is_looped() && start > clip.to()),
            Direction::Backward => (clip.from(), clip.is_looped() && start < clip.from()),
        };
        let mut percent = start;
        if crosses_edge {
            if let Some(reached) = walk.leg(start, direction.target()) {
                return (reached, walk.moved);
            }
            percent = direction.reversed().target();
            walk.jump(percent);
        }
        match walk.leg(percent, limit) {
            Some(reached) => (reached, walk.moved),
            None => (limit, walk.moved),
        }
    }
}
