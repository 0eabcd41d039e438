use crate::geometry::Frame;
use crate::math::vector::project_on_segment;
use crate::math::{clamp01, Point3};

use super::{ClipRange, SampleCache, SampleMode};

/// Coarse chords checked per control point segment.
const COARSE_CHECKS_PER_SEGMENT: usize = 4;

/// Closest match found so far.
#[derive(Clone, Copy)]
struct Candidate {
    frame: Frame,
    distance: f64,
}

impl Candidate {
    fn closer(self, other: Self) -> Self {
        if other.distance < self.distance {
            other
        } else {
            self
        }
    }
}

impl SampleCache {
    /// Finds the frame in `[from, to]` closest to `position`.
    ///
    /// Coarse chords, roughly four per control point segment of a spline
    /// with `control_point_count` points, narrow the search to one window.
    /// The closest sample in that window is then refined by projecting onto
    /// its two neighbouring chords. The result is never farther from
    /// `position` than any sample tested on the way.
    ///
    /// Uniform caches report the curve parameter in [`Frame::percent`].
    #[must_use]
    pub fn project(&self, position: &Point3, control_point_count: usize, from: f64, to: f64) -> Frame {
        let (mut from, mut to) = (clamp01(from), clamp01(to));
        if to < from {
            std::mem::swap(&mut from, &mut to);
        }
        let n = self.samples.len();
        if n < 2 {
            return self.evaluate(from);
        }

        let first = self.sampling_values(from).0;
        let last = match self.sampling_values(to) {
            (index, t) if t > 0.0 => index + 1,
            (index, _) => index,
        };
        let mut best = self.sample_candidate(first, position);
        if last == first {
            return self.finish(best, from, to);
        }

        // Coarse pass over chords between every `check_frequency`-th sample.
        let segments = control_point_count.saturating_sub(1).max(1);
        let check_frequency = ((n - 1) / (segments * COARSE_CHECKS_PER_SEGMENT)).max(1);
        let mut window = (first, last);
        let mut window_distance = f64::INFINITY;
        let mut a = first;
        while a < last {
            let b = (a + check_frequency).min(last);
            let (projected, _) =
                project_on_segment(&self.samples[a].position, &self.samples[b].position, position);
            let distance = (projected - position).norm_squared();
            if distance < window_distance {
                window_distance = distance;
                window = (a, b);
            }
            best = best.closer(self.sample_candidate(b, position));
            a = b;
        }

        // Fine pass over every sample inside the winning window.
        let mut closest = window.0;
        let mut closest_distance = f64::INFINITY;
        for index in window.0..=window.1 {
            let candidate = self.sample_candidate(index, position);
            if candidate.distance < closest_distance {
                closest = index;
                closest_distance = candidate.distance;
            }
            best = best.closer(candidate);
        }
        best = best.closer(self.refine_around(closest, first, last, position));

        if self.closed && first == 0 && last == n - 1 && (closest == 0 || closest == n - 1) {
            let opposite = if closest == 0 { n - 1 } else { 0 };
            let across = self.refine_around(opposite, first, last, position);
            tracing::trace!(
                closest,
                distance = best.distance,
                across = across.distance,
                "projection seam recheck"
            );
            best = best.closer(across);
        }
        self.finish(best, from, to)
    }

    /// Like [`SampleCache::project`], searching a looped `clip` as the union
    /// of `[clip.from, 1]` and `[0, clip.to]` instead of swapping its ends.
    #[must_use]
    pub fn project_looped(&self, position: &Point3, control_point_count: usize, clip: ClipRange) -> Frame {
        if !clip.is_looped() {
            return self.project(position, control_point_count, clip.from(), clip.to());
        }
        let tail = self.project(position, control_point_count, clip.from(), 1.0);
        let head = self.project(position, control_point_count, 0.0, clip.to());
        if (head.position - position).norm_squared() < (tail.position - position).norm_squared() {
            head
        } else {
            tail
        }
    }

    fn sample_candidate(&self, index: usize, position: &Point3) -> Candidate {
        let frame = self.samples[index];
        Candidate {
            distance: (frame.position - position).norm_squared(),
            frame,
        }
    }

    /// Best projection onto the chords on either side of sample `index`,
    /// limited to samples `first..=last`.
    fn refine_around(&self, index: usize, first: usize, last: usize, position: &Point3) -> Candidate {
        let mut best = self.sample_candidate(index, position);
        let chords = [
            (index > first).then(|| index - 1),
            (index < last).then_some(index),
        ];
        for start in chords.into_iter().flatten() {
            let (a, b) = (&self.samples[start], &self.samples[start + 1]);
            let (projected, t) = project_on_segment(&a.position, &b.position, position);
            let distance = (projected - position).norm_squared();
            if distance < best.distance {
                best = Candidate {
                    frame: Frame::lerp(a, b, t),
                    distance,
                };
            }
        }
        best
    }

    /// Keeps the result inside `[from, to]` and maps uniform percents back
    /// to curve parameters.
    fn finish(&self, best: Candidate, from: f64, to: f64) -> Frame {
        let mut frame = if best.frame.percent < from || best.frame.percent > to {
            self.evaluate(best.frame.percent.clamp(from, to))
        } else {
            best.frame
        };
        if self.mode == SampleMode::Uniform {
            frame.percent = self.curve_percent(frame.percent);
        }
        frame
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::tests::cache;
    use super::super::{ClipRange, SampleCache, SampleMode, SampleParams};
    use crate::geometry::spline::tests::{spline, WIGGLE};
    use crate::geometry::CurveFamily;
    use crate::math::Point3;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn projects_onto_a_straight_cache() {
        let s = spline(&[[0.0, 0.0, 0.0], [10.0, 0.0, 0.0]], CurveFamily::CatmullRom, false);
        let c = SampleCache::build(&s, SampleParams::default());
        let frame = c.project(&Point3::new(3.3, 4.0, 0.0), 2, 0.0, 1.0);
        assert_relative_eq!(frame.position, Point3::new(3.3, 0.0, 0.0), epsilon = 1e-9);
        assert_relative_eq!(frame.percent, 0.33, epsilon = 1e-9);
    }

    #[test]
    fn range_bounds_the_result() {
        let (_, c) = cache(CurveFamily::CatmullRom, false, SampleMode::Default);
        let end = c.evaluate_position(1.0);
        let frame = c.project(&end, WIGGLE.len(), 0.6, 0.2);
        assert!((0.2..=0.6).contains(&frame.percent), "{}", frame.percent);
    }

    #[test]
    fn degenerate_caches() {
        let empty = SampleCache::default();
        assert_relative_eq!(empty.project(&Point3::new(1.0, 1.0, 1.0), 0, 0.3, 0.9).percent, 0.3);

        let s = spline(&[[1.0, 2.0, 3.0]], CurveFamily::Bezier, false);
        let single = SampleCache::build(&s, SampleParams::default());
        let frame = single.project(&Point3::origin(), 1, 0.0, 1.0);
        assert_relative_eq!(frame.position, Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn closed_cache_near_the_seam() {
        let (_, c) = cache(CurveFamily::CatmullRom, true, SampleMode::Default);
        for percent in [0.001, 0.999] {
            let query = c.evaluate_position(percent);
            let frame = c.project(&query, WIGGLE.len(), 0.0, 1.0);
            assert!((frame.position - query).norm() < 1e-6, "{percent}");
        }
    }

    #[test]
    fn uniform_cache_reports_curve_parameter() {
        let (s, c) = cache(CurveFamily::CatmullRom, false, SampleMode::Uniform);
        let query = s.evaluate_position(0.4);
        let frame = c.project(&query, WIGGLE.len(), 0.0, 1.0);
        assert_relative_eq!(frame.percent, 0.4, epsilon = 0.02);
        assert!((frame.position - query).norm() < 0.05);
    }

    #[test]
    fn looped_clip_searches_across_the_seam() {
        let (_, c) = cache(CurveFamily::CatmullRom, true, SampleMode::Default);
        let clip = ClipRange::new(0.8, 0.3);
        for percent in [0.1, 0.9, 0.98] {
            let query = c.evaluate_position(percent);
            let frame = c.project_looped(&query, WIGGLE.len(), clip);
            assert!(clip.contains(frame.percent), "{percent} -> {}", frame.percent);
            assert!((frame.position - query).norm() < 1e-6, "{percent}");
        }

        let query = c.evaluate_position(0.55);
        let frame = c.project_looped(&query, WIGGLE.len(), clip);
        assert!(clip.contains(frame.percent), "{}", frame.percent);
        let swapped = c.project(&query, WIGGLE.len(), 0.8, 0.3);
        assert!((0.3..=0.8).contains(&swapped.percent));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn round_trips_cached_positions(percent in 0.02f64..0.98, closed in any::<bool>()) {
            let (_, c) = cache(CurveFamily::CatmullRom, closed, SampleMode::Default);
            let expected = c.evaluate(percent);
            let frame = c.project(&expected.position, WIGGLE.len(), 0.0, 1.0);
            prop_assert!((frame.position - expected.position).norm() < 1e-9);
            prop_assert!((frame.percent - percent).abs() < 1e-9);
            prop_assert!((frame.forward - expected.forward).norm() < 1e-6);
        }

        #[test]
        fn never_worse_than_coarse_samples(x in -5.0f64..15.0, y in -5.0f64..5.0, z in -5.0f64..10.0) {
            let (_, c) = cache(CurveFamily::CatmullRom, false, SampleMode::Default);
            let query = Point3::new(x, y, z);
            let frame = c.project(&query, WIGGLE.len(), 0.0, 1.0);
            let found = (frame.position - query).norm_squared();
            // Four coarse checks per segment over 37 samples tests every other sample.
            for sample in c.samples().iter().step_by(2) {
                prop_assert!(found <= (sample.position - query).norm_squared() + 1e-9);
            }
        }
    }
}
