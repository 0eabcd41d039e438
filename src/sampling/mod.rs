//! Precomputed frame arrays answering spline queries without curve math.
//!
//! A [`SampleCache`] is built from a [`Spline`] in one pass and never mutated
//! afterwards. Consumers rebuild it after structural edits and swap the new
//! cache in; [`SampleCache::is_stale`] tells whether that is due.

mod clip;
mod project;
mod travel;

pub use clip::{ClipRange, ClippedSamples};

use crate::error::{Result, SettingsError};
use crate::geometry::{Direction, Frame, Spline};
use crate::math::{clamp01, inverse_lerp, Point3, TOLERANCE};

/// Resolution used to measure and walk the spline for uniform caches.
const UNIFORM_RESOLUTION: f64 = 10.0;

/// How sample parameters are distributed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SampleMode {
    /// Evenly spaced curve parameters.
    #[default]
    Default,
    /// Evenly spaced parameters, keeping only samples where the frame turns
    /// or its attributes change.
    Optimized,
    /// Evenly spaced arc length. Sample percents are distance fractions.
    Uniform,
}

/// Parameters of a cache build.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleParams {
    pub mode: SampleMode,
    /// Multiplier over [`Spline::iterations`].
    pub density: f64,
    /// Minimum turn in degrees that keeps a sample in [`SampleMode::Optimized`].
    pub angle_threshold: f64,
}

impl Default for SampleParams {
    fn default() -> Self {
        Self {
            mode: SampleMode::Default,
            density: 1.0,
            angle_threshold: 0.5,
        }
    }
}

impl SampleParams {
    /// Creates validated build parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if `density` is not finite and positive, or if
    /// `angle_threshold` is not within `[0, 180]` degrees.
    pub fn new(mode: SampleMode, density: f64, angle_threshold: f64) -> Result<Self> {
        if !density.is_finite() || density <= 0.0 {
            return Err(SettingsError::InvalidDensity(density).into());
        }
        if !(0.0..=180.0).contains(&angle_threshold) {
            return Err(SettingsError::InvalidAngleThreshold(angle_threshold).into());
        }
        Ok(Self {
            mode,
            density,
            angle_threshold,
        })
    }

    /// Default parameters with the given mode.
    #[must_use]
    pub fn with_mode(mode: SampleMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }
}

/// Frames sampled from a [`Spline`], ordered by percent.
#[derive(Debug, Clone, Default)]
pub struct SampleCache {
    samples: Vec<Frame>,
    /// Dense grid slot of every retained sample. Empty unless optimized.
    optimized_indices: Vec<usize>,
    /// Curve parameter of every sample. Empty unless uniform.
    original_percents: Vec<f64>,
    /// Number of slots of the evenly spaced grid the samples come from.
    dense_count: usize,
    mode: SampleMode,
    closed: bool,
    revision: u64,
}

/// Number of samples a build produces for `spline` at `density`.
fn sample_count(spline: &Spline, density: f64) -> usize {
    let iterations = spline.iterations();
    if iterations < 2 {
        return iterations;
    }
    #[allow(clippy::cast_precision_loss)]
    let scaled = ((iterations - 1) as f64 * density).round();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let count = scaled.max(1.0) as usize + 1;
    count
}

fn grid_percent(index: usize, count: usize) -> f64 {
    if count < 2 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let percent = index as f64 / (count - 1) as f64;
    percent
}

/// Whether `frame` differs enough from the last retained sample to be kept.
fn turns_from(kept: &Frame, frame: &Frame, threshold: f64) -> bool {
    kept.forward.angle(&frame.forward) > threshold
        || kept.up.angle(&frame.up) > threshold
        || (kept.size - frame.size).abs() > TOLERANCE
        || kept.color.max_difference(&frame.color) > TOLERANCE
}

impl SampleCache {
    /// Samples `spline` into a new cache.
    #[must_use]
    pub fn build(spline: &Spline, params: SampleParams) -> Self {
        let count = sample_count(spline, params.density);
        let mut cache = Self {
            dense_count: count,
            mode: params.mode,
            closed: spline.is_closed(),
            revision: spline.revision(),
            ..Self::default()
        };

        match params.mode {
            SampleMode::Default => {
                cache.samples = (0..count)
                    .map(|i| spline.evaluate(grid_percent(i, count)))
                    .collect();
            }
            SampleMode::Optimized => cache.build_optimized(spline, params.angle_threshold.to_radians()),
            SampleMode::Uniform => cache.build_uniform(spline),
        }

        tracing::debug!(
            mode = ?params.mode,
            dense = count,
            retained = cache.samples.len(),
            "sample cache built"
        );
        cache
    }

    fn build_optimized(&mut self, spline: &Spline, threshold: f64) {
        let count = self.dense_count;
        for i in 0..count {
            let frame = spline.evaluate(grid_percent(i, count));
            let keep = match self.samples.last() {
                None => true,
                Some(kept) => i + 1 == count || turns_from(kept, &frame, threshold),
            };
            if keep {
                self.samples.push(frame);
                self.optimized_indices.push(i);
            }
        }
    }

    fn build_uniform(&mut self, spline: &Spline) {
        let count = self.dense_count;
        if count < 2 {
            self.samples = (0..count).map(|_| spline.evaluate(0.0)).collect();
            self.original_percents = vec![0.0; count];
            return;
        }

        let length = spline.calculate_length(0.0, 1.0, UNIFORM_RESOLUTION);
        #[allow(clippy::cast_precision_loss)]
        let step = length / (count - 1) as f64;
        let mut percent = 0.0;
        for i in 0..count {
            if i + 1 == count {
                percent = 1.0;
            } else if i > 0 {
                percent = spline.travel(percent, step, Direction::Forward, UNIFORM_RESOLUTION).0;
            }
            let mut frame = spline.evaluate(percent);
            frame.percent = grid_percent(i, count);
            self.samples.push(frame);
            self.original_percents.push(percent);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub fn samples(&self) -> &[Frame] {
        &self.samples
    }

    #[must_use]
    pub fn sample(&self, index: usize) -> Option<&Frame> {
        self.samples.get(index)
    }

    /// Stored percent of the sample at `index`.
    #[must_use]
    pub fn percent_at(&self, index: usize) -> Option<f64> {
        self.samples.get(index).map(|frame| frame.percent)
    }

    /// Dense grid slots of the retained samples of an optimized cache.
    #[must_use]
    pub fn optimized_indices(&self) -> &[usize] {
        &self.optimized_indices
    }

    #[must_use]
    pub fn mode(&self) -> SampleMode {
        self.mode
    }

    /// Whether the source spline was closed when the cache was built.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Revision of the spline the cache was built from.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether `spline` changed since this cache was built from it.
    #[must_use]
    pub fn is_stale(&self, spline: &Spline) -> bool {
        self.revision != spline.revision()
    }

    /// Maps a percent to the bracketing sample `index` and the blend towards
    /// `index + 1`.
    ///
    /// Optimized caches locate the dense grid slot of `percent` among the
    /// retained slots and blend by the real percents of the two retained
    /// samples.
    #[must_use]
    pub fn sampling_values(&self, percent: f64) -> (usize, f64) {
        let n = self.samples.len();
        if n < 2 {
            return (0, 0.0);
        }
        let percent = clamp01(percent);
        if self.mode == SampleMode::Optimized {
            #[allow(clippy::cast_precision_loss)]
            let slot = percent * (self.dense_count - 1) as f64;
            #[allow(clippy::cast_precision_loss)]
            let upper = self
                .optimized_indices
                .partition_point(|&index| index as f64 <= slot)
                .clamp(1, n - 1);
            let index = upper - 1;
            let t = inverse_lerp(self.samples[index].percent, self.samples[upper].percent, percent);
            return (index, t);
        }

        #[allow(clippy::cast_precision_loss)]
        let scaled = percent * (n - 1) as f64;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let index = (scaled.floor() as usize).min(n - 2);
        #[allow(clippy::cast_precision_loss)]
        let t = scaled - index as f64;
        (index, t)
    }

    /// Interpolated frame at `percent`.
    #[must_use]
    pub fn evaluate(&self, percent: f64) -> Frame {
        match self.samples.as_slice() {
            [] => Frame {
                percent: clamp01(percent),
                ..Frame::default()
            },
            [only] => Frame {
                percent: clamp01(percent),
                ..*only
            },
            samples => {
                let (index, t) = self.sampling_values(percent);
                Frame::lerp(&samples[index], &samples[index + 1], t)
            }
        }
    }

    /// Interpolated position at `percent`.
    #[must_use]
    pub fn evaluate_position(&self, percent: f64) -> Point3 {
        match self.samples.as_slice() {
            [] => Point3::origin(),
            [only] => only.position,
            samples => {
                let (index, t) = self.sampling_values(percent);
                let (a, b) = (&samples[index].position, &samples[index + 1].position);
                Point3::from(a.coords.lerp(&b.coords, t))
            }
        }
    }

    /// Curve parameter at a cache percent.
    ///
    /// Uniform caches store distance fractions; this recovers the spline
    /// parameter behind one. Other modes return the percent unchanged.
    #[must_use]
    pub fn curve_percent(&self, percent: f64) -> f64 {
        let percent = clamp01(percent);
        if self.mode != SampleMode::Uniform || self.original_percents.len() < 2 {
            return percent;
        }
        let (index, t) = self.sampling_values(percent);
        crate::math::lerp(self.original_percents[index], self.original_percents[index + 1], t)
    }

    /// Length of the sampled polyline between two percents.
    ///
    /// Percents are clamped and swapped when `from > to`.
    #[must_use]
    pub fn calculate_length(&self, from: f64, to: f64) -> f64 {
        if self.samples.len() < 2 {
            return 0.0;
        }
        let (mut from, mut to) = (clamp01(from), clamp01(to));
        if to < from {
            std::mem::swap(&mut from, &mut to);
        }

        let (first, _) = self.sampling_values(from);
        let (last, _) = self.sampling_values(to);
        let start = self.evaluate_position(from);
        let end = self.evaluate_position(to);
        if first == last {
            return (end - start).norm();
        }

        let mut length = (self.samples[first + 1].position - start).norm();
        for pair in self.samples[first + 1..=last].windows(2) {
            length += (pair[1].position - pair[0].position).norm();
        }
        length + (end - self.samples[last].position).norm()
    }

    /// Length covered by `clip`, adding both parts of a looped range.
    #[must_use]
    pub fn calculate_looped_length(&self, clip: ClipRange) -> f64 {
        if clip.is_looped() {
            self.calculate_length(clip.from(), 1.0) + self.calculate_length(0.0, clip.to())
        } else {
            self.calculate_length(clip.from(), clip.to())
        }
    }

    /// Resolves `clip` to sample indices.
    ///
    /// `start` is the sample at or before `clip.from`, `end` the sample at or
    /// after `clip.to`. Looped ranges count the samples to the end of the
    /// cache and from its start.
    #[must_use]
    pub fn clipped_sample_count(&self, clip: ClipRange) -> ClippedSamples {
        let n = self.samples.len();
        if n < 2 {
            return ClippedSamples {
                start: 0,
                end: 0,
                count: n,
            };
        }
        let (start, _) = self.sampling_values(clip.from());
        let (index, t) = self.sampling_values(clip.to());
        let end = if t > 0.0 { index + 1 } else { index };
        let count = if clip.is_looped() {
            (end + 1) + (n - start)
        } else {
            end + 1 - start
        };
        ClippedSamples { start, end, count }
    }

    /// Frames covering `clip`: exact frames at both ends with the cached
    /// samples in between.
    ///
    /// Looped ranges continue from the start of the cache; a closed cache
    /// skips its first sample there, since it repeats the last one.
    #[must_use]
    pub fn clipped_samples(&self, clip: ClipRange) -> Vec<Frame> {
        if self.samples.is_empty() {
            return Vec::new();
        }
        let (from, to) = (clip.from(), clip.to());
        let mut frames = vec![self.evaluate(from)];
        if clip.is_looped() {
            frames.extend(self.samples.iter().filter(|f| f.percent > from));
            let skip = usize::from(self.closed);
            frames.extend(self.samples.iter().skip(skip).filter(|f| f.percent < to));
        } else {
            frames.extend(
                self.samples
                    .iter()
                    .filter(|f| f.percent > from && f.percent < to),
            );
        }
        frames.push(self.evaluate(to));
        frames
    }
}
