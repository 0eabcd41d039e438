use crate::math::clamp01;

/// A sub-range of a sample cache in percents.
///
/// When `to < from` the range is looped: it runs from `from` to the end of
/// the cache and continues from the start up to `to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipRange {
    from: f64,
    to: f64,
}

impl Default for ClipRange {
    fn default() -> Self {
        Self::FULL
    }
}

impl ClipRange {
    /// The whole cache.
    pub const FULL: Self = Self { from: 0.0, to: 1.0 };

    /// Creates a range; both ends are clamped to `[0, 1]`.
    #[must_use]
    pub fn new(from: f64, to: f64) -> Self {
        Self {
            from: clamp01(from),
            to: clamp01(to),
        }
    }

    #[must_use]
    pub fn from(&self) -> f64 {
        self.from
    }

    #[must_use]
    pub fn to(&self) -> f64 {
        self.to
    }

    #[must_use]
    pub fn is_looped(&self) -> bool {
        self.to < self.from
    }

    #[must_use]
    pub fn contains(&self, percent: f64) -> bool {
        if self.is_looped() {
            percent >= self.from || percent <= self.to
        } else {
            (self.from..=self.to).contains(&percent)
        }
    }

    /// Covered fraction of the cache.
    #[must_use]
    pub fn span(&self) -> f64 {
        if self.is_looped() {
            1.0 - self.from + self.to
        } else {
            self.to - self.from
        }
    }

    /// Moves `percent` onto the nearest end of the range if it lies outside.
    #[must_use]
    pub fn clamp(&self, percent: f64) -> f64 {
        let percent = clamp01(percent);
        if self.contains(percent) {
            return percent;
        }
        if !self.is_looped() {
            return percent.clamp(self.from, self.to);
        }
        // Inside the excluded gap `(to, from)`.
        if percent - self.to <= self.from - percent {
            self.to
        } else {
            self.from
        }
    }
}

/// Sample indices covered by a [`ClipRange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClippedSamples {
    /// Index of the sample at or before the range start.
    pub start: usize,
    /// Index of the sample at or after the range end.
    pub end: usize,
    /// Number of samples from `start` to `end`, wrapping for looped ranges.
    pub count: usize,
}
