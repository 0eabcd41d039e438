use thiserror::Error;

/// Top-level error type for curvetrack.
#[derive(Debug, Error, PartialEq)]
pub enum SplineError {
    #[error(transparent)]
    Structure(#[from] StructureError),

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// Errors raised by structural edits of a spline's point list.
///
/// A structural request that fails leaves the spline untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StructureError {
    #[error("operation requires at least {required} control points, spline has {actual}")]
    NotEnoughPoints { required: usize, actual: usize },

    #[error("control point index {index} is out of range for {len} points")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("spline is not closed")]
    NotClosed,
}

/// Errors related to invalid configuration values.
#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("sample rate must be at least 2, got {0}")]
    InvalidSampleRate(u32),

    #[error("sample density must be finite and positive, got {0}")]
    InvalidDensity(f64),

    #[error("optimization angle threshold must be within 0 and 180 degrees, got {0}")]
    InvalidAngleThreshold(f64),
}

/// Convenience type alias for results using [`SplineError`].
pub type Result<T> = std::result::Result<T, SplineError>;
