pub mod error;
pub mod geometry;
pub mod math;
pub mod sampling;

pub use error::{Result, SettingsError, SplineError, StructureError};
pub use geometry::{ControlPoint, CurveFamily, Direction, Frame, HandleMode, Spline, SplineSettings};
pub use sampling::{ClipRange, ClippedSamples, SampleCache, SampleMode, SampleParams};
