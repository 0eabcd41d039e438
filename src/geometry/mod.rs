pub mod control_point;
pub mod curve;
pub mod frame;
pub mod spline;

pub use control_point::{ControlPoint, HandleMode};
pub use curve::{CurveFamily, Interpolate, Interpolator};
pub use frame::Frame;
pub use spline::{Direction, Spline, SplineSettings};
