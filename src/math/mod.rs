pub mod color;
pub mod vector;

pub use color::Color;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Unit quaternion used for frame orientations.
pub type Rotation = nalgebra::UnitQuaternion<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Clamps a parameter into `[0, 1]`. `NaN` maps to `0`.
#[must_use]
pub fn clamp01(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Linear interpolation between two scalars. `t` is not clamped.
#[must_use]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Returns where `value` lies between `a` and `b` as a factor in `[0, 1]`.
///
/// Returns `0` when the interval is empty.
#[must_use]
pub fn inverse_lerp(a: f64, b: f64, value: f64) -> f64 {
    let span = b - a;
    if span.abs() < TOLERANCE {
        return 0.0;
    }
    clamp01((value - a) / span)
}

/// Moves `current` towards `target` by at most `step`, never overshooting.
///
/// Reaching `target` exactly is guaranteed, so `current == target` is a valid
/// loop-termination test for walks built on top of this.
#[must_use]
pub fn move_towards(current: f64, target: f64, step: f64) -> f64 {
    if current < target {
        let next = current + step;
        if next >= target {
            target
        } else {
            next
        }
    } else if current > target {
        let next = current - step;
        if next <= target {
            target
        } else {
            next
        }
    } else {
        target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp01_handles_nan_and_bounds() {
        assert_eq!(clamp01(f64::NAN), 0.0);
        assert_eq!(clamp01(-3.0), 0.0);
        assert_eq!(clamp01(7.5), 1.0);
        assert_eq!(clamp01(0.25), 0.25);
    }

    #[test]
    fn inverse_lerp_of_empty_interval_is_zero() {
        assert_eq!(inverse_lerp(0.4, 0.4, 0.9), 0.0);
        assert!((inverse_lerp(0.0, 2.0, 0.5) - 0.25).abs() < TOLERANCE);
    }

    #[test]
    fn move_towards_lands_exactly_on_target() {
        let mut value = 0.0;
        let mut steps = 0;
        while value != 1.0 {
            value = move_towards(value, 1.0, 0.3);
            steps += 1;
        }
        assert_eq!(steps, 4);
        assert_eq!(move_towards(1.0, 0.0, 0.75), 0.25);
        assert_eq!(move_towards(0.1, 0.0, 0.75), 0.0);
    }
}
