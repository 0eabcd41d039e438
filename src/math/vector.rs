//! Direction helpers shared by frame interpolation and projection.

use super::{Point3, Vector3, TOLERANCE};

/// Returns a unit vector perpendicular to `v`.
///
/// The axis least aligned with `v` is used as the cross partner, so the
/// result is well conditioned for any non-zero input. A zero input yields +X.
#[must_use]
pub fn perpendicular(v: &Vector3) -> Vector3 {
    let partner = if v.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    v.cross(&partner)
        .try_normalize(TOLERANCE)
        .unwrap_or_else(Vector3::x)
}

/// Spherically interpolates between two vectors.
///
/// The direction rotates at constant angular speed from `a` to `b` while the
/// length is blended linearly. Falls back to a linear blend when either input
/// is zero-length. Antiparallel inputs rotate about an arbitrary perpendicular.
#[must_use]
pub fn slerp(a: &Vector3, b: &Vector3, t: f64) -> Vector3 {
    let len_a = a.norm();
    let len_b = b.norm();
    if len_a < TOLERANCE || len_b < TOLERANCE {
        return a.lerp(b, t);
    }

    let dir_a = a / len_a;
    let dir_b = b / len_b;
    let length = len_a + (len_b - len_a) * t;
    let dot = dir_a.dot(&dir_b).clamp(-1.0, 1.0);

    if dot > 1.0 - 1e-12 {
        return dir_a.lerp(&dir_b, t).normalize() * length;
    }

    let ortho = if dot < -1.0 + 1e-12 {
        perpendicular(&dir_a)
    } else {
        (dir_b - dir_a * dot).normalize()
    };
    let theta = dot.acos() * t;
    (dir_a * theta.cos() + ortho * theta.sin()) * length
}

/// Projects `point` onto the segment `a → b`.
///
/// Returns the projected point and its clamped factor along the segment.
/// A degenerate segment projects everything onto `a`.
#[must_use]
pub fn project_on_segment(a: &Point3, b: &Point3, point: &Point3) -> (Point3, f64) {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq < TOLERANCE * TOLERANCE {
        return (*a, 0.0);
    }
    let t = ((point - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    (a + ab * t, t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn perpendicular_is_orthogonal_and_unit() {
        for v in [Vector3::x(), Vector3::y(), Vector3::new(0.3, -2.0, 5.0)] {
            let p = perpendicular(&v);
            assert_relative_eq!(p.norm(), 1.0, epsilon = 1e-12);
            assert!(p.dot(&v).abs() < 1e-12);
        }
    }

    #[test]
    fn slerp_keeps_unit_length_midway() {
        let mid = slerp(&Vector3::x(), &Vector3::z(), 0.5);
        assert_relative_eq!(mid.norm(), 1.0, epsilon = 1e-12);
        let expected = Vector3::new(1.0, 0.0, 1.0).normalize();
        assert_relative_eq!(mid, expected, epsilon = 1e-12);
    }

    #[test]
    fn slerp_blends_length() {
        let v = slerp(&Vector3::x(), &(Vector3::y() * 3.0), 0.5);
        assert_relative_eq!(v.norm(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn slerp_antiparallel_stays_finite() {
        let v = slerp(&Vector3::x(), &-Vector3::x(), 0.5);
        assert!(v.iter().all(|c| c.is_finite()));
        assert_relative_eq!(v.norm(), 1.0, epsilon = 1e-12);
        assert!(v.dot(&Vector3::x()).abs() < 1e-12);
    }

    #[test]
    fn slerp_with_zero_vector_is_linear() {
        let v = slerp(&Vector3::zeros(), &Vector3::y(), 0.25);
        assert_relative_eq!(v, Vector3::new(0.0, 0.25, 0.0));
    }

    #[test]
    fn project_on_segment_clamps() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(10.0, 0.0, 0.0);

        let (p, t) = project_on_segment(&a, &b, &Point3::new(4.0, 3.0, 0.0));
        assert_relative_eq!(p, Point3::new(4.0, 0.0, 0.0));
        assert_relative_eq!(t, 0.4);

        let (p, t) = project_on_segment(&a, &b, &Point3::new(-5.0, 1.0, 0.0));
        assert_relative_eq!(p, a);
        assert_eq!(t, 0.0);
    }

    #[test]
    fn project_on_degenerate_segment_returns_start() {
        let a = Point3::new(1.0, 2.0, 3.0);
        let (p, t) = project_on_segment(&a, &a, &Point3::origin());
        assert_eq!(p, a);
        assert_eq!(t, 0.0);
    }
}
