use crate::math::{Point3, Vector3, TOLERANCE};

use super::{Interpolate, PointSpan};

/// Knot parametrizations below this are evaluated with the uniform closed form.
const UNIFORM_THRESHOLD: f64 = 1e-6;

/// Catmull-Rom spline with configurable knot parametrization.
///
/// `alpha = 0` is uniform, `0.5` centripetal, `1` chordal. Non-uniform
/// variants avoid the cusps and overshoot uniform Catmull-Rom shows on
/// unevenly spaced points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatmullRom {
    alpha: f64,
}

impl CatmullRom {
    /// Creates a Catmull-Rom interpolator. `alpha` is clamped to `[0, 1]`.
    #[must_use]
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha: crate::math::clamp01(alpha),
        }
    }

    /// Returns the knot parametrization exponent.
    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    fn is_uniform(&self) -> bool {
        self.alpha < UNIFORM_THRESHOLD
    }

    /// Knot values `t0..t3` for the window, with `t0 = 0`.
    fn knots(&self, p: &[Point3; 4]) -> [f64; 4] {
        let interval = |a: &Point3, b: &Point3| {
            let dt = (b - a).norm_squared().powf(self.alpha * 0.5);
            if dt < TOLERANCE {
                1.0
            } else {
                dt
            }
        };
        let t1 = interval(&p[0], &p[1]);
        let t2 = t1 + interval(&p[1], &p[2]);
        let t3 = t2 + interval(&p[2], &p[3]);
        [0.0, t1, t2, t3]
    }
}

/// Uniform Catmull-Rom position.
fn uniform_position(p: &[Point3; 4], t: f64) -> Point3 {
    let [p0, p1, p2, p3] = p.map(|q| q.coords);
    let t2 = t * t;
    let t3 = t2 * t;
    let v = (p1 * 2.0
        + (p2 - p0) * t
        + (p0 * 2.0 - p1 * 5.0 + p2 * 4.0 - p3) * t2
        + (-p0 + p1 * 3.0 - p2 * 3.0 + p3) * t3)
        * 0.5;
    Point3::from(v)
}

/// Uniform Catmull-Rom first derivative with respect to `t`.
fn uniform_tangent(p: &[Point3; 4], t: f64) -> Vector3 {
    let [p0, p1, p2, p3] = p.map(|q| q.coords);
    ((p2 - p0)
        + (p0 * 2.0 - p1 * 5.0 + p2 * 4.0 - p3) * (2.0 * t)
        + (-p0 + p1 * 3.0 - p2 * 3.0 + p3) * (3.0 * t * t))
        * 0.5
}

/// Barry-Goldman pyramid evaluation for non-uniform knots.
///
/// Returns the position and its derivative with respect to the local
/// parameter `t` (not the knot parameter).
fn barry_goldman(p: &[Point3; 4], k: &[f64; 4], t: f64) -> (Point3, Vector3) {
    let [p0, p1, p2, p3] = p.map(|q| q.coords);
    let [t0, t1, t2, t3] = *k;
    let u = crate::math::lerp(t1, t2, t);

    let a1 = p0 * ((t1 - u) / (t1 - t0)) + p1 * ((u - t0) / (t1 - t0));
    let a2 = p1 * ((t2 - u) / (t2 - t1)) + p2 * ((u - t1) / (t2 - t1));
    let a3 = p2 * ((t3 - u) / (t3 - t2)) + p3 * ((u - t2) / (t3 - t2));

    let b1 = a1 * ((t2 - u) / (t2 - t0)) + a2 * ((u - t0) / (t2 - t0));
    let b2 = a2 * ((t3 - u) / (t3 - t1)) + a3 * ((u - t1) / (t3 - t1));

    let c = b1 * ((t2 - u) / (t2 - t1)) + b2 * ((u - t1) / (t2 - t1));

    let da1 = (p1 - p0) / (t1 - t0);
    let da2 = (p2 - p1) / (t2 - t1);
    let da3 = (p3 - p2) / (t3 - t2);

    let db1 = (a2 - a1) / (t2 - t0) + da1 * ((t2 - u) / (t2 - t0)) + da2 * ((u - t0) / (t2 - t0));
    let db2 = (a3 - a2) / (t3 - t1) + da2 * ((t3 - u) / (t3 - t1)) + da3 * ((u - t1) / (t3 - t1));

    let dc = (b2 - b1) / (t2 - t1) + db1 * ((t2 - u) / (t2 - t1)) + db2 * ((u - t1) / (t2 - t1));

    (Point3::from(c), dc * (t2 - t1))
}

impl Interpolate for CatmullRom {
    fn position(&self, span: PointSpan<'_>, segment: usize, t: f64) -> Point3 {
        let window = span.window(segment);
        if self.is_uniform() {
            uniform_position(&window, t)
        } else {
            barry_goldman(&window, &self.knots(&window), t).0
        }
    }

    fn tangent(&self, span: PointSpan<'_>, segment: usize, t: f64) -> Vector3 {
        let window = span.window(segment);
        if self.is_uniform() {
            uniform_tangent(&window, t)
        } else {
            barry_goldman(&window, &self.knots(&window), t).1
        }
    }

    fn position_and_tangent(&self, span: PointSpan<'_>, segment: usize, t: f64) -> (Point3, Vector3) {
        let window = span.window(segment);
        if self.is_uniform() {
            (uniform_position(&window, t), uniform_tangent(&window, t))
        } else {
            barry_goldman(&window, &self.knots(&window), t)
        }
    }
}
