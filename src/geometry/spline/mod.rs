mod edit;
mod length;
mod project;
mod travel;

pub use travel::Direction;

use crate::error::{Result, SettingsError};
use crate::geometry::curve::{
    BSpline, Bezier, CatmullRom, CurveFamily, Interpolate, Interpolator, Linear, PointSpan,
};
use crate::geometry::{ControlPoint, Frame};
use crate::math::vector::slerp;
use crate::math::{clamp01, Point3, Vector3, TOLERANCE};

/// Configuration of a [`Spline`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplineSettings {
    pub family: CurveFamily,
    /// Requested closed state; ignored while the spline has fewer than 3 points.
    pub closed: bool,
    /// Samples per segment used to derive [`Spline::iterations`]. At least 2.
    pub sample_rate: u32,
    /// Catmull-Rom knot exponent: `0` uniform, `0.5` centripetal, `1` chordal.
    pub knot_parametrization: f64,
    /// Blend segment directions through corners of linear splines.
    pub average_linear_tangents: bool,
}

impl Default for SplineSettings {
    fn default() -> Self {
        Self {
            family: CurveFamily::CatmullRom,
            closed: false,
            sample_rate: 10,
            knot_parametrization: 0.0,
            average_linear_tangents: false,
        }
    }
}

impl SplineSettings {
    fn validate(&self) -> std::result::Result<(), SettingsError> {
        if self.sample_rate < 2 {
            return Err(SettingsError::InvalidSampleRate(self.sample_rate));
        }
        Ok(())
    }

    fn interpolator(&self) -> Interpolator {
        match self.family {
            CurveFamily::CatmullRom => {
                Interpolator::CatmullRom(CatmullRom::new(self.knot_parametrization))
            }
            CurveFamily::BSpline => {
                Interpolator::BSpline(BSpline::new(1.0 / f64::from(self.sample_rate - 1)))
            }
            CurveFamily::Bezier => Interpolator::Bezier(Bezier),
            CurveFamily::Linear => Interpolator::Linear(Linear::new(self.average_linear_tangents)),
        }
    }
}

/// An ordered list of control points evaluated by one curve family.
///
/// All parameters are normalized percents. Values outside `[0, 1]` are
/// clamped, never rejected. Empty splines evaluate to the origin and a
/// single point evaluates to a constant frame.
///
/// Evaluation is a pure function of the spline state; a spline is freely
/// shareable between readers as long as nobody edits it concurrently.
#[derive(Debug, Clone)]
pub struct Spline {
    points: Vec<ControlPoint>,
    settings: SplineSettings,
    interpolator: Interpolator,
    value_response: Option<fn(f64) -> f64>,
    revision: u64,
}

impl Default for Spline {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Spline {
    /// Creates a spline with default settings.
    #[must_use]
    pub fn new(points: Vec<ControlPoint>) -> Self {
        let settings = SplineSettings::default();
        Self {
            points,
            settings,
            interpolator: settings.interpolator(),
            value_response: None,
            revision: 0,
        }
    }

    /// Creates a spline with explicit settings.
    ///
    /// A `closed` request on fewer than 3 points is cleared.
    ///
    /// # Errors
    ///
    /// Returns an error if `sample_rate` is below 2.
    pub fn with_settings(points: Vec<ControlPoint>, mut settings: SplineSettings) -> Result<Self> {
        settings.validate()?;
        settings.closed &= points.len() >= 3;
        Ok(Self {
            points,
            settings,
            interpolator: settings.interpolator(),
            value_response: None,
            revision: 0,
        })
    }

    /// Returns the current settings.
    #[must_use]
    pub fn settings(&self) -> &SplineSettings {
        &self.settings
    }

    #[must_use]
    pub fn family(&self) -> CurveFamily {
        self.settings.family
    }

    /// Whether the spline is closed. Always `false` below 3 points.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.settings.closed && self.points.len() >= 3
    }

    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.settings.sample_rate
    }

    /// Counter bumped by every structural edit and by [`Spline::mark_changed`].
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Records an external change so caches built earlier report stale.
    pub fn mark_changed(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Switches the curve family.
    pub fn set_family(&mut self, family: CurveFamily) {
        if self.settings.family == family {
            return;
        }
        tracing::debug!(?family, "spline family changed");
        self.settings.family = family;
        self.rebuild_interpolator();
    }

    /// Sets the samples-per-segment density.
    ///
    /// # Errors
    ///
    /// Returns an error if `sample_rate` is below 2; the spline is unchanged.
    pub fn set_sample_rate(&mut self, sample_rate: u32) -> Result<()> {
        let settings = SplineSettings {
            sample_rate,
            ..self.settings
        };
        settings.validate()?;
        self.settings = settings;
        self.rebuild_interpolator();
        Ok(())
    }

    /// Sets the Catmull-Rom knot exponent, clamped to `[0, 1]`.
    pub fn set_knot_parametrization(&mut self, alpha: f64) {
        self.settings.knot_parametrization = clamp01(alpha);
        self.rebuild_interpolator();
    }

    pub fn set_average_linear_tangents(&mut self, average: bool) {
        self.settings.average_linear_tangents = average;
        self.rebuild_interpolator();
    }

    /// Remaps the blend factor used for size and color between points.
    ///
    /// `None` restores linear blending.
    pub fn set_value_response(&mut self, response: Option<fn(f64) -> f64>) {
        self.value_response = response;
        self.mark_changed();
    }

    fn rebuild_interpolator(&mut self) {
        self.interpolator = self.settings.interpolator();
        self.mark_changed();
    }

    fn span(&self) -> PointSpan<'_> {
        PointSpan::new(&self.points, self.is_closed())
    }

    /// Number of segments: `n` when closed, `n - 1` when open.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.span().segment_count()
    }

    /// Total sample count of a full-density rebuild.
    ///
    /// Linear splines sample each point once (plus the closing point);
    /// other families sample `sample_rate` points per segment with shared
    /// segment ends.
    #[must_use]
    pub fn iterations(&self) -> usize {
        let n = self.points.len();
        if n < 2 {
            return n;
        }
        let segments = self.segment_count();
        match self.settings.family {
            CurveFamily::Linear => n + usize::from(self.is_closed()),
            _ => self.settings.sample_rate as usize * segments - segments + 1,
        }
    }

    /// Percent distance between two consecutive full-density samples.
    #[must_use]
    pub fn move_step(&self) -> f64 {
        let iterations = self.iterations();
        if iterations < 2 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let step = 1.0 / (iterations - 1) as f64;
        step
    }

    /// Maps a percent to a segment index and local parameter in `[0, 1]`.
    fn locate(&self, percent: f64) -> (usize, f64) {
        let segments = self.segment_count();
        #[allow(clippy::cast_precision_loss)]
        let scaled = clamp01(percent) * segments as f64;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let segment = (scaled.floor() as usize).min(segments - 1);
        #[allow(clippy::cast_precision_loss)]
        let t = scaled - segment as f64;
        (segment, t)
    }

    /// Percent at which the point `index` lies. Indices past the end map to 1.
    #[must_use]
    pub fn point_index_to_percent(&self, index: usize) -> f64 {
        let segments = self.segment_count();
        if segments == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let percent = index as f64 / segments as f64;
        clamp01(percent)
    }

    /// Evaluates the full frame at `percent`.
    #[must_use]
    pub fn evaluate(&self, percent: f64) -> Frame {
        let percent = clamp01(percent);
        match self.points.as_slice() {
            [] => Frame {
                percent,
                ..Frame::default()
            },
            [only] => Frame {
                position: only.position(),
                up: only.normal(),
                forward: Vector3::z(),
                color: only.color(),
                size: only.size(),
                percent,
            },
            _ => {
                let span = self.span();
                let (segment, t) = self.locate(percent);
                let from = span.point(segment);
                let to = span.point(span.end_index(segment));
                let blend = self.value_response.map_or(t, |response| response(t));
                let (position, tangent) = self.interpolator.position_and_tangent(span, segment, t);

                Frame {
                    position,
                    up: slerp(&from.normal(), &to.normal(), t),
                    forward: tangent.try_normalize(TOLERANCE).unwrap_or_else(Vector3::z),
                    color: from.color().lerp(&to.color(), blend),
                    size: crate::math::lerp(from.size(), to.size(), blend),
                    percent,
                }
            }
        }
    }

    /// Evaluates only the position at `percent`.
    #[must_use]
    pub fn evaluate_position(&self, percent: f64) -> Point3 {
        match self.points.as_slice() {
            [] => Point3::origin(),
            [only] => only.position(),
            _ => {
                let (segment, t) = self.locate(percent);
                self.interpolator.position(self.span(), segment, t)
            }
        }
    }

    /// Evaluates the unit tangent at `percent`.
    ///
    /// Returns zero for an empty spline and +Z for a single point or a
    /// degenerate tangent.
    #[must_use]
    pub fn evaluate_tangent(&self, percent: f64) -> Vector3 {
        match self.points.as_slice() {
            [] => Vector3::zeros(),
            [_] => Vector3::z(),
            _ => {
                let (segment, t) = self.locate(percent);
                self.interpolator
                    .tangent(self.span(), segment, t)
                    .try_normalize(TOLERANCE)
                    .unwrap_or_else(Vector3::z)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use crate::geometry::HandleMode;
    use crate::math::Color;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    const TOL: f64 = 1e-9;

    pub fn spline(coords: &[[f64; 3]], family: CurveFamily, closed: bool) -> Spline {
        let points = coords
            .iter()
            .map(|c| ControlPoint::new(Point3::new(c[0], c[1], c[2])))
            .collect();
        Spline::with_settings(
            points,
            SplineSettings {
                family,
                closed,
                ..SplineSettings::default()
            },
        )
        .unwrap()
    }

    pub const WIGGLE: [[f64; 3]; 5] = [
        [0.0, 0.0, 0.0],
        [2.0, 1.0, 0.0],
        [3.0, 0.0, 4.0],
        [7.0, -1.0, 5.0],
        [9.0, 0.0, 2.0],
    ];

    pub const ALL_FAMILIES: [CurveFamily; 4] = [
        CurveFamily::CatmullRom,
        CurveFamily::BSpline,
        CurveFamily::Bezier,
        CurveFamily::Linear,
    ];

    /// Open Bezier square corner path with handles a third along each edge.
    fn bezier_square() -> Spline {
        let corners = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 10.0),
            Point3::new(0.0, 0.0, 10.0),
        ];
        let points = (0..corners.len())
            .map(|i| {
                let p = corners[i];
                let tangent_in = if i > 0 {
                    p + (corners[i - 1] - p) / 3.0
                } else {
                    p
                };
                let tangent_out = if i + 1 < corners.len() {
                    p + (corners[i + 1] - p) / 3.0
                } else {
                    p
                };
                ControlPoint::with_tangents(p, tangent_in, tangent_out, HandleMode::Broken)
            })
            .collect();
        Spline::with_settings(
            points,
            SplineSettings {
                family: CurveFamily::Bezier,
                ..SplineSettings::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn iterations_follow_family_and_closure() {
        let open = spline(&WIGGLE, CurveFamily::CatmullRom, false);
        assert_eq!(open.iterations(), 10 * 4 - 4 + 1);
        let closed = spline(&WIGGLE, CurveFamily::CatmullRom, true);
        assert_eq!(closed.iterations(), 10 * 5 - 5 + 1);
        assert_eq!(spline(&WIGGLE, CurveFamily::Linear, false).iterations(), 5);
        assert_eq!(spline(&WIGGLE, CurveFamily::Linear, true).iterations(), 6);
        assert_eq!(Spline::default().iterations(), 0);
    }

    #[test]
    fn closed_needs_three_points() {
        let s = spline(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]], CurveFamily::CatmullRom, true);
        assert!(!s.is_closed());
        assert_eq!(s.segment_count(), 1);
    }

    #[test]
    fn invalid_sample_rate_is_rejected() {
        let result = Spline::with_settings(
            Vec::new(),
            SplineSettings {
                sample_rate: 1,
                ..SplineSettings::default()
            },
        );
        assert!(result.is_err());

        let mut s = Spline::default();
        assert!(s.set_sample_rate(0).is_err());
        assert_eq!(s.sample_rate(), 10);
    }

    #[test]
    fn empty_and_single_point_are_safe() {
        let empty = Spline::default();
        let frame = empty.evaluate(0.5);
        assert_relative_eq!(frame.position, Point3::origin());
        assert_relative_eq!(empty.evaluate_tangent(0.5), Vector3::zeros());

        let mut point = ControlPoint::new(Point3::new(1.0, 2.0, 3.0));
        point.set_size(4.0);
        let single = Spline::new(vec![point]);
        for percent in [0.0, 0.3, 1.0] {
            let frame = single.evaluate(percent);
            assert_relative_eq!(frame.position, Point3::new(1.0, 2.0, 3.0));
            assert_relative_eq!(frame.forward, Vector3::z());
            assert_relative_eq!(frame.size, 4.0);
        }
    }

    #[test]
    fn endpoints_match_control_points_for_every_family() {
        for family in ALL_FAMILIES {
            let s = spline(&WIGGLE, family, false);
            let first = s.evaluate(s.point_index_to_percent(0)).position;
            assert_relative_eq!(first, s.points()[0].position(), epsilon = TOL);
            assert_relative_eq!(s.evaluate(1.0).position, s.points()[4].position(), epsilon = TOL);
        }
    }

    #[test]
    fn closed_seam_is_continuous() {
        for family in [CurveFamily::CatmullRom, CurveFamily::BSpline, CurveFamily::Linear] {
            let s = spline(&WIGGLE, family, true);
            let start = s.evaluate(0.0);
            let end = s.evaluate(1.0);
            assert_relative_eq!(start.position, end.position, epsilon = TOL);

            let just_before = s.evaluate(1.0 - 1e-7);
            assert_relative_eq!(just_before.position, start.position, epsilon = 1e-4);
            if family != CurveFamily::Linear {
                assert!(start.forward.dot(&end.forward) > 1.0 - 1e-9, "{family:?}");
                assert!(start.forward.dot(&just_before.forward) > 1.0 - 1e-4, "{family:?}");
            }
        }
    }

    #[test]
    fn percent_is_clamped() {
        let s = spline(&WIGGLE, CurveFamily::CatmullRom, false);
        assert_relative_eq!(s.evaluate(-3.0).position, s.evaluate(0.0).position);
        assert_relative_eq!(s.evaluate(7.0).position, s.evaluate(1.0).position);
        assert_relative_eq!(s.evaluate(7.0).percent, 1.0);
    }

    #[test]
    fn bezier_square_scenario() {
        let s = bezier_square();
        let start = s.evaluate(0.0);
        assert_relative_eq!(start.position, Point3::new(0.0, 0.0, 0.0), epsilon = TOL);
        assert_relative_eq!(start.forward, Vector3::x(), epsilon = TOL);

        // 0.5 of three segments lands halfway along the second edge.
        let mid = s.evaluate(0.5);
        assert_relative_eq!(mid.position, Point3::new(10.0, 0.0, 5.0), epsilon = TOL);
        assert_relative_eq!(mid.forward, Vector3::z(), epsilon = TOL);
    }

    #[test]
    fn point_index_to_percent_open_and_closed() {
        let open = spline(&WIGGLE, CurveFamily::CatmullRom, false);
        assert_relative_eq!(open.point_index_to_percent(2), 0.5);
        assert_relative_eq!(open.point_index_to_percent(99), 1.0);
        let closed = spline(&WIGGLE, CurveFamily::CatmullRom, true);
        assert_relative_eq!(closed.point_index_to_percent(1), 0.2);

        for i in 0..WIGGLE.len() {
            let p = open.evaluate_position(open.point_index_to_percent(i));
            assert_relative_eq!(p, open.points()[i].position(), epsilon = TOL);
        }
    }

    #[test]
    fn attributes_interpolate_between_points() {
        let mut s = spline(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]], CurveFamily::Linear, false);
        let mut end = s.points()[1];
        end.set_size(3.0);
        end.set_color(Color::new(0.0, 0.0, 0.0, 0.0));
        end.set_normal(Vector3::z());
        s.set_point(1, end).unwrap();

        let frame = s.evaluate(0.5);
        assert_relative_eq!(frame.size, 2.0);
        assert_relative_eq!(frame.color.a, 0.5);
        assert_relative_eq!(frame.up, Vector3::new(0.0, 1.0, 1.0).normalize(), epsilon = TOL);

        s.set_value_response(Some(|t| t * t));
        assert_relative_eq!(s.evaluate(0.5).size, 1.5);
    }

    #[test]
    fn setting_changes_bump_revision() {
        let mut s = spline(&WIGGLE, CurveFamily::CatmullRom, false);
        let before = s.revision();
        s.set_family(CurveFamily::BSpline);
        s.set_knot_parametrization(0.5);
        assert_eq!(s.revision(), before + 2);
        s.set_family(CurveFamily::BSpline);
        assert_eq!(s.revision(), before + 2);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn forward_is_unit_length(percent in -0.5f64..1.5, family_index in 0usize..4, closed in any::<bool>()) {
            let s = spline(&WIGGLE, ALL_FAMILIES[family_index], closed);
            let frame = s.evaluate(percent);
            prop_assert!((frame.forward.norm() - 1.0).abs() < 1e-9);
            prop_assert!((0.0..=1.0).contains(&frame.percent));
        }

        #[test]
        fn evaluate_agrees_with_position_and_tangent(percent in 0.0f64..=1.0, family_index in 0usize..4) {
            let s = spline(&WIGGLE, ALL_FAMILIES[family_index], false);
            let frame = s.evaluate(percent);
            prop_assert!((frame.position - s.evaluate_position(percent)).norm() < 1e-12);
            prop_assert!((frame.forward - s.evaluate_tangent(percent)).norm() < 1e-12);
        }
    }
}
