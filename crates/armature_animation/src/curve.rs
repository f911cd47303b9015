//! Catmull-Rom spline through recorded keyframe positions.
//!
//! The curve is open (no looping) and passes through every control point.
//! The first and last segments use phantom end points reflected from their
//! neighbours, so the curve starts exactly at the first control point and
//! ends exactly at the last one.
//!
//! Sampling is uniform in the curve parameter, **not** in arc length. A
//! segment between two distant control points is traversed at the same
//! parameter rate as a short one.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Knot parameterization of the spline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CurveType {
    /// Knot spacing `|Δ|^0.5`. Avoids cusps and self-intersections.
    Centripetal,
    /// Knot spacing `|Δ|`.
    Chordal,
    /// Uniform knots with the given tangent tension (0.5 is the classic
    /// Catmull-Rom).
    Uniform { tension: f32 },
}

impl Default for CurveType {
    #[inline]
    fn default() -> Self {
        Self::Centripetal
    }
}

impl CurveType {
    /// Exponent applied to the *squared* distance between control points.
    fn knot_power(self) -> f32 {
        match self {
            Self::Chordal => 0.5,
            Self::Centripetal | Self::Uniform { .. } => 0.25,
        }
    }
}

// Hermite form of one segment: c0 + c1·t + c2·t² + c3·t³
#[derive(Debug, Clone, Copy)]
struct CubicPoly {
    c0: Vec3,
    c1: Vec3,
    c2: Vec3,
    c3: Vec3,
}

impl CubicPoly {
    fn hermite(x0: Vec3, x1: Vec3, t0: Vec3, t1: Vec3) -> Self {
        Self {
            c0: x0,
            c1: t0,
            c2: -3.0 * x0 + 3.0 * x1 - 2.0 * t0 - t1,
            c3: 2.0 * x0 - 2.0 * x1 + t0 + t1,
        }
    }

    fn uniform(x0: Vec3, x1: Vec3, x2: Vec3, x3: Vec3, tension: f32) -> Self {
        Self::hermite(x1, x2, tension * (x2 - x0), tension * (x3 - x1))
    }

    fn non_uniform(x0: Vec3, x1: Vec3, x2: Vec3, x3: Vec3, dt0: f32, dt1: f32, dt2: f32) -> Self {
        // Tangents for parameter range [0, 1]
        let mut t1 = (x1 - x0) / dt0 - (x2 - x0) / (dt0 + dt1) + (x2 - x1) / dt1;
        let mut t2 = (x2 - x1) / dt1 - (x3 - x1) / (dt1 + dt2) + (x3 - x2) / dt2;
        t1 *= dt1;
        t2 *= dt1;
        Self::hermite(x1, x2, t1, t2)
    }

    fn eval(&self, t: f32) -> Vec3 {
        let t2 = t * t;
        let t3 = t2 * t;
        self.c0 + self.c1 * t + self.c2 * t2 + self.c3 * t3
    }
}

/// An open Catmull-Rom curve through 3D control points.
#[derive(Debug, Clone, Default)]
pub struct CatmullRomCurve3 {
    points: Vec<Vec3>,
    curve_type: CurveType,
}

impl CatmullRomCurve3 {
    #[must_use]
    pub fn new(curve_type: CurveType) -> Self {
        Self {
            points: Vec::new(),
            curve_type,
        }
    }

    #[must_use]
    pub fn from_points(points: Vec<Vec3>, curve_type: CurveType) -> Self {
        Self { points, curve_type }
    }

    #[inline]
    #[must_use]
    pub fn control_points(&self) -> &[Vec3] {
        &self.points
    }

    #[inline]
    #[must_use]
    pub fn curve_type(&self) -> CurveType {
        self.curve_type
    }

    pub fn push(&mut self, point: Vec3) {
        self.points.push(point);
    }

    /// Replaces control point `index`. Returns `false` if it does not exist.
    pub fn set_point(&mut self, index: usize, point: Vec3) -> bool {
        match self.points.get_mut(index) {
            Some(p) => {
                *p = point;
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Evaluates the curve at `u ∈ [0, 1]` (clamped).
    #[must_use]
    pub fn point_at(&self, u: f32) -> Vec3 {
        let len = self.points.len();
        match len {
            0 => return Vec3::ZERO,
            1 => return self.points[0],
            _ => {}
        }

        let p = (len - 1) as f32 * u.clamp(0.0, 1.0);
        let mut index = (p.floor() as usize).min(len - 1);
        let mut weight = p - index as f32;

        if index == len - 1 {
            index = len - 2;
            weight = 1.0;
        }

        let p1 = self.points[index];
        let p2 = self.points[index + 1];
        let p0 = if index > 0 {
            self.points[index - 1]
        } else {
            2.0 * p1 - p2
        };
        let p3 = if index + 2 < len {
            self.points[index + 2]
        } else {
            2.0 * p2 - p1
        };

        let poly = match self.curve_type {
            CurveType::Uniform { tension } => CubicPoly::uniform(p0, p1, p2, p3, tension),
            curve_type => {
                let power = curve_type.knot_power();
                let mut dt0 = p0.distance_squared(p1).powf(power);
                let mut dt1 = p1.distance_squared(p2).powf(power);
                let mut dt2 = p2.distance_squared(p3).powf(power);

                // Coincident control points
                if dt1 < 1e-4 {
                    dt1 = 1.0;
                }
                if dt0 < 1e-4 {
                    dt0 = dt1;
                }
                if dt2 < 1e-4 {
                    dt2 = dt1;
                }

                CubicPoly::non_uniform(p0, p1, p2, p3, dt0, dt1, dt2)
            }
        };

        poly.eval(weight)
    }

    /// Samples `divisions + 1` points at evenly spaced curve parameters,
    /// including both end points.
    #[must_use]
    pub fn sample_points(&self, divisions: usize) -> Vec<Vec3> {
        if divisions == 0 {
            return vec![self.point_at(0.0)];
        }
        (0..=divisions)
            .map(|d| self.point_at(d as f32 / divisions as f32))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn three_points(curve_type: CurveType) -> CatmullRomCurve3 {
        CatmullRomCurve3::from_points(
            vec![Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0)],
            curve_type,
        )
    }

    #[test]
    fn passes_through_control_points() {
        for curve_type in [
            CurveType::Centripetal,
            CurveType::Chordal,
            CurveType::Uniform { tension: 0.5 },
        ] {
            let curve = three_points(curve_type);
            assert!(curve.point_at(0.0).abs_diff_eq(Vec3::ZERO, EPSILON));
            assert!(curve.point_at(0.5).abs_diff_eq(Vec3::X, EPSILON));
            assert!(curve.point_at(1.0).abs_diff_eq(Vec3::new(1.0, 1.0, 0.0), EPSILON));
        }
    }

    #[test]
    fn parameter_is_clamped() {
        let curve = three_points(CurveType::Centripetal);
        assert_eq!(curve.point_at(-1.0), curve.point_at(0.0));
        assert_eq!(curve.point_at(2.0), curve.point_at(1.0));
    }

    #[test]
    fn two_points_is_a_straight_line() {
        let curve = CatmullRomCurve3::from_points(
            vec![Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0)],
            CurveType::Centripetal,
        );
        let mid = curve.point_at(0.5);
        assert!(mid.abs_diff_eq(Vec3::X, EPSILON), "got {mid}");
    }

    #[test]
    fn single_point_and_empty() {
        let mut curve = CatmullRomCurve3::new(CurveType::default());
        assert_eq!(curve.point_at(0.3), Vec3::ZERO);
        curve.push(Vec3::Y);
        assert_eq!(curve.point_at(0.3), Vec3::Y);
        assert_eq!(curve.sample_points(4).len(), 5);
    }

    #[test]
    fn coincident_points_stay_finite() {
        let curve = CatmullRomCurve3::from_points(
            vec![Vec3::ZERO, Vec3::ZERO, Vec3::X],
            CurveType::Centripetal,
        );
        for p in curve.sample_points(20) {
            assert!(p.is_finite(), "non-finite sample {p}");
        }
    }

    #[test]
    fn sample_count_includes_both_ends() {
        let curve = three_points(CurveType::Centripetal);
        let samples = curve.sample_points(60);
        assert_eq!(samples.len(), 61);
        assert!(samples[0].abs_diff_eq(Vec3::ZERO, EPSILON));
        assert!(samples[60].abs_diff_eq(Vec3::new(1.0, 1.0, 0.0), EPSILON));
    }
}
