//! Cubic Bézier splines and the small vector math the traffic system needs.
//!
//! Ships travel along fixed routes modelled as piecewise cubic Bézier
//! curves: `3n + 1` control points describe `n` joined curves, and a
//! single progress scalar in `[0, 1]` sweeps the whole route.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// A 3D position or offset in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };
    pub const ONE: Self = Self { x: 1.0, y: 1.0, z: 1.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Unit-length copy; zero vectors stay zero.
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len > f32::EPSILON {
            self * (1.0 / len)
        } else {
            Self::ZERO
        }
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

/// Error building a spline from control points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplineError {
    /// A piecewise cubic spline needs `3n + 1` control points, n ≥ 1.
    BadControlPointCount(usize),
}

/// A piecewise cubic Bézier route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spline {
    points: Vec<Vec3>,
}

impl Spline {
    pub fn new(points: Vec<Vec3>) -> Result<Self, SplineError> {
        let n = points.len();
        if n < 4 || (n - 1) % 3 != 0 {
            return Err(SplineError::BadControlPointCount(n));
        }
        Ok(Self { points })
    }

    /// Single-curve route from `from` to `to` with evenly spaced tangents.
    pub fn line(from: Vec3, to: Vec3) -> Self {
        let third = (to - from) * (1.0 / 3.0);
        Self {
            points: vec![from, from + third, from + third + third, to],
        }
    }

    pub fn control_point_count(&self) -> usize {
        self.points.len()
    }

    pub fn control_point(&self, index: usize) -> Vec3 {
        self.points[index.min(self.points.len() - 1)]
    }

    pub fn curve_count(&self) -> usize {
        (self.points.len() - 1) / 3
    }

    /// Map a whole-route progress scalar to (curve start index, local t).
    fn locate(&self, t: f32) -> (usize, f32) {
        if t >= 1.0 {
            (self.points.len() - 4, 1.0)
        } else {
            let scaled = t.max(0.0) * self.curve_count() as f32;
            let curve = scaled.floor() as usize;
            (curve * 3, scaled - curve as f32)
        }
    }

    /// World position at progress `t ∈ [0, 1]` (clamped).
    pub fn point_at(&self, t: f32) -> Vec3 {
        let (i, t) = self.locate(t);
        let p = &self.points[i..i + 4];
        let u = 1.0 - t;
        p[0] * (u * u * u)
            + p[1] * (3.0 * u * u * t)
            + p[2] * (3.0 * u * t * t)
            + p[3] * (t * t * t)
    }

    /// Travel direction (unnormalized first derivative) at progress `t`.
    pub fn direction_at(&self, t: f32) -> Vec3 {
        let (i, t) = self.locate(t);
        let p = &self.points[i..i + 4];
        let u = 1.0 - t;
        (p[1] - p[0]) * (3.0 * u * u)
            + (p[2] - p[1]) * (6.0 * u * t)
            + (p[3] - p[2]) * (3.0 * t * t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_control_point_counts() {
        for n in [0usize, 1, 2, 3, 5, 6, 8] {
            let points = vec![Vec3::ZERO; n];
            assert_eq!(
                Spline::new(points),
                Err(SplineError::BadControlPointCount(n)),
                "count {n} should be rejected"
            );
        }
        assert!(Spline::new(vec![Vec3::ZERO; 4]).is_ok());
        assert!(Spline::new(vec![Vec3::ZERO; 7]).is_ok());
    }

    #[test]
    fn line_endpoints() {
        let s = Spline::line(Vec3::new(0.0, 0.0, 0.0), Vec3::new(10.0, 0.0, 0.0));
        let start = s.point_at(0.0);
        let end = s.point_at(1.0);
        assert!((start.x - 0.0).abs() < 1e-5);
        assert!((end.x - 10.0).abs() < 1e-4);
    }

    #[test]
    fn progress_clamps_past_one() {
        let s = Spline::line(Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0));
        let end = s.point_at(1.0);
        let past = s.point_at(1.7);
        assert!((end.x - past.x).abs() < 1e-5);
    }

    #[test]
    fn direction_points_forward_on_a_line() {
        let s = Spline::line(Vec3::ZERO, Vec3::new(0.0, 0.0, -8.0));
        for t in [0.0, 0.25, 0.5, 0.9] {
            let d = s.direction_at(t).normalized();
            assert!(d.z < -0.99, "direction at {t} was {d:?}");
        }
    }

    #[test]
    fn multi_curve_spline_is_continuous() {
        let points = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(4.0, 1.0, 0.0),
            Vec3::new(5.0, 1.0, 0.0),
            Vec3::new(6.0, 1.0, 0.0),
        ];
        let s = Spline::new(points).unwrap();
        assert_eq!(s.curve_count(), 2);
        // Sample across the curve boundary, no jump.
        let before = s.point_at(0.499);
        let after = s.point_at(0.501);
        assert!((before - after).length() < 0.1);
    }
}
