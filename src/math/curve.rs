use glam::Vec3;
use serde::Serialize;
use std::f32::consts::TAU;

/// A parametric 3D curve over t in [0, 1]
pub trait Curve {
    /// Point on the curve at parameter t
    fn point(&self, t: f32) -> Vec3;

    /// Unit tangent at parameter t
    ///
    /// Falls back to a central difference when a curve has no closed form.
    fn tangent(&self, t: f32) -> Vec3 {
        const DELTA: f32 = 1e-4;
        let t0 = (t - DELTA).max(0.0);
        let t1 = (t + DELTA).min(1.0);
        (self.point(t1) - self.point(t0)).normalize_or_zero()
    }

    /// `divisions + 1` evenly spaced samples, both endpoints included
    fn points(&self, divisions: usize) -> Vec<Vec3> {
        let divisions = divisions.max(1);
        (0..=divisions)
            .map(|d| self.point(d as f32 / divisions as f32))
            .collect()
    }
}

/// Helix around the vertical axis through the origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HelixCurve {
    pub radius: f32,
    pub height: f32,
    pub turns: f32,
    pub start_y: f32,
}

impl HelixCurve {
    pub fn new(radius: f32, height: f32, turns: f32, start_y: f32) -> Self {
        Self {
            radius,
            height,
            turns,
            start_y,
        }
    }

    fn angle(&self, t: f32) -> f32 {
        TAU * self.turns * t
    }
}

impl Curve for HelixCurve {
    fn point(&self, t: f32) -> Vec3 {
        let angle = self.angle(t);
        Vec3::new(
            self.radius * angle.cos(),
            self.start_y + self.height * t,
            self.radius * angle.sin(),
        )
    }

    fn tangent(&self, t: f32) -> Vec3 {
        let angle = self.angle(t);
        let w = TAU * self.turns;
        Vec3::new(
            -self.radius * w * angle.sin(),
            self.height,
            self.radius * w * angle.cos(),
        )
        .normalize_or_zero()
    }
}

/// Closed set of curve shapes the geometry builders can sweep along
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurveKind {
    Helix(HelixCurve),
}

impl Curve for CurveKind {
    fn point(&self, t: f32) -> Vec3 {
        match self {
            CurveKind::Helix(helix) => helix.point(t),
        }
    }

    fn tangent(&self, t: f32) -> Vec3 {
        match self {
            CurveKind::Helix(helix) => helix.tangent(t),
        }
    }
}

impl From<HelixCurve> for CurveKind {
    fn from(helix: HelixCurve) -> Self {
        CurveKind::Helix(helix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn helix() -> HelixCurve {
        HelixCurve::new(0.7, 2.6, 3.0, 0.9)
    }

    #[test]
    fn test_helix_stays_on_cylinder() {
        let curve = helix();
        for i in 0..=50 {
            let p = curve.point(i as f32 / 50.0);
            let r2 = p.x * p.x + p.z * p.z;
            assert!((r2 - 0.49).abs() < EPS, "r^2 was {} at sample {}", r2, i);
        }
    }

    #[test]
    fn test_helix_endpoints() {
        let curve = helix();
        assert!((curve.point(0.0).y - 0.9).abs() < EPS);
        assert!((curve.point(1.0).y - 3.5).abs() < EPS);
        assert!((curve.point(0.0).x - 0.7).abs() < EPS);
    }

    #[test]
    fn test_helix_is_periodic_in_angle() {
        let curve = HelixCurve::new(1.0, 1.0, 1.0, 0.0);
        let a = curve.point(0.25);
        let b = curve.point(1.25);
        assert!((a.x - b.x).abs() < EPS);
        assert!((a.z - b.z).abs() < EPS);
        assert!((b.y - a.y - 1.0).abs() < EPS);
    }

    #[test]
    fn test_points_include_endpoints() {
        let curve = helix();
        let points = curve.points(10);
        assert_eq!(points.len(), 11);
        assert_eq!(points[0], curve.point(0.0));
        assert_eq!(points[10], curve.point(1.0));
    }

    #[test]
    fn test_analytic_tangent_matches_difference() {
        let curve = helix();
        let analytic = curve.tangent(0.4);
        let numeric = (curve.point(0.4001) - curve.point(0.3999)).normalize();
        assert!(analytic.distance(numeric) < 1e-2);
        assert!((analytic.length() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_curve_kind_delegates() {
        let curve = helix();
        let kind = CurveKind::from(curve);
        assert_eq!(kind.point(0.3), curve.point(0.3));
        assert_eq!(kind.tangent(0.3), curve.tangent(0.3));
    }
}
