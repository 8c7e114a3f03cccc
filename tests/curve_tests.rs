use fridge_farm::geometry::{tube_geometry, GeometrySpec};
use fridge_farm::math::{Curve, CurveKind, HelixCurve};
use glam::Vec3;

#[cfg(test)]
mod curve_tests {
    use super::*;

    fn farm_helix() -> HelixCurve {
        HelixCurve::new(0.7, 2.6, 3.0, 0.9)
    }

    #[test]
    fn test_every_point_is_on_the_cylinder() {
        let curve = farm_helix();
        for point in curve.points(500) {
            let r2 = point.x * point.x + point.z * point.z;
            assert!((r2 - 0.49).abs() < 1e-4, "point {:?} off the cylinder", point);
        }
    }

    #[test]
    fn test_height_rises_linearly() {
        let curve = farm_helix();
        let points = curve.points(4);
        let ys: Vec<f32> = points.iter().map(|p| p.y).collect();
        let expected = [0.9, 1.55, 2.2, 2.85, 3.5];
        for (y, e) in ys.iter().zip(expected) {
            assert!((y - e).abs() < 1e-5, "got {} expected {}", y, e);
        }
    }

    #[test]
    fn test_full_turn_returns_to_start_angle() {
        let curve = HelixCurve::new(1.0, 3.0, 3.0, 0.0);
        let start = curve.point(0.0);
        let one_turn = curve.point(1.0 / 3.0);
        assert!((start.x - one_turn.x).abs() < 1e-4);
        assert!((start.z - one_turn.z).abs() < 1e-4);
        assert!((one_turn.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_zero_turns_is_a_vertical_line() {
        let curve = HelixCurve::new(0.5, 2.0, 0.0, 1.0);
        for point in curve.points(10) {
            assert!((point.x - 0.5).abs() < 1e-6);
            assert!(point.z.abs() < 1e-6);
        }
        assert!(curve.tangent(0.5).distance(Vec3::Y) < 1e-5);
    }

    #[test]
    fn test_ramp_tube_follows_the_helix() {
        let curve = farm_helix();
        let spec = GeometrySpec::Tube {
            curve: CurveKind::from(curve),
            tubular_segments: 100,
            radius: 0.05,
            radial_segments: 8,
        };
        let tube = spec.build();
        assert_eq!(tube.vertices.len(), 101 * 9);
        assert_eq!(tube.triangle_count(), 100 * 8 * 2);

        let bounds = tube.bounds().unwrap();
        assert!((bounds.min.y - (0.9 - 0.05)).abs() < 0.06);
        assert!((bounds.max.y - (3.5 + 0.05)).abs() < 0.06);
        assert!(bounds.max.x <= 0.75 + 1e-4);
    }

    #[test]
    fn test_tube_normals_are_unit() {
        let tube = tube_geometry(&farm_helix(), 30, 0.05, 8);
        for vertex in &tube.vertices {
            let n = Vec3::from_array(vertex.normal);
            assert!((n.length() - 1.0).abs() < 1e-4);
        }
    }
}
