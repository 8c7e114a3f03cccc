use glam::Vec3;
use serde::Serialize;
use std::f32::consts::FRAC_PI_2;

use crate::math::Curve;
use crate::scene::Transform;

/// Minimum number of curve divisions sampled for placement
pub const MIN_SAMPLE_DIVISIONS: usize = 100;

/// Where one pod sits and how it is turned
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PodPlacement {
    /// Index of the sample the pod was snapped to
    pub sample: usize,
    /// Curve parameter of that sample
    pub t: f32,
    pub position: Vec3,
    /// Euler angles, XYZ order
    pub rotation: Vec3,
}

impl PodPlacement {
    pub fn transform(&self) -> Transform {
        Transform::from_position(self.position).with_rotation(self.rotation)
    }
}

/// Curve divisions sampled for `pod_count` pods
pub fn sample_divisions(pod_count: usize) -> usize {
    (pod_count * 2).max(MIN_SAMPLE_DIVISIONS)
}

/// Sample index picked for pod `i` out of `pod_count` over `sample_len` samples
///
/// Buckets are uniform in the curve parameter, not in arc length.
pub fn bucket_index(i: usize, pod_count: usize, sample_len: usize) -> usize {
    ((i as f64 / pod_count as f64) * sample_len as f64).floor() as usize
}

/// Spreads `pod_count` pods along `curve`, each facing the pole axis
///
/// Returns an empty list for zero pods. Pods are snapped to curve samples, so
/// every position is exactly a point the curve produced.
pub fn layout(curve: &impl Curve, pod_count: usize, pole_center: Vec3) -> Vec<PodPlacement> {
    if pod_count == 0 {
        return Vec::new();
    }

    let divisions = sample_divisions(pod_count);
    let samples = curve.points(divisions);

    (0..pod_count)
        .map(|i| {
            let sample = bucket_index(i, pod_count, samples.len()).min(samples.len() - 1);
            let position = samples[sample];
            PodPlacement {
                sample,
                t: sample as f32 / divisions as f32,
                position,
                rotation: facing_rotation(position, pole_center),
            }
        })
        .collect()
}

/// Faces the pole at the pod's own height, then stands the socket upright
fn facing_rotation(position: Vec3, pole_center: Vec3) -> Vec3 {
    let mut transform = Transform::from_position(position);
    transform.look_at(Vec3::new(pole_center.x, position.y, pole_center.z));
    transform.rotation.y += FRAC_PI_2;
    transform.rotation.x += FRAC_PI_2;
    transform.rotation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::HelixCurve;

    fn curve() -> HelixCurve {
        HelixCurve::new(0.7, 2.6, 3.0, 0.9)
    }

    #[test]
    fn test_sample_divisions_has_floor() {
        assert_eq!(sample_divisions(1), 100);
        assert_eq!(sample_divisions(20), 100);
        assert_eq!(sample_divisions(50), 100);
        assert_eq!(sample_divisions(51), 102);
    }

    #[test]
    fn test_bucket_index_spreads_evenly() {
        // 20 pods over 101 samples
        let picks: Vec<usize> = (0..20).map(|i| bucket_index(i, 20, 101)).collect();
        assert_eq!(picks[0], 0);
        assert_eq!(picks[1], 5);
        assert_eq!(picks[10], 50);
        assert_eq!(picks[19], 95);
    }

    #[test]
    fn test_zero_pods_is_empty() {
        assert!(layout(&curve(), 0, Vec3::ZERO).is_empty());
    }

    #[test]
    fn test_single_pod_sits_at_start() {
        let placements = layout(&curve(), 1, Vec3::new(0.0, 2.2, 0.0));
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].position, curve().point(0.0));
        assert_eq!(placements[0].t, 0.0);
    }

    #[test]
    fn test_positions_are_curve_samples() {
        let c = curve();
        let samples = c.points(sample_divisions(20));
        for placement in layout(&c, 20, Vec3::ZERO) {
            assert_eq!(placement.position, samples[placement.sample]);
        }
    }

    #[test]
    fn test_pods_turn_toward_pole() {
        let c = curve();
        for placement in layout(&c, 20, Vec3::new(0.0, 2.2, 0.0)) {
            // Undo the fixed quarter turns to recover the facing direction
            let mut facing = placement.transform();
            facing.rotation.x -= FRAC_PI_2;
            facing.rotation.y -= FRAC_PI_2;
            let forward = facing.quaternion() * Vec3::Z;
            let to_pole = Vec3::new(-placement.position.x, 0.0, -placement.position.z).normalize();
            assert!(forward.dot(to_pole) > 0.999, "pod at {:?} faces {:?}", placement.position, forward);
        }
    }

    #[test]
    fn test_layout_is_deterministic() {
        let a = layout(&curve(), 33, Vec3::ZERO);
        let b = layout(&curve(), 33, Vec3::ZERO);
        assert_eq!(a, b);
    }
}
