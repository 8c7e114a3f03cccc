use fridge_farm::farm::layout::{bucket_index, sample_divisions};
use fridge_farm::farm::{layout, HelixParams};
use fridge_farm::math::Curve;
use glam::Vec3;

#[cfg(test)]
mod layout_tests {
    use super::*;

    fn params(pod_count: usize) -> HelixParams {
        HelixParams::new(0.7, 2.6, 3.0, 0.9, pod_count).unwrap()
    }

    #[test]
    fn test_returns_exactly_the_requested_count() {
        for pods in [1, 2, 7, 20, 50, 51, 99, 250] {
            let p = params(pods);
            assert_eq!(layout(&p.curve(), pods, p.pole_center()).len(), pods);
        }
    }

    #[test]
    fn test_positions_come_from_the_sampled_curve() {
        for pods in [3, 20, 120] {
            let p = params(pods);
            let curve = p.curve();
            let samples = curve.points(sample_divisions(pods));
            for placement in layout(&curve, pods, p.pole_center()) {
                assert!(samples.contains(&placement.position));
                assert_eq!(curve.point(placement.t), placement.position);
            }
        }
    }

    #[test]
    fn test_samples_strictly_increase() {
        let p = params(40);
        let placements = layout(&p.curve(), 40, p.pole_center());
        for pair in placements.windows(2) {
            assert!(pair[1].sample > pair[0].sample);
            assert!(pair[1].position.y > pair[0].position.y);
        }
    }

    #[test]
    fn test_large_counts_stay_in_range() {
        let pods = 1000;
        let samples = sample_divisions(pods) + 1;
        let last = bucket_index(pods - 1, pods, samples);
        assert!(last < samples);
    }

    #[test]
    fn test_twenty_pods_on_default_helix() {
        let p = params(20);
        let placements = layout(&p.curve(), 20, p.pole_center());
        assert_eq!(placements[0].position, p.curve().point(0.0));
        // 101 samples, pod 10 lands on sample 50
        assert_eq!(placements[10].sample, 50);
        assert!((placements[10].t - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_pods_keep_their_height_when_facing() {
        let p = params(12);
        for placement in layout(&p.curve(), 12, p.pole_center()) {
            let transform = placement.transform();
            assert_eq!(transform.position, placement.position);
            assert_eq!(transform.scale, Vec3::ONE);
        }
    }
}
