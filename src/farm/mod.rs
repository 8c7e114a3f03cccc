//! The helix farm: spiral ramp, central pole with its monitoring arm, pods.

pub mod layout;

use anyhow::{ensure, Result};
use glam::Vec3;
use serde::Serialize;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, FRAC_PI_6, FRAC_PI_8};

use crate::geometry::GeometrySpec;
use crate::math::{CurveKind, HelixCurve};
use crate::scene::{MaterialId, Node, NodeId, NodeSpec, SceneGraph, Transform};

pub use layout::{layout, PodPlacement};

pub const DEFAULT_TURNS: f32 = 3.0;
pub const DEFAULT_POD_COUNT: usize = 20;

const POLE_RADIUS: f32 = 0.1;
const POLE_OVERHANG: f32 = 0.1;
const POLE_SIDES: u32 = 16;
const RAMP_RADIUS: f32 = 0.05;
const RAMP_SEGMENTS: u32 = 100;
const RAMP_SIDES: u32 = 8;
const POD_RADIUS: f32 = 0.06;
const POD_TAPER: f32 = 0.8;
const POD_HEIGHT: f32 = 0.08;
const POD_SIDES: u32 = 12;

/// Shape of one farm build
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HelixParams {
    pub radius: f32,
    pub height: f32,
    pub turns: f32,
    pub start_y: f32,
    pub pod_count: usize,
}

impl HelixParams {
    pub fn new(radius: f32, height: f32, turns: f32, start_y: f32, pod_count: usize) -> Result<Self> {
        ensure!(radius > 0.0 && radius.is_finite(), "helix radius must be positive, got {}", radius);
        ensure!(height > 0.0 && height.is_finite(), "helix height must be positive, got {}", height);
        ensure!(turns.is_finite(), "helix turn count must be finite, got {}", turns);
        ensure!(start_y.is_finite(), "helix start offset must be finite, got {}", start_y);
        ensure!(pod_count >= 1, "a farm needs at least one pod");
        Ok(Self {
            radius,
            height,
            turns,
            start_y,
            pod_count,
        })
    }

    pub fn curve(&self) -> HelixCurve {
        HelixCurve::new(self.radius, self.height, self.turns, self.start_y)
    }

    /// Where the pole is centred, halfway up the helix on its axis
    pub fn pole_center(&self) -> Vec3 {
        Vec3::new(0.0, self.start_y + self.height / 2.0, 0.0)
    }

    /// Same helix with a different turn count and pod count
    pub fn with_shape(&self, turns: f32, pod_count: usize) -> Result<Self> {
        Self::new(self.radius, self.height, turns, self.start_y, pod_count)
    }
}

/// Materials the farm draws with
#[derive(Debug, Clone, Copy)]
pub struct FarmMaterials {
    pub pole: MaterialId,
    pub ramp: MaterialId,
    pub pod: MaterialId,
    pub metal: MaterialId,
}

/// Outcome of a rebuild
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FarmStats {
    /// Nodes freed from the previous build
    pub removed: usize,
    /// Nodes created by this build
    pub created: usize,
    pub pods: usize,
}

/// Replaces everything under `helix_root` with a fresh farm
///
/// Only `helix_root`'s subtree is touched.
pub fn rebuild_farm(
    graph: &mut SceneGraph,
    helix_root: NodeId,
    materials: &FarmMaterials,
    params: &HelixParams,
) -> Result<FarmStats> {
    let removed = graph.clear_children(helix_root)?;
    let before = graph.len();

    let pole_center = params.pole_center();
    let pole = graph.add_child(
        helix_root,
        Node::mesh(
            "pole",
            GeometrySpec::cylinder(POLE_RADIUS, POLE_RADIUS, params.height + POLE_OVERHANG, POLE_SIDES)
                .build_shared(),
            materials.pole,
        )
        .with_transform(Transform::from_position(pole_center)),
    )?;
    graph.instantiate(pole, &monitoring_arm(materials, params.height))?;

    let curve = params.curve();
    graph.add_child(
        helix_root,
        Node::mesh(
            "ramp",
            GeometrySpec::Tube {
                curve: CurveKind::Helix(curve),
                tubular_segments: RAMP_SEGMENTS,
                radius: RAMP_RADIUS,
                radial_segments: RAMP_SIDES,
            }
            .build_shared(),
            materials.ramp,
        ),
    )?;

    let pod_geometry =
        GeometrySpec::cylinder(POD_RADIUS, POD_RADIUS * POD_TAPER, POD_HEIGHT, POD_SIDES).build_shared();
    let placements = layout(&curve, params.pod_count, pole_center);
    for (i, placement) in placements.iter().enumerate() {
        graph.add_child(
            helix_root,
            Node::mesh(&format!("pod-{}", i), pod_geometry.clone(), materials.pod)
                .with_transform(placement.transform()),
        )?;
    }

    let stats = FarmStats {
        removed,
        created: graph.len() - before,
        pods: placements.len(),
    };
    log::info!(
        "Helix farm rebuilt: {} turns, {} pods, {} nodes created, {} released",
        params.turns,
        stats.pods,
        stats.created,
        stats.removed
    );
    Ok(stats)
}

/// Sensor arm clamped to the pole: base, two segments, head with scissor blades
///
/// Joint angles are fixed.
pub fn monitoring_arm(materials: &FarmMaterials, helix_height: f32) -> NodeSpec {
    let blade = GeometrySpec::cuboid(0.01, 0.06, 0.01);

    let head = NodeSpec::mesh("arm-head", GeometrySpec::cuboid(0.05, 0.04, 0.04), materials.pole)
        .at(Vec3::new(0.0, 0.08, 0.02))
        .child(
            NodeSpec::mesh("scissor-left", blade, materials.metal)
                .at(Vec3::new(-0.015, 0.03, -0.02))
                .rotated(Vec3::new(0.0, 0.0, 0.5)),
        )
        .child(
            NodeSpec::mesh("scissor-right", blade, materials.metal)
                .at(Vec3::new(0.015, 0.03, -0.02))
                .rotated(Vec3::new(0.0, 0.0, -0.5)),
        );

    let segment2 = NodeSpec::mesh("arm-segment-2", GeometrySpec::cuboid(0.02, 0.15, 0.02), materials.metal)
        .at(Vec3::new(0.0, 0.1, 0.0))
        .rotated(Vec3::new(FRAC_PI_8, 0.0, 0.0))
        .child(head);

    let segment1 = NodeSpec::mesh("arm-segment-1", GeometrySpec::cuboid(0.02, 0.2, 0.02), materials.metal)
        .at(Vec3::new(0.0, 0.1, 0.0))
        .rotated(Vec3::new(-FRAC_PI_6, 0.0, 0.0))
        .child(segment2);

    NodeSpec::mesh("arm-base", GeometrySpec::cylinder(0.03, 0.03, 0.05, 12), materials.metal)
        .at(Vec3::new(0.0, helix_height * 0.3, POLE_RADIUS))
        .rotated(Vec3::new(FRAC_PI_2, 0.0, FRAC_PI_4))
        .child(segment1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Material, MaterialLibrary};

    fn materials() -> FarmMaterials {
        let mut library = MaterialLibrary::new();
        FarmMaterials {
            pole: library.add(Material::standard("pole", 0x111111, 0.8, 0.6)),
            ramp: library.add(Material::standard("ramp", 0x66bb66, 0.1, 0.7).with_opacity(0.8)),
            pod: library.add(Material::standard("pod", 0x444444, 0.2, 0.5)),
            metal: library.add(Material::standard("metal", 0x888888, 0.8, 0.4)),
        }
    }

    fn params() -> HelixParams {
        HelixParams::new(0.7, 2.6, DEFAULT_TURNS, 0.9, DEFAULT_POD_COUNT).unwrap()
    }

    #[test]
    fn test_params_reject_degenerate_helix() {
        assert!(HelixParams::new(0.0, 1.0, 3.0, 0.0, 20).is_err());
        assert!(HelixParams::new(1.0, -1.0, 3.0, 0.0, 20).is_err());
        assert!(HelixParams::new(1.0, 1.0, 3.0, 0.0, 0).is_err());
        assert!(HelixParams::new(1.0, 1.0, f32::NAN, 0.0, 1).is_err());
    }

    #[test]
    fn test_pole_center_is_midway() {
        assert!((params().pole_center() - Vec3::new(0.0, 2.2, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_arm_has_six_parts() {
        assert_eq!(monitoring_arm(&materials(), 2.6).count(), 6);
    }

    #[test]
    fn test_rebuild_populates_helix_root() {
        let mut graph = SceneGraph::new();
        let helix = graph.add_child(graph.root(), Node::group("helix")).unwrap();
        let stats = rebuild_farm(&mut graph, helix, &materials(), &params()).unwrap();

        // pole (+6 arm nodes), ramp, pods
        assert_eq!(stats.removed, 0);
        assert_eq!(stats.pods, 20);
        assert_eq!(stats.created, 1 + 6 + 1 + 20);
        assert_eq!(graph.children(helix).len(), 1 + 1 + 20);
    }

    #[test]
    fn test_pods_share_one_geometry() {
        let mut graph = SceneGraph::new();
        let helix = graph.add_child(graph.root(), Node::group("helix")).unwrap();
        rebuild_farm(&mut graph, helix, &materials(), &params()).unwrap();

        let ids: Vec<_> = graph
            .children(helix)
            .iter()
            .filter_map(|&id| graph.node(id))
            .filter(|n| n.name.starts_with("pod-"))
            .map(|n| n.mesh.as_ref().unwrap().geometry.id())
            .collect();
        assert_eq!(ids.len(), 20);
        assert!(ids.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_rebuild_replaces_previous_farm() {
        let mut graph = SceneGraph::new();
        let helix = graph.add_child(graph.root(), Node::group("helix")).unwrap();
        let first = rebuild_farm(&mut graph, helix, &materials(), &params()).unwrap();
        let second = rebuild_farm(&mut graph, helix, &materials(), &params()).unwrap();

        assert_eq!(second.removed, first.created);
        assert_eq!(second.created, first.created);
        assert_eq!(graph.len(), 2 + first.created);
    }
}
