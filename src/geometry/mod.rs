//! Indexed triangle meshes and the primitive builders the scene is made of.

mod primitives;
mod tube;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use glam::Vec3;

use crate::math::{CurveKind, AABB};
use crate::types::Vertex;

pub use primitives::{box_geometry, cylinder_geometry, plane_geometry};
pub use tube::{parallel_transport_frames, tube_geometry, Frame};

static NEXT_GEOMETRY_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a geometry instance, stable for its lifetime
///
/// The renderer keys its GPU buffers by this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryId(u64);

/// Indexed triangle list with per-vertex normals
#[derive(Debug)]
pub struct Geometry {
    id: GeometryId,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Geometry {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self {
            id: GeometryId(NEXT_GEOMETRY_ID.fetch_add(1, Ordering::Relaxed)),
            vertices,
            indices,
        }
    }

    pub fn id(&self) -> GeometryId {
        self.id
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Local-space bounds, `None` for an empty mesh
    pub fn bounds(&self) -> Option<AABB> {
        AABB::from_points(self.vertices.iter().map(|v| Vec3::from_array(v.position)))
    }
}

/// Shared handle to a geometry; dropping the last one releases it
pub type GeometryHandle = Arc<Geometry>;

/// Declarative description of a primitive, built on demand
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeometrySpec {
    Box {
        width: f32,
        height: f32,
        depth: f32,
    },
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
    },
    Plane {
        width: f32,
        height: f32,
    },
    Tube {
        curve: CurveKind,
        tubular_segments: u32,
        radius: f32,
        radial_segments: u32,
    },
}

impl GeometrySpec {
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        GeometrySpec::Box {
            width,
            height,
            depth,
        }
    }

    pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, radial_segments: u32) -> Self {
        GeometrySpec::Cylinder {
            radius_top,
            radius_bottom,
            height,
            radial_segments,
        }
    }

    pub fn build(&self) -> Geometry {
        match *self {
            GeometrySpec::Box {
                width,
                height,
                depth,
            } => box_geometry(width, height, depth),
            GeometrySpec::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
            } => cylinder_geometry(radius_top, radius_bottom, height, radial_segments),
            GeometrySpec::Plane { width, height } => plane_geometry(width, height),
            GeometrySpec::Tube {
                curve,
                tubular_segments,
                radius,
                radial_segments,
            } => tube_geometry(&curve, tubular_segments, radius, radial_segments),
        }
    }

    pub fn build_shared(&self) -> GeometryHandle {
        Arc::new(self.build())
    }
}
