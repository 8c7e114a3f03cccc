use glam::{Quat, Vec3};
use std::f32::consts::TAU;

use super::Geometry;
use crate::math::Curve;
use crate::types::Vertex;

/// Orthonormal frame carried along a curve
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    pub tangent: Vec3,
    pub normal: Vec3,
    pub binormal: Vec3,
}

/// Rotation-minimising frames at `segments + 1` evenly spaced parameters
///
/// Each normal is the previous one rotated by the turn between consecutive
/// tangents, so the tube does not twist around the helix.
pub fn parallel_transport_frames(curve: &impl Curve, segments: u32) -> Vec<Frame> {
    let segments = segments.max(1);
    let tangents: Vec<Vec3> = (0..=segments)
        .map(|i| curve.tangent(i as f32 / segments as f32))
        .collect();

    let mut frames = Vec::with_capacity(tangents.len());
    let mut normal = tangents[0].any_orthonormal_vector();

    for (i, &tangent) in tangents.iter().enumerate() {
        if i > 0 {
            let previous = tangents[i - 1];
            let axis = previous.cross(tangent);
            if axis.length_squared() > f32::EPSILON {
                let angle = previous.dot(tangent).clamp(-1.0, 1.0).acos();
                normal = Quat::from_axis_angle(axis.normalize(), angle) * normal;
            }
        }
        frames.push(Frame {
            tangent,
            normal,
            binormal: tangent.cross(normal),
        });
    }

    frames
}

/// Open tube of constant radius swept along a curve
///
/// Rings are `radial_segments + 1` vertices wide (the seam is duplicated) and
/// there are `tubular_segments + 1` of them.
pub fn tube_geometry(
    curve: &impl Curve,
    tubular_segments: u32,
    radius: f32,
    radial_segments: u32,
) -> Geometry {
    let tubular = tubular_segments.max(1);
    let radial = radial_segments.max(3);
    let frames = parallel_transport_frames(curve, tubular);

    let mut vertices = Vec::with_capacity(((tubular + 1) * (radial + 1)) as usize);
    for (i, frame) in frames.iter().enumerate() {
        let center = curve.point(i as f32 / tubular as f32);
        for j in 0..=radial {
            let v = j as f32 / radial as f32 * TAU;
            let (sin, cos) = v.sin_cos();
            let normal = (frame.normal * -cos + frame.binormal * sin).normalize();
            vertices.push(Vertex::new(center + normal * radius, normal));
        }
    }

    let ring = radial + 1;
    let mut indices = Vec::with_capacity((tubular * radial * 6) as usize);
    for j in 1..=tubular {
        for i in 1..=radial {
            let a = ring * (j - 1) + (i - 1);
            let b = ring * j + (i - 1);
            let c = ring * j + i;
            let d = ring * (j - 1) + i;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    Geometry::new(vertices, indices)
}
