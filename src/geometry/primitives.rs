use glam::Vec3;
use std::f32::consts::TAU;

use super::Geometry;
use crate::types::Vertex;

/// Axis-aligned box centred on the origin, four vertices per face
pub fn box_geometry(width: f32, height: f32, depth: f32) -> Geometry {
    let half = Vec3::new(width, height, depth) * 0.5;

    // (normal, u, v) with u x v == normal so faces wind counter-clockwise
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for (normal, u, v) in faces {
        let base = vertices.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let position = (normal + u * su + v * sv) * half;
            vertices.push(Vertex::new(position, normal));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    Geometry::new(vertices, indices)
}

/// Capped cylinder (or truncated cone) along Y, centred on the origin
pub fn cylinder_geometry(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    radial_segments: u32,
) -> Geometry {
    let segments = radial_segments.max(3);
    let half_height = height * 0.5;
    let slope = (radius_bottom - radius_top) / height;

    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    // Torso: row 0 at the top, row 1 at the bottom
    for (y, radius) in [(half_height, radius_top), (-half_height, radius_bottom)] {
        for x in 0..=segments {
            let theta = x as f32 / segments as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            let position = Vec3::new(radius * sin, y, radius * cos);
            let normal = Vec3::new(sin, slope, cos).normalize();
            vertices.push(Vertex::new(position, normal));
        }
    }

    let row = segments + 1;
    for x in 0..segments {
        let a = x;
        let b = row + x;
        let c = row + x + 1;
        let d = x + 1;
        indices.extend_from_slice(&[a, b, d, b, c, d]);
    }

    push_cap(&mut vertices, &mut indices, segments, radius_top, half_height, true);
    push_cap(&mut vertices, &mut indices, segments, radius_bottom, -half_height, false);

    Geometry::new(vertices, indices)
}

fn push_cap(
    vertices: &mut Vec<Vertex>,
    indices: &mut Vec<u32>,
    segments: u32,
    radius: f32,
    y: f32,
    top: bool,
) {
    let normal = if top { Vec3::Y } else { Vec3::NEG_Y };

    let center_start = vertices.len() as u32;
    for _ in 0..segments {
        vertices.push(Vertex::new(Vec3::new(0.0, y, 0.0), normal));
    }

    let ring_start = vertices.len() as u32;
    for x in 0..=segments {
        let theta = x as f32 / segments as f32 * TAU;
        let (sin, cos) = theta.sin_cos();
        vertices.push(Vertex::new(Vec3::new(radius * sin, y, radius * cos), normal));
    }

    for x in 0..segments {
        let c = center_start + x;
        let i = ring_start + x;
        if top {
            indices.extend_from_slice(&[i, i + 1, c]);
        } else {
            indices.extend_from_slice(&[i + 1, i, c]);
        }
    }
}

/// Single quad in the XY plane facing +Z
pub fn plane_geometry(width: f32, height: f32) -> Geometry {
    let (hw, hh) = (width * 0.5, height * 0.5);
    let vertices = [(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)]
        .into_iter()
        .map(|(x, y)| Vertex::new(Vec3::new(x, y, 0.0), Vec3::Z))
        .collect();
    Geometry::new(vertices, vec![0, 1, 2, 0, 2, 3])
}
