use crate::sphere::{SphereParams, sphere};
use crate::tangent::compute_tangents;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use zima_common::{Mesh, Vertex, VertexKind};

/// Background tree: a thin open cylinder trunk topped by two glowing crowns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeParams {
    pub trunk_height: f32,
    pub trunk_radius: f32,
    pub trunk_base: f32,
    pub segments: u32,
    pub lower_crown: SphereParams,
    pub upper_crown: SphereParams,
    /// Crown centres relative to the trunk top.
    pub lower_crown_offset: f32,
    pub upper_crown_offset: f32,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            trunk_height: 1.2,
            trunk_radius: 0.1,
            trunk_base: -0.5,
            segments: 8,
            lower_crown: SphereParams::new(0.5, 8, 6, VertexKind::Glow),
            upper_crown: SphereParams::new(0.3, 8, 6, VertexKind::Glow),
            lower_crown_offset: -0.1,
            upper_crown_offset: 0.3,
        }
    }
}

pub fn tree(params: &TreeParams) -> Mesh {
    let mut mesh = open_cylinder(
        params.trunk_radius,
        params.trunk_base,
        params.trunk_height,
        params.segments,
        Side::Smooth,
    );

    let mut lower = sphere(&params.lower_crown);
    lower.translate(Vec3::Y * (params.trunk_height + params.lower_crown_offset));
    mesh.append(lower);

    let mut upper = sphere(&params.upper_crown);
    upper.translate(Vec3::Y * (params.trunk_height + params.upper_crown_offset));
    mesh.append(upper);

    compute_tangents(&mut mesh.vertices);
    mesh
}

/// How side normals are assigned on an open cylinder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    /// Each column of vertices gets its own radial normal.
    Smooth,
    /// One radial normal per side quad, taken at its leading edge.
    Faceted,
}

/// Side wall of a cylinder around the Y axis, from `bottom` to `top`, no caps.
pub(crate) fn open_cylinder(radius: f32, bottom: f32, top: f32, segments: u32, side: Side) -> Mesh {
    let mut mesh = Mesh::new();
    for i in 0..segments {
        let a1 = TAU * i as f32 / segments as f32;
        let a2 = TAU * (i + 1) as f32 / segments as f32;
        let r1 = Vec3::new(a1.cos(), 0.0, a1.sin());
        let r2 = Vec3::new(a2.cos(), 0.0, a2.sin());
        let (n1, n2) = match side {
            Side::Smooth => (r1, r2),
            Side::Faceted => (r1, r1),
        };

        let p1 = Vertex::new(r1 * radius + Vec3::Y * bottom, Vec2::new(0.0, 0.0), n1);
        let p2 = Vertex::new(r2 * radius + Vec3::Y * bottom, Vec2::new(1.0, 0.0), n2);
        let p3 = Vertex::new(r1 * radius + Vec3::Y * top, Vec2::new(0.0, 1.0), n1);
        let p4 = Vertex::new(r2 * radius + Vec3::Y * top, Vec2::new(1.0, 1.0), n2);

        mesh.push_triangle(p1, p3, p2);
        mesh.push_triangle(p2, p3, p4);
    }
    compute_tangents(&mut mesh.vertices);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trunk_plus_crowns() {
        let p = TreeParams::default();
        let mesh = tree(&p);
        let expected = 2 * p.segments as usize
            + p.lower_crown.triangle_count()
            + p.upper_crown.triangle_count();
        assert_eq!(mesh.triangle_count(), expected);
    }

    #[test]
    fn trunk_faces_outward() {
        let trunk = open_cylinder(0.1, -0.5, 1.2, 8, Side::Smooth);
        for (tri, n) in trunk.triangles().zip(trunk.face_normals()) {
            let centroid = (tri[0].position() + tri[1].position() + tri[2].position()) / 3.0;
            assert!(n.dot(Vec3::new(centroid.x, 0.0, centroid.z)) > 0.0);
            assert!(tri[0].normal().dot(n) > 0.0);
        }
    }

    #[test]
    fn crowns_glow_and_trunk_is_lit() {
        let p = TreeParams::default();
        let mesh = tree(&p);
        let trunk_verts = 6 * p.segments as usize;
        assert!(
            mesh.vertices[..trunk_verts]
                .iter()
                .all(|v| v.vertex_kind() == VertexKind::Lit)
        );
        assert!(
            mesh.vertices[trunk_verts..]
                .iter()
                .all(|v| v.vertex_kind() == VertexKind::Glow)
        );
    }

    #[test]
    fn upper_crown_sits_above_trunk() {
        let p = TreeParams::default();
        let (_, hi) = tree(&p).bounds().unwrap();
        let expected = p.trunk_height + p.upper_crown_offset + p.upper_crown.radius;
        assert!((hi.y - expected).abs() < 1e-4);
    }
}
