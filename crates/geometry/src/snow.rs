use crate::tangent::compute_tangents;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use zima_common::{Mesh, Vertex};

/// Snow pad under the centrepiece tree: a shallow cone fan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnowCircleParams {
    pub radius: f32,
    pub segments: u32,
    pub center: Vec3,
    /// Height of the shared centre vertex above the rim.
    pub apex_lift: f32,
}

impl Default for SnowCircleParams {
    fn default() -> Self {
        Self {
            radius: 200.0,
            segments: 32,
            center: Vec3::new(0.0, 0.0, 200.0),
            apex_lift: 5.0,
        }
    }
}

pub fn snow_circle(params: &SnowCircleParams) -> Mesh {
    let rim = |i: u32| {
        let a = TAU * i as f32 / params.segments as f32;
        let (s, c) = a.sin_cos();
        Vertex::new(
            params.center + Vec3::new(s, 0.0, c) * params.radius,
            Vec2::new((s + 1.0) * 0.5, (c + 1.0) * 0.5),
            Vec3::Y,
        )
    };
    let apex = Vertex::new(
        params.center + Vec3::Y * params.apex_lift,
        Vec2::splat(0.5),
        Vec3::Y,
    );

    let mut mesh = Mesh::new();
    for i in 0..params.segments {
        mesh.push_triangle(rim(i), rim(i + 1), apex);
    }
    compute_tangents(&mut mesh.vertices);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_triangle_per_segment() {
        assert_eq!(snow_circle(&SnowCircleParams::default()).triangle_count(), 32);
    }

    #[test]
    fn fan_faces_up() {
        let mesh = snow_circle(&SnowCircleParams::default());
        assert!(mesh.face_normals().all(|n| n.y > 0.0));
    }

    #[test]
    fn rim_stays_on_radius() {
        let p = SnowCircleParams::default();
        let mesh = snow_circle(&p);
        for tri in mesh.triangles() {
            for v in &tri[..2] {
                let flat = v.position() - p.center;
                assert!((flat.length() - p.radius).abs() < 1e-2);
            }
            assert_eq!(tri[2].uv(), Vec2::splat(0.5));
        }
    }
}
