use crate::tangent::compute_tangents;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI, TAU};
use zima_common::{Mesh, Vertex, VertexKind};

/// Latitude/longitude sphere parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SphereParams {
    pub radius: f32,
    /// Longitudinal slices.
    pub sectors: u32,
    /// Latitudinal bands, pole to pole.
    pub stacks: u32,
    pub kind: VertexKind,
}

impl Default for SphereParams {
    fn default() -> Self {
        Self {
            radius: 1.0,
            sectors: 16,
            stacks: 12,
            kind: VertexKind::Lit,
        }
    }
}

impl SphereParams {
    pub fn new(radius: f32, sectors: u32, stacks: u32, kind: VertexKind) -> Self {
        Self {
            radius,
            sectors,
            stacks,
            kind,
        }
    }

    /// Polar bands contribute one triangle per sector, the rest two.
    pub fn triangle_count(&self) -> usize {
        let (s, n) = (self.stacks as usize, self.sectors as usize);
        (2 * s * n).saturating_sub(2 * n)
    }
}

/// UV sphere centred on the origin. Normals are the normalized positions.
pub fn sphere(params: &SphereParams) -> Mesh {
    let SphereParams {
        radius,
        sectors,
        stacks,
        kind,
    } = *params;

    let ring = sectors as usize + 1;
    let mut grid = Vec::with_capacity(ring * (stacks as usize + 1));
    for i in 0..=stacks {
        let stack_angle = FRAC_PI_2 - i as f32 / stacks as f32 * PI;
        let xz = radius * stack_angle.cos();
        let y = radius * stack_angle.sin();
        for j in 0..=sectors {
            let sector_angle = j as f32 / sectors as f32 * TAU;
            let pos = Vec3::new(xz * sector_angle.cos(), y, xz * sector_angle.sin());
            let uv = Vec2::new(j as f32 / sectors as f32, i as f32 / stacks as f32);
            grid.push(Vertex::new(pos, uv, pos.normalize_or_zero()).with_kind(kind));
        }
    }

    let mut mesh = Mesh::new();
    for i in 0..stacks as usize {
        for j in 0..sectors as usize {
            let k1 = i * ring + j;
            let k2 = k1 + ring;
            if i != 0 {
                mesh.push_triangle(grid[k1], grid[k1 + 1], grid[k2]);
            }
            if i + 1 != stacks as usize {
                mesh.push_triangle(grid[k1 + 1], grid[k2 + 1], grid[k2]);
            }
        }
    }

    compute_tangents(&mut mesh.vertices);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::faces_away_from;

    #[test]
    fn triangle_count_matches_formula() {
        for (sectors, stacks) in [(8, 6), (10, 10), (16, 12), (3, 2)] {
            let p = SphereParams::new(2.0, sectors, stacks, VertexKind::Lit);
            let mesh = sphere(&p);
            assert_eq!(
                mesh.triangle_count(),
                2 * stacks as usize * sectors as usize - 2 * sectors as usize
            );
            assert_eq!(mesh.triangle_count(), p.triangle_count());
        }
    }

    #[test]
    fn vertices_lie_on_radius() {
        let mesh = sphere(&SphereParams::new(4.0, 10, 10, VertexKind::Lit));
        for v in &mesh.vertices {
            assert!((v.position().length() - 4.0).abs() < 1e-3);
        }
    }

    #[test]
    fn winding_faces_outward() {
        let mesh = sphere(&SphereParams::new(3.0, 12, 8, VertexKind::Lit));
        assert!(faces_away_from(&mesh, Vec3::ZERO));
    }

    #[test]
    fn kind_is_applied() {
        let mesh = sphere(&SphereParams::new(0.5, 8, 6, VertexKind::Glow));
        assert!(mesh.vertices.iter().all(|v| v.vertex_kind() == VertexKind::Glow));
    }
}
