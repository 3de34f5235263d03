use crate::facet::{BOX_INDICES, flatten};
use crate::tangent::compute_tangents;
use glam::{Vec2, Vec3};
use zima_common::Mesh;

/// Stand-in mesh for models that fail to load. Carries no UV mapping.
pub fn unit_cube() -> Mesh {
    let p = 0.5;
    let corners = [
        Vec3::new(-p, -p, p),
        Vec3::new(p, -p, p),
        Vec3::new(p, p, p),
        Vec3::new(-p, p, p),
        Vec3::new(-p, -p, -p),
        Vec3::new(p, -p, -p),
        Vec3::new(p, p, -p),
        Vec3::new(-p, p, -p),
    ];
    let mut mesh = flatten(&corners, &BOX_INDICES, [Vec2::ZERO; 3]);
    compute_tangents(&mut mesh.vertices);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::faces_away_from;

    #[test]
    fn twelve_outward_triangles() {
        let cube = unit_cube();
        assert_eq!(cube.triangle_count(), 12);
        assert!(faces_away_from(&cube, Vec3::ZERO));
    }

    #[test]
    fn zero_uvs_still_yield_unit_tangents() {
        for v in &unit_cube().vertices {
            assert!((v.tangent().length() - 1.0).abs() < 1e-5);
        }
    }
}
