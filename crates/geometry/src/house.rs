use crate::facet::{BOX_INDICES, PLACEHOLDER_UVS, flatten};
use crate::tangent::compute_tangents;
use glam::Vec3;
use zima_common::Mesh;

const HALF: f32 = 0.5;
const ROOF_OVERHANG: f32 = 1.3;
const ROOF_RISE: f32 = 0.6;

#[rustfmt::skip]
const ROOF_INDICES: [usize; 12] = [
    0,4,1, 1,4,2, 2,4,3, 3,4,0,
];

/// Unit cuboid body with a four-sided pyramid roof. Flat-shaded.
pub fn house() -> Mesh {
    let (w, h, d) = (HALF, HALF, HALF);
    let body = [
        Vec3::new(-w, -h, d),
        Vec3::new(w, -h, d),
        Vec3::new(w, h, d),
        Vec3::new(-w, h, d),
        Vec3::new(-w, -h, -d),
        Vec3::new(w, -h, -d),
        Vec3::new(w, h, -d),
        Vec3::new(-w, h, -d),
    ];
    let (rw, rd) = (w * ROOF_OVERHANG, d * ROOF_OVERHANG);
    let roof = [
        Vec3::new(-rw, h, -rd),
        Vec3::new(rw, h, -rd),
        Vec3::new(rw, h, rd),
        Vec3::new(-rw, h, rd),
        Vec3::new(0.0, h + ROOF_RISE, 0.0),
    ];

    let mut mesh = flatten(&body, &BOX_INDICES, PLACEHOLDER_UVS);
    mesh.append(flatten(&roof, &ROOF_INDICES, PLACEHOLDER_UVS));
    compute_tangents(&mut mesh.vertices);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::faces_away_from;

    #[test]
    fn body_and_roof_triangles() {
        assert_eq!(house().triangle_count(), 12 + 4);
    }

    #[test]
    fn faces_point_outward() {
        assert!(faces_away_from(&house(), Vec3::ZERO));
    }

    #[test]
    fn roof_apex_is_highest_point() {
        let (_, hi) = house().bounds().unwrap();
        assert!((hi.y - (HALF + ROOF_RISE)).abs() < 1e-6);
        assert!((hi.x - HALF * ROOF_OVERHANG).abs() < 1e-6);
    }

    #[test]
    fn body_matches_unit_cube() {
        let body = &house().vertices[..36];
        let cube = crate::unit_cube();
        for (a, b) in body.iter().zip(&cube.vertices) {
            assert_eq!(a.position(), b.position());
            assert_eq!(a.normal(), b.normal());
        }
    }

    #[test]
    fn stored_normals_match_winding() {
        let mesh = house();
        for (tri, n) in mesh.triangles().zip(mesh.face_normals()) {
            assert!(tri[0].normal().dot(n) > 0.0);
        }
    }
}
