use crate::facet::{PLACEHOLDER_UVS, flatten};
use crate::tangent::compute_tangents;
use glam::Vec3;
use zima_common::Mesh;

const LENGTH: f32 = 1.0;
const WIDTH: f32 = 0.3;
const HEIGHT: f32 = 0.15;
/// Runners are shorter than the deck.
const RUNNER_SCALE: f32 = 0.7;
/// Blade tips poke slightly past the side walls.
const BLADE_FLARE: f32 = 1.05;

#[rustfmt::skip]
const INDICES: [usize; 66] = [
    4,7,6, 4,6,5,       // deck
    8,9,10, 8,10,11,    // runner floor
    0,4,5, 0,5,1,       // upper -Z
    3,2,6, 3,6,7,       // upper +Z
    1,5,6, 1,6,2,       // upper +X
    0,3,7, 0,7,4,       // upper -X
    8,0,1, 8,1,9,       // lower -Z
    11,10,2, 11,2,3,    // lower +Z
    9,1,2, 9,2,10,      // lower +X
    8,11,3, 8,3,0,      // lower -X
    8,12,9, 11,10,13,   // blades
];

fn hull() -> [Vec3; 14] {
    let (a, b, m) = (LENGTH / 2.0, WIDTH / 2.0, HEIGHT / 2.0);
    let r = a * RUNNER_SCALE;
    [
        // waist
        Vec3::new(-a, m, -b),
        Vec3::new(a, m, -b),
        Vec3::new(a, m, b),
        Vec3::new(-a, m, b),
        // deck
        Vec3::new(-a, HEIGHT, -b),
        Vec3::new(a, HEIGHT, -b),
        Vec3::new(a, HEIGHT, b),
        Vec3::new(-a, HEIGHT, b),
        // runners
        Vec3::new(-r, 0.0, -b),
        Vec3::new(r, 0.0, -b),
        Vec3::new(r, 0.0, b),
        Vec3::new(-r, 0.0, b),
        // blade tips
        Vec3::new(0.0, m, -b * BLADE_FLARE),
        Vec3::new(0.0, m, b * BLADE_FLARE),
    ]
}

/// Low-poly sled: closed hull tapering to shorter runners, plus two blades.
pub fn sled() -> Mesh {
    let mut mesh = flatten(&hull(), &INDICES, PLACEHOLDER_UVS);
    compute_tangents(&mut mesh.vertices);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::faces_away_from;

    #[test]
    fn hull_triangle_count() {
        assert_eq!(sled().triangle_count(), INDICES.len() / 3);
    }

    #[test]
    fn faces_point_away_from_waist_centre() {
        assert!(faces_away_from(&sled(), Vec3::new(0.0, HEIGHT / 2.0, 0.0)));
    }

    #[test]
    fn sits_on_the_ground() {
        let (lo, hi) = sled().bounds().unwrap();
        assert_eq!(lo.y, 0.0);
        assert_eq!(hi.y, HEIGHT);
        assert_eq!(hi.x, LENGTH / 2.0);
    }

    #[test]
    fn placeholder_uvs_give_finite_tangents() {
        let mesh = sled();
        for v in &mesh.vertices {
            assert!((v.tangent().length() - 1.0).abs() < 1e-4);
        }
    }
}
