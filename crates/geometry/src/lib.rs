//! Procedural geometry: pure functions that build triangle-list meshes for
//! every built-in scene object, plus the tangent pass they all share.
//!
//! # Invariants
//! - Every generator returns a well-formed mesh (vertex count divisible by 3).
//! - Every generator runs [`compute_tangents`] before returning.
//! - Triangles wind counter-clockwise when seen from outside the solid
//!   (from above for terrain and the snow disc).

mod cube;
mod facet;
mod house;
mod lantern;
mod sled;
mod snow;
mod sphere;
mod tangent;
mod terrain;
mod tree;

pub use cube::unit_cube;
pub use house::house;
pub use lantern::{LanternParams, lantern};
pub use sled::sled;
pub use snow::{SnowCircleParams, snow_circle};
pub use sphere::{SphereParams, sphere};
pub use tangent::compute_tangents;
pub use terrain::{TerrainParams, terrain};
pub use tree::{TreeParams, tree};

pub fn crate_info() -> &'static str {
    "zima-geometry v0.1.0"
}

#[cfg(test)]
pub(crate) mod test_util {
    use glam::Vec3;
    use zima_common::Mesh;

    /// True when every triangle's winding normal points away from `pivot`.
    pub fn faces_away_from(mesh: &Mesh, pivot: Vec3) -> bool {
        mesh.triangles().all(|t| {
            let (a, b, c) = (t[0].position(), t[1].position(), t[2].position());
            let n = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            n.dot(centroid - pivot) > 0.0
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_generator_is_well_formed() {
        let meshes = [
            terrain(&TerrainParams::default()),
            sphere(&SphereParams::default()),
            house(),
            tree(&TreeParams::default()),
            lantern(&LanternParams::default()),
            sled(),
            snow_circle(&SnowCircleParams::default()),
            unit_cube(),
        ];
        for mesh in &meshes {
            assert!(mesh.is_well_formed());
            assert!(!mesh.is_empty());
            assert!(mesh.vertices.iter().all(|v| v.tangent().is_finite()));
        }
    }
}
