use crate::sphere::{SphereParams, sphere};
use crate::tangent::compute_tangents;
use crate::tree::{Side, open_cylinder};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use zima_common::{Mesh, VertexKind};

/// Street lantern: faceted post with a glowing bulb on top.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanternParams {
    pub radius: f32,
    pub height: f32,
    pub segments: u32,
    pub bulb: SphereParams,
}

impl Default for LanternParams {
    fn default() -> Self {
        Self {
            radius: 2.0,
            height: 40.0,
            segments: 12,
            bulb: SphereParams::new(4.0, 10, 10, VertexKind::Glow),
        }
    }
}

pub fn lantern(params: &LanternParams) -> Mesh {
    let mut mesh = open_cylinder(params.radius, 0.0, params.height, params.segments, Side::Faceted);
    let mut bulb = sphere(&params.bulb);
    bulb.translate(Vec3::Y * params.height);
    mesh.append(bulb);
    compute_tangents(&mut mesh.vertices);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_and_bulb_counts() {
        let p = LanternParams::default();
        assert_eq!(
            lantern(&p).triangle_count(),
            2 * 12 + p.bulb.triangle_count()
        );
    }

    #[test]
    fn post_sides_share_one_normal() {
        let p = LanternParams::default();
        let mesh = lantern(&p);
        for side in mesh.vertices[..6 * p.segments as usize].chunks_exact(6) {
            assert!(side.iter().all(|v| v.normal == side[0].normal));
        }
    }

    #[test]
    fn bulb_crowns_the_post() {
        let p = LanternParams::default();
        let (lo, hi) = lantern(&p).bounds().unwrap();
        assert!(lo.y.abs() < 1e-6);
        assert!((hi.y - (p.height + p.bulb.radius)).abs() < 1e-3);
    }
}
