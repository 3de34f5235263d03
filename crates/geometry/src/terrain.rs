use crate::tangent::compute_tangents;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use zima_common::{Mesh, Vertex};

/// Rolling height-field parameters. The grid is centred on the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    /// Grid columns (samples along X).
    pub width: u32,
    /// Grid rows (samples along Z).
    pub height: u32,
    /// World-space edge length of the whole grid.
    pub size: f32,
    pub max_height: f32,
    /// Vertical scale applied on top of `max_height`.
    pub amplitude: f32,
    /// Radians of the height wave across the grid.
    pub frequency: f32,
    pub uv_tiling: f32,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            width: 50,
            height: 50,
            size: 5000.0,
            max_height: 100.0,
            amplitude: 0.3,
            frequency: 4.0,
            uv_tiling: 20.0,
        }
    }
}

impl TerrainParams {
    /// Height sample at grid coordinate (x, z).
    pub fn sample(&self, x: u32, z: u32) -> Vec3 {
        let fx = x as f32 / self.width as f32;
        let fz = z as f32 / self.height as f32;
        let h = 0.5 + 0.3 * (fx * self.frequency).sin() * (fz * self.frequency).cos();
        Vec3::new(
            (fx - 0.5) * self.size,
            h * self.max_height * self.amplitude,
            (fz - 0.5) * self.size,
        )
    }

    fn uv(&self, x: u32, z: u32) -> Vec2 {
        Vec2::new(x as f32 / self.width as f32, z as f32 / self.height as f32) * self.uv_tiling
    }
}

/// Two triangles per grid cell, normals straight up.
pub fn terrain(params: &TerrainParams) -> Mesh {
    let mut mesh = Mesh::new();
    let corner = |x: u32, z: u32| Vertex::new(params.sample(x, z), params.uv(x, z), Vec3::Y);

    for z in 0..params.height.saturating_sub(1) {
        for x in 0..params.width.saturating_sub(1) {
            let near_left = corner(x, z);
            let far_left = corner(x, z + 1);
            let near_right = corner(x + 1, z);
            let far_right = corner(x + 1, z + 1);
            mesh.push_triangle(near_left, far_left, near_right);
            mesh.push_triangle(near_right, far_left, far_right);
        }
    }

    compute_tangents(&mut mesh.vertices);
    tracing::debug!(triangles = mesh.triangle_count(), "generated terrain");
    mesh
}
