use glam::{Vec2, Vec3};
use zima_common::{Mesh, Vertex};

/// Per-corner UVs used by faceted solids that carry no real texture mapping.
pub(crate) const PLACEHOLDER_UVS: [Vec2; 3] = [
    Vec2::new(0.0, 0.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(0.5, 1.0),
];

/// Triangle table for a box whose corners are numbered front face first
/// (z+, counter-clockwise from bottom-left), then the back face.
#[rustfmt::skip]
pub(crate) const BOX_INDICES: [usize; 36] = [
    0,1,2, 0,2,3, // +Z
    5,4,7, 5,7,6, // -Z
    1,5,6, 1,6,2, // +X
    4,0,3, 4,3,7, // -X
    3,2,6, 3,6,7, // +Y
    4,5,1, 4,1,0, // -Y
];

/// Flatten an indexed triangle table into a triangle list with one flat
/// normal per face, taken from the winding.
pub(crate) fn flatten(positions: &[Vec3], indices: &[usize], uvs: [Vec2; 3]) -> Mesh {
    let mut mesh = Mesh::new();
    for tri in indices.chunks_exact(3) {
        let (a, b, c) = (positions[tri[0]], positions[tri[1]], positions[tri[2]]);
        let normal = (b - a).cross(c - a).normalize_or_zero();
        mesh.push_triangle(
            Vertex::new(a, uvs[0], normal),
            Vertex::new(b, uvs[1], normal),
            Vertex::new(c, uvs[2], normal),
        );
    }
    mesh
}
