use crate::types::{Vertex, VertexKind};
use glam::Vec3;

/// A flat triangle list: every three consecutive vertices form one triangle.
///
/// There is no index buffer; shared corners are duplicated so each triangle
/// can carry its own normal and tangent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vertices(vertices: Vec<Vertex>) -> Self {
        Self { vertices }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// True when the vertex count is a whole number of triangles.
    pub fn is_well_formed(&self) -> bool {
        self.vertices.len() % 3 == 0
    }

    pub fn push_triangle(&mut self, a: Vertex, b: Vertex, c: Vertex) {
        self.vertices.extend([a, b, c]);
    }

    /// Append another mesh's triangles after this mesh's.
    pub fn append(&mut self, mut other: Mesh) {
        self.vertices.append(&mut other.vertices);
    }

    pub fn translate(&mut self, offset: Vec3) {
        for v in &mut self.vertices {
            v.position = (v.position() + offset).to_array();
        }
    }

    pub fn set_kind(&mut self, kind: VertexKind) {
        for v in &mut self.vertices {
            v.kind = kind.as_f32();
        }
    }

    /// Iterate triangles as vertex triples. A trailing partial triangle is skipped.
    pub fn triangles(&self) -> impl Iterator<Item = &[Vertex]> {
        self.vertices.chunks_exact(3)
    }

    /// Geometric normal of each triangle, taken from its winding.
    pub fn face_normals(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.triangles().map(|t| {
            let (a, b, c) = (t[0].position(), t[1].position(), t[2].position());
            (b - a).cross(c - a)
        })
    }

    /// Axis-aligned bounds as (min, max). `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = self.vertices.first()?.position();
        Some(self.vertices.iter().fold((first, first), |(lo, hi), v| {
            let p = v.position();
            (lo.min(p), hi.max(p))
        }))
    }
}
