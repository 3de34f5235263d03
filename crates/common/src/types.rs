use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Shading tag carried per vertex.
///
/// `Glow` vertices bypass lighting and render as flat white (crowns,
/// lantern bulbs).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VertexKind {
    #[default]
    Lit,
    Glow,
}

impl VertexKind {
    pub fn as_f32(self) -> f32 {
        match self {
            VertexKind::Lit => 0.0,
            VertexKind::Glow => 1.0,
        }
    }

    /// Classify a raw tag the way the shader does (`> 0.5` glows).
    pub fn from_f32(tag: f32) -> Self {
        if tag > 0.5 {
            VertexKind::Glow
        } else {
            VertexKind::Lit
        }
    }
}

/// One corner of one triangle. Tangent is filled in by the tangent pass.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
    pub normal: [f32; 3],
    pub tangent: [f32; 3],
    pub kind: f32,
}

impl Vertex {
    pub fn new(position: Vec3, uv: Vec2, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            uv: uv.to_array(),
            normal: normal.to_array(),
            tangent: [0.0; 3],
            kind: VertexKind::Lit.as_f32(),
        }
    }

    pub fn with_kind(mut self, kind: VertexKind) -> Self {
        self.kind = kind.as_f32();
        self
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn uv(&self) -> Vec2 {
        Vec2::from_array(self.uv)
    }

    pub fn normal(&self) -> Vec3 {
        Vec3::from_array(self.normal)
    }

    pub fn tangent(&self) -> Vec3 {
        Vec3::from_array(self.tangent)
    }

    pub fn vertex_kind(&self) -> VertexKind {
        VertexKind::from_f32(self.kind)
    }
}
