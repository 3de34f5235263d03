//! Shared types for the zima workspace: the vertex layout and the
//! triangle-list mesh every generator and loader produces.
//!
//! # Invariants
//! - A well-formed mesh holds a multiple of three vertices.
//! - Vertex layout is `#[repr(C)]` and uploaded to the GPU as-is.

mod mesh;
mod types;

pub use mesh::Mesh;
pub use types::{Vertex, VertexKind};

pub fn crate_info() -> &'static str {
    "zima-common v0.1.0"
}
