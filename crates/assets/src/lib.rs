//! Asset collaborators: where meshes and textures come from.
//!
//! Meshes are named by a closed [`MeshSource`] enum: either one of the
//! built-in generators or a path to an OBJ file. Textures are decoded into
//! plain RGBA8 buffers that any backend can upload.
//!
//! # Fallbacks
//! Every load returns a `Result`. The `*_or*` helpers log a warning and
//! substitute a placeholder (unit cube, 1x1 white texel) instead of failing.

mod obj;
mod source;
mod texture;

use std::path::PathBuf;

pub use obj::load_obj;
pub use source::MeshSource;
pub use texture::TextureData;

/// Errors from loading meshes or textures.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("OBJ parse error: {0}")]
    Obj(#[from] tobj::LoadError),
    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),
    #[error("model has no triangles: {0}")]
    EmptyMesh(PathBuf),
}

pub fn crate_info() -> &'static str {
    "zima-assets v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("assets"));
    }

    #[test]
    fn empty_mesh_error_names_the_file() {
        let e = LoadError::EmptyMesh(PathBuf::from("models/sled.obj"));
        assert!(e.to_string().contains("sled.obj"));
    }
}
