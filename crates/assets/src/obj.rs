use crate::LoadError;
use glam::{Vec2, Vec3};
use std::path::Path;
use zima_common::{Mesh, Vertex};
use zima_geometry::compute_tangents;

/// Load every model in an OBJ file into one flat triangle list.
///
/// Faces are triangulated, texture v is flipped to a top-left origin, and
/// missing normals default to +Y. Materials are ignored.
pub fn load_obj(path: impl AsRef<Path>) -> Result<Mesh, LoadError> {
    let path = path.as_ref();
    let (models, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )?;

    let mut mesh = Mesh::new();
    for model in &models {
        let m = &model.mesh;
        let has_uv = !m.texcoords.is_empty() && m.texcoords.len() * 3 >= m.positions.len() * 2;
        let has_normals = !m.normals.is_empty() && m.normals.len() >= m.positions.len();

        for &index in &m.indices {
            let i = index as usize;
            let position = Vec3::new(
                m.positions[3 * i],
                m.positions[3 * i + 1],
                m.positions[3 * i + 2],
            );
            let uv = if has_uv {
                Vec2::new(m.texcoords[2 * i], 1.0 - m.texcoords[2 * i + 1])
            } else {
                Vec2::ZERO
            };
            let normal = if has_normals {
                Vec3::new(m.normals[3 * i], m.normals[3 * i + 1], m.normals[3 * i + 2])
            } else {
                Vec3::Y
            };
            mesh.vertices.push(Vertex::new(position, uv, normal));
        }
    }

    // Drop a trailing partial triangle.
    let whole = mesh.triangle_count() * 3;
    mesh.vertices.truncate(whole);

    if mesh.is_empty() {
        return Err(LoadError::EmptyMesh(path.to_path_buf()));
    }

    compute_tangents(&mut mesh.vertices);
    tracing::info!(
        path = %path.display(),
        models = models.len(),
        vertices = mesh.vertex_count(),
        "loaded OBJ model"
    );
    Ok(mesh)
}
