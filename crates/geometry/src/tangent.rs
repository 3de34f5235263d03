use glam::Vec3;
use zima_common::Vertex;

/// UV determinants smaller than this are treated as degenerate.
const UV_EPSILON: f32 = 1e-8;

/// Compute one flat tangent per triangle and write it to all three corners.
///
/// A trailing partial triangle is left untouched. When the UV mapping of a
/// triangle is degenerate (zero-area in UV space) the tangent falls back to
/// the first edge, and to +X when the triangle itself has no extent.
pub fn compute_tangents(vertices: &mut [Vertex]) {
    for tri in vertices.chunks_exact_mut(3) {
        let tangent = triangle_tangent(&tri[0], &tri[1], &tri[2]);
        for v in tri.iter_mut() {
            v.tangent = tangent.to_array();
        }
    }
}

fn triangle_tangent(a: &Vertex, b: &Vertex, c: &Vertex) -> Vec3 {
    let e1 = b.position() - a.position();
    let e2 = c.position() - a.position();
    let d1 = b.uv() - a.uv();
    let d2 = c.uv() - a.uv();

    let det = d1.x * d2.y - d2.x * d1.y;
    if det.abs() > UV_EPSILON {
        let f = 1.0 / det;
        let t = f * (d2.y * e1 - d1.y * e2);
        if let Some(t) = t.try_normalize() {
            return t;
        }
    }
    e1.try_normalize().unwrap_or(Vec3::X)
}
