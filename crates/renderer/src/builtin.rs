//! Built-in content used when no scene is loaded.

use asset::{Mesh, Primitive, Vertex};

/// Unit cube with per-face normals and uvs (24 vertices, CCW triangles).
pub fn cube_mesh() -> Mesh {
    // (normal, tangent u, tangent v) per face
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
    ];
    let corners = [(-1.0f32, -1.0f32), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

    let mut vertices = Vec::with_capacity(24);
    let mut indices: Vec<u16> = Vec::with_capacity(36);
    for (n, u, v) in faces {
        let base = vertices.len() as u16;
        for (cu, cv) in corners {
            let position = [
                n[0] + u[0] * cu + v[0] * cv,
                n[1] + u[1] * cu + v[1] * cv,
                n[2] + u[2] * cu + v[2] * cv,
            ];
            let uv = [(cu + 1.0) * 0.5, 1.0 - (cv + 1.0) * 0.5];
            vertices.push(Vertex::new(position, n, Some(uv)));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    Mesh::new(vec![Primitive::new(vertices, indices, None)]).with_name("cube")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    #[test]
    fn cube_has_24_vertices_and_12_triangles() {
        let mesh = cube_mesh();
        assert!(mesh.is_valid());
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.primitives[0].triangle_count(), 12);
    }

    #[test]
    fn triangles_wind_counter_clockwise_around_normals() {
        let mesh = cube_mesh();
        let prim = &mesh.primitives[0];
        for tri in prim.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| prim.vertices[i as usize]);
            let face = cross(sub(b.position, a.position), sub(c.position, a.position));
            let dot: f32 = face.iter().zip(a.normal).map(|(f, n)| f * n).sum();
            assert!(dot > 0.0);
        }
    }
}
