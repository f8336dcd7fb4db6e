//! CPU-side mesh representation produced by the scene decoder.

use glam::Mat4;

pub const OPAQUE_WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Vertex with position/normal/optional uv/color. Values are in object space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: Option<[f32; 2]>,
    pub color: [f32; 4],
}

impl Vertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: Option<[f32; 2]>) -> Self {
        Self {
            position,
            normal,
            uv,
            color: OPAQUE_WHITE,
        }
    }
}

impl Default for Vertex {
    fn default() -> Self {
        Self::new([0.0; 3], [0.0, 0.0, 1.0], None)
    }
}

/// One draw's worth of triangle-list geometry.
///
/// An empty index list means the vertices are drawn unindexed.
/// The material is referenced by document id and resolved by the caller.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Primitive {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
    pub material: Option<usize>,
}

impl Primitive {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u16>, material: Option<usize>) -> Self {
        Self {
            vertices,
            indices,
            material,
        }
    }

    #[inline]
    pub fn is_indexed(&self) -> bool {
        !self.indices.is_empty()
    }

    /// Number of elements submitted to the draw call.
    pub fn element_count(&self) -> usize {
        if self.is_indexed() {
            self.indices.len()
        } else {
            self.vertices.len()
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.element_count() / 3
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    pub name: Option<String>,
    pub primitives: Vec<Primitive>,
    pub local_transform: Mat4,
}

impl Mesh {
    pub fn new(primitives: Vec<Primitive>) -> Self {
        Self {
            name: None,
            primitives,
            local_transform: Mat4::IDENTITY,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_transform(mut self, local_transform: Mat4) -> Self {
        self.local_transform = local_transform;
        self
    }

    pub fn vertex_count(&self) -> usize {
        self.primitives.iter().map(|p| p.vertices.len()).sum()
    }

    /// Returns `true` if there is at least one primitive and every primitive has vertices.
    pub fn is_valid(&self) -> bool {
        !self.primitives.is_empty() && self.primitives.iter().all(|p| !p.vertices.is_empty())
    }
}
