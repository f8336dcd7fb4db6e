//! Asset loading: glTF 2.0 scene decoding (meshes, materials, node transforms)
//! and texture decoding, all through a [`ResourceProvider`].

pub mod accessor;
pub mod buffer;
pub mod document;
pub mod error;
pub mod material;
pub mod material_decoder;
pub mod mesh;
pub mod mesh_decoder;
pub mod resource;
pub mod scene;
pub mod texture;

#[cfg(test)]
mod fixtures;

pub use error::{Result, SceneError};
pub use material::{Color, Material, MaterialChannel, TextureRef};
pub use mesh::{Mesh, Primitive, Vertex};
pub use resource::{FsResourceProvider, MemoryResourceProvider, ResourceProvider};
pub use scene::SceneLoader;
pub use texture::TextureData;
