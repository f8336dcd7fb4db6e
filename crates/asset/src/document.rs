//! Typed view of a glTF 2.0 scene description.
//!
//! The JSON text is deserialized once into these structures and validated
//! up front; decoders then work with plain `Option`s instead of walking
//! untyped values.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{Result, SceneError};

pub const SUPPORTED_VERSION: &str = "2.0";

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub asset: AssetInfo,
    /// Index of the active scene.
    pub scene: Option<usize>,
    pub scenes: Vec<Scene>,
    pub nodes: Vec<Node>,
    pub meshes: Vec<MeshDef>,
    pub materials: Vec<MaterialDef>,
    pub accessors: Vec<Accessor>,
    pub buffer_views: Vec<BufferView>,
    pub buffers: Vec<BufferDef>,
    #[serde(default)]
    pub textures: Vec<TextureDef>,
    #[serde(default)]
    pub images: Vec<ImageDef>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetInfo {
    pub version: Option<String>,
    pub generator: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub name: Option<String>,
    #[serde(default)]
    pub nodes: Vec<usize>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub name: Option<String>,
    pub mesh: Option<usize>,
    /// 4x4 local transform, 16 numbers in document order.
    pub matrix: Option<Vec<f32>>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeshDef {
    pub name: Option<String>,
    pub primitives: Vec<PrimitiveDef>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimitiveDef {
    #[serde(default)]
    pub attributes: BTreeMap<String, usize>,
    pub indices: Option<usize>,
    pub material: Option<usize>,
    pub mode: Option<u32>,
}

impl PrimitiveDef {
    pub fn attribute(&self, semantic: &str) -> Option<usize> {
        self.attributes.get(semantic).copied()
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accessor {
    pub buffer_view: Option<usize>,
    pub byte_offset: Option<usize>,
    pub component_type: u32,
    pub count: usize,
    #[serde(rename = "type")]
    pub element_type: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferView {
    pub buffer: usize,
    pub byte_offset: Option<usize>,
    pub byte_length: Option<usize>,
    pub byte_stride: Option<usize>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferDef {
    pub uri: Option<String>,
    pub byte_length: Option<usize>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextureDef {
    pub source: Option<usize>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDef {
    pub uri: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialDef {
    pub name: Option<String>,
    pub extensions: Option<MaterialExtensions>,
    pub pbr_metallic_roughness: Option<PbrMetallicRoughness>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct MaterialExtensions {
    #[serde(rename = "KHR_materials_common")]
    pub khr_materials_common: Option<CommonMaterial>,
}

/// `KHR_materials_common` payload (the legacy fixed-function convention).
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CommonMaterial {
    pub technique: Option<String>,
    #[serde(default)]
    pub values: CommonValues,
}

/// Each channel is either `[textureIndex]` or an RGB(A) constant.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CommonValues {
    pub diffuse: Option<Vec<f32>>,
    pub specular: Option<Vec<f32>>,
    pub ambient: Option<Vec<f32>>,
    pub shininess: Option<Shininess>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum Shininess {
    Scalar(f32),
    Array(Vec<f32>),
}

impl Shininess {
    pub fn value(&self) -> Option<f32> {
        match self {
            Self::Scalar(v) => Some(*v),
            Self::Array(values) => values.first().copied(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbrMetallicRoughness {
    pub base_color_factor: Option<Vec<f32>>,
    pub base_color_texture: Option<TextureInfo>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextureInfo {
    pub index: usize,
}

impl Document {
    /// Parse and validate scene text.
    pub fn parse(text: &str) -> Result<Self> {
        let doc: Document = serde_json::from_str(text)?;
        doc.validate()?;
        Ok(doc)
    }

    fn validate(&self) -> Result<()> {
        match self.asset.version.as_deref() {
            Some(SUPPORTED_VERSION) => {}
            Some(other) => {
                return Err(SceneError::format(format!(
                    "Unsupported document version '{}' (expected {})",
                    other, SUPPORTED_VERSION
                )));
            }
            None => {
                return Err(SceneError::format("Document has no asset.version"));
            }
        }

        if self.scenes.len() != 1 {
            return Err(SceneError::format(format!(
                "Expected a single scene, found {}",
                self.scenes.len()
            )));
        }
        let active = self.active_scene_index();
        if active >= self.scenes.len() {
            return Err(SceneError::format(format!(
                "Active scene {} does not exist",
                active
            )));
        }

        for (id, node) in self.nodes.iter().enumerate() {
            if let Some(m) = &node.matrix {
                if m.len() != 16 {
                    return Err(SceneError::format(format!(
                        "Node {} matrix has {} elements, expected 16",
                        id,
                        m.len()
                    )));
                }
            }
            if let Some(mesh) = node.mesh {
                if mesh >= self.meshes.len() {
                    return Err(SceneError::format(format!(
                        "Node {} references missing mesh {}",
                        id, mesh
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn active_scene_index(&self) -> usize {
        self.scene.unwrap_or(0)
    }

    pub fn active_scene(&self) -> Option<&Scene> {
        self.scenes.get(self.active_scene_index())
    }

    pub fn accessor(&self, id: usize) -> Result<&Accessor> {
        self.accessors
            .get(id)
            .ok_or_else(|| SceneError::format(format!("Missing accessor {}", id)))
    }

    pub fn buffer_view(&self, id: usize) -> Result<&BufferView> {
        self.buffer_views
            .get(id)
            .ok_or_else(|| SceneError::format(format!("Missing bufferView {}", id)))
    }

    pub fn mesh(&self, id: usize) -> Result<&MeshDef> {
        self.meshes
            .get(id)
            .ok_or_else(|| SceneError::format(format!("Missing mesh {}", id)))
    }

    /// Resolve `textures[id].source -> images[..].uri`.
    pub fn texture_uri(&self, id: usize) -> Result<&str> {
        let texture = self
            .textures
            .get(id)
            .ok_or_else(|| SceneError::format(format!("Missing texture {}", id)))?;
        let source = texture
            .source
            .ok_or_else(|| SceneError::format(format!("Texture {} has no image source", id)))?;
        let image = self.images.get(source).ok_or_else(|| {
            SceneError::format(format!("Texture {} references missing image {}", id, source))
        })?;
        image
            .uri
            .as_deref()
            .ok_or_else(|| SceneError::format(format!("Image {} has no uri", source)))
    }
}
