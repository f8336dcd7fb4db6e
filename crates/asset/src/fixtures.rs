//! Hand-built scene documents and binary blobs shared by the unit tests.

use serde_json::{Value, json};

use crate::resource::MemoryResourceProvider;

/// Little-endian blob builder; every push is 4-byte aligned and returns its offset.
#[derive(Default)]
pub(crate) struct BinBuilder {
    bytes: Vec<u8>,
}

impl BinBuilder {
    fn align(&mut self) -> usize {
        while self.bytes.len() % 4 != 0 {
            self.bytes.push(0);
        }
        self.bytes.len()
    }

    pub(crate) fn f32s(&mut self, values: &[f32]) -> usize {
        let start = self.align();
        self.bytes.extend(values.iter().flat_map(|v| v.to_le_bytes()));
        start
    }

    pub(crate) fn u16s(&mut self, values: &[u16]) -> usize {
        let start = self.align();
        self.bytes.extend(values.iter().flat_map(|v| v.to_le_bytes()));
        start
    }

    pub(crate) fn bytes(&mut self, values: &[u8]) -> usize {
        let start = self.align();
        self.bytes.extend_from_slice(values);
        start
    }

    pub(crate) fn finish(mut self) -> Vec<u8> {
        self.align();
        self.bytes
    }
}

pub(crate) struct SceneFixture {
    pub doc: Value,
    pub bin: Vec<u8>,
}

impl SceneFixture {
    /// Serve the document at `scenes/triangle.gltf` and its blob at `scenes/triangle.bin`.
    pub(crate) fn provider(&self) -> MemoryResourceProvider {
        MemoryResourceProvider::new()
            .with("scenes/triangle.gltf", self.doc.to_string())
            .with("scenes/triangle.bin", self.bin.clone())
    }
}

/// One indexed, textured triangle on node 0 plus three materials:
/// a legacy-convention one, a metallic-roughness one and an unsupported one.
pub(crate) fn triangle_scene() -> SceneFixture {
    let mut bin = BinBuilder::default();
    let pos = bin.f32s(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    let nrm = bin.f32s(&[0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
    let uv = bin.f32s(&[0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
    let idx = bin.u16s(&[0, 1, 2]);
    let bin = bin.finish();

    let doc = json!({
        "asset": { "version": "2.0", "generator": "fixture" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [{ "name": "triangle", "mesh": 0 }],
        "meshes": [{
            "name": "triangle-mesh",
            "primitives": [{
                "attributes": { "POSITION": 0, "NORMAL": 1, "TEXCOORD_0": 2 },
                "indices": 3,
                "material": 0
            }]
        }],
        "materials": [
            {
                "name": "phong",
                "extensions": { "KHR_materials_common": {
                    "technique": "PHONG",
                    "values": { "diffuse": [0.2, 0.3, 0.4], "specular": [0], "shininess": [32.0] }
                }}
            },
            {
                "name": "red",
                "pbrMetallicRoughness": { "baseColorFactor": [1.0, 0.0, 0.0, 1.0] }
            },
            { "name": "mystery" }
        ],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3" },
            { "bufferView": 1, "componentType": 5126, "count": 3, "type": "VEC3" },
            { "bufferView": 2, "componentType": 5126, "count": 3, "type": "VEC2" },
            { "bufferView": 3, "componentType": 5123, "count": 3, "type": "SCALAR" }
        ],
        "bufferViews": [
            { "buffer": 0, "byteOffset": pos, "byteLength": 36 },
            { "buffer": 0, "byteOffset": nrm, "byteLength": 36 },
            { "buffer": 0, "byteOffset": uv, "byteLength": 24 },
            { "buffer": 0, "byteOffset": idx, "byteLength": 6 }
        ],
        "buffers": [{ "uri": "triangle.bin", "byteLength": bin.len() }],
        "textures": [{ "source": 0 }],
        "images": [{ "uri": "checker.png" }]
    });

    SceneFixture { doc, bin }
}
