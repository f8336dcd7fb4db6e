//! Scene loader facade: opens a document, indexes its binary buffers and
//! decodes meshes/materials on demand.
//!
//! All state is read-only after [`SceneLoader::open`], so a loader can be
//! shared between threads and decoded from concurrently.

use std::path::{Path, PathBuf};

use crate::{
    buffer::BinaryBuffer,
    document::Document,
    error::{Result, SceneError},
    material::Material,
    material_decoder,
    mesh::Mesh,
    mesh_decoder,
    resource::ResourceProvider,
};

#[derive(Debug)]
pub struct SceneLoader {
    base: PathBuf,
    document: Document,
    buffers: Vec<BinaryBuffer>,
}

impl SceneLoader {
    /// Open `base/name` through `provider` and load every buffer it declares.
    pub fn open<P>(provider: &P, base: impl AsRef<Path>, name: &str) -> Result<Self>
    where
        P: ResourceProvider + ?Sized,
    {
        let base = base.as_ref().to_path_buf();
        let doc_path = base.join(name);
        let text = provider
            .text_resource(&doc_path)
            .map_err(|source| SceneError::Resource {
                path: doc_path.clone(),
                source,
            })?;
        let document = Document::parse(&text)?;

        let mut buffers = Vec::with_capacity(document.buffers.len());
        for (id, def) in document.buffers.iter().enumerate() {
            let uri = buffer_uri(id, def.uri.as_deref())?;
            let path = base.join(uri);
            let bytes = provider
                .binary_resource(&path)
                .map_err(|source| SceneError::Resource {
                    path: path.clone(),
                    source,
                })?;
            if let Some(expected) = def.byte_length {
                if bytes.len() < expected {
                    log::warn!(
                        "Buffer {} ({:?}) holds {} bytes, document declares {}",
                        id,
                        path,
                        bytes.len(),
                        expected
                    );
                }
            }
            buffers.push(BinaryBuffer::new(id, bytes));
        }

        log::info!(
            "Opened scene {:?}: {} nodes, {} meshes, {} materials, {} buffers",
            doc_path,
            document.nodes.len(),
            document.meshes.len(),
            document.materials.len(),
            buffers.len()
        );

        Ok(Self {
            base,
            document,
            buffers,
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Directory that document-relative uris resolve against.
    pub fn base_path(&self) -> &Path {
        &self.base
    }

    pub fn buffer(&self, id: usize) -> Option<&BinaryBuffer> {
        self.buffers.get(id)
    }

    /// Root node ids of the active scene.
    pub fn scene_nodes(&self) -> &[usize] {
        self.document
            .active_scene()
            .map(|s| s.nodes.as_slice())
            .unwrap_or_default()
    }

    pub fn mesh_by_id(&self, node_id: usize) -> Result<Mesh> {
        mesh_decoder::decode_mesh(&self.document, &self.buffers, node_id)
    }

    /// First node in document order with this name that references a mesh.
    /// Later nodes with the same name are ignored.
    pub fn mesh_by_name(&self, name: &str) -> Result<Mesh> {
        let (node_id, node) = self
            .document
            .nodes
            .iter()
            .enumerate()
            .find(|(_, n)| n.mesh.is_some() && n.name.as_deref() == Some(name))
            .ok_or_else(|| SceneError::not_found(format!("No node found named {}", name)))?;
        mesh_decoder::decode_node(&self.document, &self.buffers, node_id, node)
    }

    /// Every node with a mesh reference, in document order. Stops at the first failure.
    pub fn all_meshes(&self) -> Result<Vec<Mesh>> {
        self.document
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.mesh.is_some())
            .map(|(id, node)| mesh_decoder::decode_node(&self.document, &self.buffers, id, node))
            .collect()
    }

    /// `Ok(None)` for materials in an unsupported convention.
    pub fn material(&self, id: usize) -> Result<Option<Material>> {
        material_decoder::decode_material(&self.document, &self.base, id)
    }

    /// Every decodable material in document order. Unsupported or broken entries
    /// are logged and left out; use [`Material::id`] to match primitives.
    pub fn all_materials(&self) -> Vec<Material> {
        (0..self.document.materials.len())
            .filter_map(|id| match self.material(id) {
                Ok(material) => material,
                Err(e) => {
                    log::error!("Skipping material {}: {}", id, e);
                    None
                }
            })
            .collect()
    }

    /// Resource path of document texture `id`.
    pub fn texture_path(&self, id: usize) -> Result<PathBuf> {
        Ok(self.base.join(self.document.texture_uri(id)?))
    }
}

fn buffer_uri(id: usize, uri: Option<&str>) -> Result<&str> {
    match uri {
        Some(uri) if uri.starts_with("data:") => Err(SceneError::format(format!(
            "Buffer {} uses an embedded data uri, which is not supported",
            id
        ))),
        Some(uri) => Ok(uri),
        None => Err(SceneError::format(format!("Buffer {} has no uri", id))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        fixtures::{SceneFixture, triangle_scene},
        resource::MemoryResourceProvider,
    };

    fn open(scene: &SceneFixture) -> Result<SceneLoader> {
        SceneLoader::open(&scene.provider(), "scenes", "triangle.gltf")
    }

    #[test]
    fn opens_and_indexes_buffers() {
        let scene = triangle_scene();
        let loader = open(&scene).unwrap();
        assert_eq!(loader.buffer(0).unwrap().len(), scene.bin.len());
        assert!(loader.buffer(1).is_none());
        assert_eq!(loader.scene_nodes(), &[0]);
        assert_eq!(loader.base_path(), Path::new("scenes"));
    }

    #[test]
    fn missing_buffer_resource_is_reported() {
        let scene = triangle_scene();
        let provider =
            MemoryResourceProvider::new().with("scenes/triangle.gltf", scene.doc.to_string());
        let err = SceneLoader::open(&provider, "scenes", "triangle.gltf").unwrap_err();
        match err {
            SceneError::Resource { path, .. } => assert_eq!(path, Path::new("scenes/triangle.bin")),
            other => panic!("expected Resource, got {other:?}"),
        }
    }

    #[test]
    fn version_mismatch_fails_to_open() {
        let mut scene = triangle_scene();
        scene.doc["asset"]["version"] = json!("1.1");
        assert!(open(&scene).unwrap_err().is_format());
    }

    #[test]
    fn data_uri_buffers_are_rejected() {
        let mut scene = triangle_scene();
        scene.doc["buffers"][0]["uri"] = json!("data:application/octet-stream;base64,AAAA");
        assert!(open(&scene).unwrap_err().is_format());
    }

    #[test]
    fn mesh_lookup_by_id_and_name_agree() {
        let loader = open(&triangle_scene()).unwrap();
        assert_eq!(
            loader.mesh_by_id(0).unwrap(),
            loader.mesh_by_name("triangle").unwrap()
        );
    }

    #[test]
    fn unknown_name_is_not_found() {
        let loader = open(&triangle_scene()).unwrap();
        assert!(loader.mesh_by_name("nope").unwrap_err().is_not_found());
        assert!(loader.mesh_by_id(42).unwrap_err().is_not_found());
    }

    #[test]
    fn duplicate_names_resolve_to_first_node() {
        let mut scene = triangle_scene();
        let mut shifted = vec![0.0f32; 16];
        for i in [0, 5, 10, 15] {
            shifted[i] = 1.0;
        }
        shifted[12] = 5.0;
        scene.doc["nodes"] = json!([
            { "name": "dup", "mesh": 0 },
            { "name": "dup", "mesh": 0, "matrix": shifted }
        ]);
        let loader = open(&scene).unwrap();
        let mesh = loader.mesh_by_name("dup").unwrap();
        assert_eq!(mesh.local_transform, glam::Mat4::IDENTITY);
    }

    #[test]
    fn all_meshes_skips_nodes_without_mesh() {
        let mut scene = triangle_scene();
        scene.doc["nodes"] = json!([
            { "name": "camera" },
            { "name": "a", "mesh": 0 },
            { "name": "b", "mesh": 0 }
        ]);
        let loader = open(&scene).unwrap();
        let meshes = loader.all_meshes().unwrap();
        let names: Vec<_> = meshes.iter().map(|m| m.name.as_deref()).collect();
        assert_eq!(names, vec![Some("a"), Some("b")]);
    }

    #[test]
    fn all_meshes_propagates_decode_errors() {
        let mut scene = triangle_scene();
        scene.doc["meshes"][0]["primitives"][0]["mode"] = json!(1);
        let loader = open(&scene).unwrap();
        assert!(loader.all_meshes().unwrap_err().is_format());
    }

    #[test]
    fn all_materials_omits_unsupported_entries() {
        let loader = open(&triangle_scene()).unwrap();
        let materials = loader.all_materials();
        assert_eq!(loader.document().materials.len(), 3);
        assert_eq!(materials.len(), 2);
        assert_eq!(materials[0].id, 0);
        assert_eq!(materials[1].id, 1);
        assert_eq!(
            materials[0].specular.map().map(|t| t.path.clone()),
            Some(PathBuf::from("scenes/checker.png"))
        );
        assert!(loader.material(2).unwrap().is_none());
    }

    #[test]
    fn all_materials_skips_broken_entries() {
        let mut scene = triangle_scene();
        scene.doc["materials"][1] = json!({ "pbrMetallicRoughness": { "baseColorTexture": { "index": 9 } } });
        let loader = open(&scene).unwrap();
        let ids: Vec<_> = loader.all_materials().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![0]);
        assert!(loader.material(1).unwrap_err().is_format());
    }

    #[test]
    fn concurrent_decodes_agree() {
        let loader = open(&triangle_scene()).unwrap();
        let expected = loader.mesh_by_id(0).unwrap();
        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| loader.mesh_by_id(0).unwrap()))
                .collect();
            for h in handles {
                assert_eq!(h.join().unwrap(), expected);
            }
        });
    }

    #[test]
    fn texture_path_joins_base() {
        let loader = open(&triangle_scene()).unwrap();
        assert_eq!(loader.texture_path(0).unwrap(), PathBuf::from("scenes/checker.png"));
        assert!(loader.texture_path(5).is_err());
    }
}
