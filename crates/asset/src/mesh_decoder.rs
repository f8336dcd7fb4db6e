//! Node + mesh decoding: walks a node's mesh primitives and materializes
//! typed vertex/index data from the binary buffers.

use glam::Mat4;

use crate::{
    accessor::{self, AttributeKind, ResolvedAccessor},
    buffer::BinaryBuffer,
    document::{Document, Node, PrimitiveDef},
    error::{Result, SceneError},
    mesh::{Mesh, Primitive, Vertex},
};

/// Primitive topology codes 0..=6; only triangle lists are decoded.
pub const MODE_TRIANGLES: u32 = 4;

/// Decode the mesh referenced by node `node_id`.
pub fn decode_mesh(doc: &Document, buffers: &[BinaryBuffer], node_id: usize) -> Result<Mesh> {
    let node = doc
        .nodes
        .get(node_id)
        .ok_or_else(|| SceneError::not_found(format!("No node found with id {}", node_id)))?;
    decode_node(doc, buffers, node_id, node)
}

pub(crate) fn decode_node(
    doc: &Document,
    buffers: &[BinaryBuffer],
    node_id: usize,
    node: &Node,
) -> Result<Mesh> {
    let mesh_id = node.mesh.ok_or_else(|| {
        SceneError::not_found(format!("Node {} has no mesh reference", node_id))
    })?;
    let mesh_def = doc.mesh(mesh_id)?;

    let primitives = mesh_def
        .primitives
        .iter()
        .enumerate()
        .map(|(index, prim)| decode_primitive(doc, buffers, mesh_id, index, prim))
        .collect::<Result<Vec<_>>>()?;

    let mut mesh = Mesh::new(primitives);
    if let Some(m) = node.matrix.as_deref() {
        mesh.local_transform = local_matrix(m).ok_or_else(|| {
            SceneError::format(format!(
                "Node {} matrix has {} elements, expected 16",
                node_id,
                m.len()
            ))
        })?;
    }
    mesh.name = node.name.clone();

    log::debug!(
        "Decoded node {} ({:?}) -> mesh {}: {} primitives, {} vertices",
        node_id,
        mesh.name,
        mesh_id,
        mesh.primitives.len(),
        mesh.vertex_count()
    );
    Ok(mesh)
}

/// The 16 matrix numbers are kept in the order the document lists them.
fn local_matrix(m: &[f32]) -> Option<Mat4> {
    let cols: &[f32; 16] = m.try_into().ok()?;
    Some(Mat4::from_cols_array(cols))
}

fn decode_primitive(
    doc: &Document,
    buffers: &[BinaryBuffer],
    mesh_id: usize,
    index: usize,
    prim: &PrimitiveDef,
) -> Result<Primitive> {
    if let Some(mode) = prim.mode {
        if mode != MODE_TRIANGLES {
            return Err(SceneError::format(format!(
                "Found unsupported primitive mode {} for mesh {} primitive {}, only TRIANGLES ({}) is supported",
                mode, mesh_id, index, MODE_TRIANGLES
            )));
        }
    }

    let position = required_attribute(doc, prim, AttributeKind::Position, mesh_id)?;
    if position.count == 0 {
        return Err(SceneError::format(format!(
            "Mesh {} primitive {} has an empty POSITION accessor",
            mesh_id, index
        )));
    }
    let positions = position.read_vec3(buffer_for(buffers, &position)?)?;
    let vertex_count = positions.len();

    let mut vertices: Vec<Vertex> = positions
        .into_iter()
        .map(|p| Vertex::new(p, [0.0; 3], None))
        .collect();

    let normal = required_attribute(doc, prim, AttributeKind::Normal, mesh_id)?;
    check_count(&normal, vertex_count, AttributeKind::Normal, mesh_id)?;
    let normals = normal.read_vec3(buffer_for(buffers, &normal)?)?;
    for (vertex, n) in vertices.iter_mut().zip(normals) {
        vertex.normal = n;
    }

    if let Some(uv_id) = prim.attribute("TEXCOORD_0") {
        if prim.attribute("TEXCOORD_1").is_some() {
            return Err(SceneError::format(format!(
                "Dual textures not supported (mesh {} primitive {} has TEXCOORD_1)",
                mesh_id, index
            )));
        }
        let uv = accessor::resolve(doc, uv_id, AttributeKind::TexCoord)?;
        check_count(&uv, vertex_count, AttributeKind::TexCoord, mesh_id)?;
        let uvs = uv.read_vec2(buffer_for(buffers, &uv)?)?;
        for (vertex, t) in vertices.iter_mut().zip(uvs) {
            vertex.uv = Some(t);
        }
    }

    let indices = match prim.indices {
        Some(indices_id) => {
            let resolved = accessor::resolve(doc, indices_id, AttributeKind::Indices)?;
            resolved.read_indices(buffer_for(buffers, &resolved)?)?
        }
        None => Vec::new(),
    };

    Ok(Primitive::new(vertices, indices, prim.material))
}

fn required_attribute(
    doc: &Document,
    prim: &PrimitiveDef,
    kind: AttributeKind,
    mesh_id: usize,
) -> Result<ResolvedAccessor> {
    let id = prim.attribute(kind.semantic()).ok_or_else(|| {
        SceneError::format(format!(
            "Mesh {} primitive has no {} attribute",
            mesh_id,
            kind.semantic()
        ))
    })?;
    accessor::resolve(doc, id, kind)
}

fn check_count(
    resolved: &ResolvedAccessor,
    expected: usize,
    kind: AttributeKind,
    mesh_id: usize,
) -> Result<()> {
    if resolved.count != expected {
        return Err(SceneError::format(format!(
            "{} count {} of mesh {} does not match POSITION count {}",
            kind.semantic(),
            resolved.count,
            mesh_id,
            expected
        )));
    }
    Ok(())
}

fn buffer_for<'a>(buffers: &'a [BinaryBuffer], resolved: &ResolvedAccessor) -> Result<&'a BinaryBuffer> {
    buffers
        .get(resolved.buffer)
        .ok_or_else(|| SceneError::format(format!("Missing buffer {}", resolved.buffer)))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::fixtures::{BinBuilder, triangle_scene};

    fn load(doc: serde_json::Value, bin: Vec<u8>) -> (Document, Vec<BinaryBuffer>) {
        let doc = Document::parse(&doc.to_string()).unwrap();
        (doc, vec![BinaryBuffer::new(0, bin)])
    }

    #[test]
    fn decodes_indexed_triangle() {
        let (doc, bufs) = load(triangle_scene().doc, triangle_scene().bin);
        let mesh = decode_mesh(&doc, &bufs, 0).unwrap();

        assert_eq!(mesh.name.as_deref(), Some("triangle"));
        assert_eq!(mesh.primitives.len(), 1);
        let prim = &mesh.primitives[0];
        assert_eq!(prim.vertices.len(), 3);
        assert_eq!(prim.indices, vec![0, 1, 2]);
        assert_eq!(prim.material, Some(0));
        assert_eq!(prim.vertices[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(prim.vertices[2].normal, [0.0, 0.0, 1.0]);
        assert_eq!(prim.vertices[2].uv, Some([0.0, 1.0]));
        assert!(prim.vertices.iter().all(|v| v.color == [1.0; 4]));
        assert_eq!(mesh.local_transform, Mat4::IDENTITY);
    }

    #[test]
    fn decodes_interleaved_vertex_buffer() {
        // [pos(12) normal(12) uv(8)] = 32 byte stride, shared by three accessors.
        let mut bin = BinBuilder::default();
        let start = bin.f32s(&[
            0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, //
            0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.5, 1.0,
        ]);
        let doc = json!({
            "asset": { "version": "2.0" },
            "scenes": [{ "nodes": [0] }],
            "nodes": [{ "mesh": 0 }],
            "meshes": [{ "primitives": [{
                "attributes": { "POSITION": 0, "NORMAL": 1, "TEXCOORD_0": 2 }
            }]}],
            "materials": [],
            "accessors": [
                { "bufferView": 0, "byteOffset": 0, "componentType": 5126, "count": 3, "type": "VEC3" },
                { "bufferView": 0, "byteOffset": 12, "componentType": 5126, "count": 3, "type": "VEC3" },
                { "bufferView": 0, "byteOffset": 24, "componentType": 5126, "count": 3, "type": "VEC2" }
            ],
            "bufferViews": [{ "buffer": 0, "byteOffset": start, "byteStride": 32 }],
            "buffers": [{ "uri": "x.bin" }]
        });
        let (doc, bufs) = load(doc, bin.finish());
        let mesh = decode_mesh(&doc, &bufs, 0).unwrap();
        let v = &mesh.primitives[0].vertices;

        assert_eq!(v[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(v[1].normal, [0.0, 1.0, 0.0]);
        assert_eq!(v[2].normal, [1.0, 0.0, 0.0]);
        assert_eq!(v[2].uv, Some([0.5, 1.0]));
        assert!(mesh.primitives[0].indices.is_empty());
        assert_eq!(mesh.primitives[0].material, None);
    }

    #[test]
    fn triangle_strip_is_rejected() {
        let mut scene = triangle_scene();
        scene.doc["meshes"][0]["primitives"][0]["mode"] = json!(5);
        let (doc, bufs) = load(scene.doc, scene.bin);
        let err = decode_mesh(&doc, &bufs, 0).unwrap_err();
        assert!(err.is_format());
        assert!(err.to_string().contains("mode 5"));
    }

    #[test]
    fn empty_position_accessor_is_rejected() {
        let mut scene = triangle_scene();
        for accessor in 0..3 {
            scene.doc["accessors"][accessor]["count"] = json!(0);
        }
        let (doc, bufs) = load(scene.doc, scene.bin);
        let err = decode_mesh(&doc, &bufs, 0).unwrap_err();
        assert!(err.is_format());
        assert!(err.to_string().contains("empty POSITION"));
    }

    #[test]
    fn explicit_triangles_mode_is_accepted() {
        let mut scene = triangle_scene();
        scene.doc["meshes"][0]["primitives"][0]["mode"] = json!(4);
        let (doc, bufs) = load(scene.doc, scene.bin);
        assert!(decode_mesh(&doc, &bufs, 0).is_ok());
    }

    #[test]
    fn dual_uv_channels_are_rejected() {
        let mut scene = triangle_scene();
        scene.doc["meshes"][0]["primitives"][0]["attributes"]["TEXCOORD_1"] = json!(2);
        let (doc, bufs) = load(scene.doc, scene.bin);
        let err = decode_mesh(&doc, &bufs, 0).unwrap_err();
        assert!(err.is_format());
        assert!(err.to_string().contains("Dual textures"));
    }

    #[test]
    fn non_float_position_is_rejected() {
        let mut scene = triangle_scene();
        scene.doc["accessors"][0]["componentType"] = json!(5123);
        let (doc, bufs) = load(scene.doc, scene.bin);
        assert!(decode_mesh(&doc, &bufs, 0).unwrap_err().is_format());
    }

    #[test]
    fn missing_normal_is_rejected() {
        let mut scene = triangle_scene();
        scene.doc["meshes"][0]["primitives"][0]["attributes"]
            .as_object_mut()
            .unwrap()
            .remove("NORMAL");
        let (doc, bufs) = load(scene.doc, scene.bin);
        assert!(decode_mesh(&doc, &bufs, 0).unwrap_err().is_format());
    }

    #[test]
    fn mismatched_attribute_counts_are_rejected() {
        let mut scene = triangle_scene();
        scene.doc["accessors"][1]["count"] = json!(2);
        let (doc, bufs) = load(scene.doc, scene.bin);
        let err = decode_mesh(&doc, &bufs, 0).unwrap_err();
        assert!(err.to_string().contains("NORMAL count 2"));
    }

    #[test]
    fn truncated_buffer_is_a_format_error() {
        let scene = triangle_scene();
        let mut bin = scene.bin;
        bin.truncate(20);
        let (doc, bufs) = load(scene.doc, bin);
        assert!(decode_mesh(&doc, &bufs, 0).unwrap_err().is_format());
    }

    #[test]
    fn node_matrix_becomes_local_transform() {
        let mut scene = triangle_scene();
        let m: Vec<f32> = (0..16).map(|i| i as f32).collect();
        scene.doc["nodes"][0]["matrix"] = json!(m);
        let (doc, bufs) = load(scene.doc, scene.bin);
        let mesh = decode_mesh(&doc, &bufs, 0).unwrap();
        assert_eq!(mesh.local_transform.to_cols_array().to_vec(), m);
    }

    #[test]
    fn node_without_mesh_is_not_found() {
        let mut scene = triangle_scene();
        scene.doc["nodes"] = json!([{ "mesh": 0, "name": "triangle" }, { "name": "empty" }]);
        let (doc, bufs) = load(scene.doc, scene.bin);
        assert!(decode_mesh(&doc, &bufs, 1).unwrap_err().is_not_found());
        assert!(decode_mesh(&doc, &bufs, 9).unwrap_err().is_not_found());
    }

    #[test]
    fn decoding_twice_yields_equal_independent_meshes() {
        let (doc, bufs) = load(triangle_scene().doc, triangle_scene().bin);
        let mut a = decode_mesh(&doc, &bufs, 0).unwrap();
        let b = decode_mesh(&doc, &bufs, 0).unwrap();
        assert_eq!(a, b);
        a.primitives[0].vertices[0].position = [9.0; 3];
        assert_ne!(a, b);
    }

    #[test]
    fn unsigned_byte_indices_are_widened() {
        let mut bin = BinBuilder::default();
        let pos = bin.f32s(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
        let nrm = bin.f32s(&[0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
        let idx = bin.bytes(&[2, 1, 0]);
        let doc = json!({
            "asset": { "version": "2.0" },
            "scenes": [{ "nodes": [0] }],
            "nodes": [{ "mesh": 0 }],
            "meshes": [{ "primitives": [{
                "attributes": { "POSITION": 0, "NORMAL": 1 }, "indices": 2
            }]}],
            "materials": [],
            "accessors": [
                { "bufferView": 0, "componentType": 5126, "count": 3 },
                { "bufferView": 1, "componentType": 5126, "count": 3 },
                { "bufferView": 2, "componentType": 5121, "count": 3 }
            ],
            "bufferViews": [
                { "buffer": 0, "byteOffset": pos },
                { "buffer": 0, "byteOffset": nrm },
                { "buffer": 0, "byteOffset": idx }
            ],
            "buffers": [{ "uri": "x.bin" }]
        });
        let (doc, bufs) = load(doc, bin.finish());
        let mesh = decode_mesh(&doc, &bufs, 0).unwrap();
        assert_eq!(mesh.primitives[0].indices, vec![2, 1, 0]);
    }
}
