//! Scene bootstrap: decode a glTF scene and upload it into the rendering pool.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use asset::{FsResourceProvider, Material, Mesh, ResourceProvider, SceneLoader, TextureData};
use corelib::{
    Vec3,
    ecs::{MeshId, Renderable, World},
    transform::Transform,
};
use renderer::GpuState;

/// Axis-aligned bounds of everything that was uploaded.
pub type Bounds = (Vec3, Vec3);

/// Split a scene file path into the resource root and the document name.
pub fn split_scene_path(path: &Path) -> Result<(PathBuf, String)> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Scene path {:?} has no file name", path))?
        .to_owned();
    let root = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((root, name))
}

/// Decode every distinct texture map referenced by `materials`. Maps that fail to
/// load are skipped; the pool binds its white texture for them instead.
pub fn load_material_textures<P>(provider: &P, materials: &[Material]) -> Vec<(PathBuf, TextureData)>
where
    P: ResourceProvider + ?Sized,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for tex in materials.iter().flat_map(Material::maps) {
        if !seen.insert(tex.path.clone()) {
            continue;
        }
        match TextureData::load(provider, &tex.path) {
            Ok(data) => out.push((tex.path.clone(), data)),
            Err(e) => log::warn!("Texture {:?} unavailable, using white: {e:#}", tex.path),
        }
    }
    out
}

/// World-space bounds of `meshes` after their local transforms.
pub fn mesh_bounds<'a>(meshes: impl IntoIterator<Item = &'a Mesh>) -> Option<Bounds> {
    let mut bounds: Option<Bounds> = None;
    for mesh in meshes {
        for prim in &mesh.primitives {
            for v in &prim.vertices {
                let p = mesh.local_transform.transform_point3(Vec3::from(v.position));
                bounds = Some(match bounds {
                    Some((min, max)) => (min.min(p), max.max(p)),
                    None => (p, p),
                });
            }
        }
    }
    bounds
}

/// Upload `meshes` and spawn one renderable entity per mesh.
pub fn spawn_meshes(gpu: &mut GpuState, world: &mut World, meshes: &[Mesh]) -> Vec<MeshId> {
    let (device, _, uniforms, pool) = gpu.upload_context();
    meshes
        .iter()
        .map(|mesh| {
            let id = pool.upload_mesh(device, uniforms, mesh);
            world.spawn(Transform::identity(), Some(Renderable { mesh: id }));
            id
        })
        .collect()
}

/// Load the glTF file at `path`: textures, then materials, then meshes.
pub fn load_scene(gpu: &mut GpuState, world: &mut World, path: &Path) -> Result<Option<Bounds>> {
    let (root, name) = split_scene_path(path)?;
    let provider = FsResourceProvider::new(root);
    let loader = SceneLoader::open(&provider, "", &name)
        .with_context(|| format!("Failed to open scene {:?}", path))?;

    let materials = loader.all_materials();
    let textures = load_material_textures(&provider, &materials);
    {
        let (device, queue, _, pool) = gpu.upload_context();
        for (tex_path, data) in &textures {
            pool.upload_texture(device, queue, tex_path, data);
        }
        pool.register_materials(materials);
    }

    let meshes = loader
        .all_meshes()
        .with_context(|| format!("Failed to decode meshes of {:?}", path))?;
    let ids = spawn_meshes(gpu, world, &meshes);
    log::info!(
        "Scene {:?}: {} meshes, {} textures uploaded",
        path,
        ids.len(),
        gpu.pool().texture_count()
    );
    Ok(mesh_bounds(&meshes))
}
