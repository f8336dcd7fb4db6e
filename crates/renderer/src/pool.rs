//! Rendering pool: GPU-side meshes and textures built from decoded assets.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use asset::{Material, Mesh, TextureData};
use corelib::ecs::MeshId;
use glam::Mat4;
use wgpu::{Buffer, BufferUsages, Device, Queue, Texture, TextureView, util::DeviceExt};

use crate::{
    uniforms::{MaterialParams, ObjectBinding, ObjectUniform, UniformManager},
    vertex::GpuVertex,
};

pub struct GpuTexture {
    #[allow(dead_code)]
    texture: Texture,
    pub view: TextureView,
}

impl GpuTexture {
    pub fn upload(device: &Device, queue: &Queue, label: &str, data: &TextureData) -> Self {
        let size = wgpu::Extent3d {
            width: data.width,
            height: data.height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &data.data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(data.bytes_per_pixel() * data.width),
                rows_per_image: Some(data.height),
            },
            size,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }
}

/// One primitive ready to draw.
pub struct GpuPrimitive {
    pub vertex_buf: Buffer,
    pub index_buf: Option<Buffer>,
    /// Index count when indexed, vertex count otherwise.
    pub element_count: u32,
    pub material: MaterialParams,
    pub object: ObjectBinding,
}

pub struct GpuMesh {
    pub local_transform: Mat4,
    pub primitives: Vec<GpuPrimitive>,
}

pub struct RenderingPool {
    meshes: Vec<GpuMesh>,
    textures: HashMap<PathBuf, GpuTexture>,
    materials: HashMap<usize, Material>,
    white: GpuTexture,
}

impl RenderingPool {
    pub fn new(device: &Device, queue: &Queue) -> Self {
        Self {
            meshes: Vec::new(),
            textures: HashMap::new(),
            materials: HashMap::new(),
            white: GpuTexture::upload(device, queue, "White pixel", &TextureData::white_pixel()),
        }
    }

    /// Register decoded materials; primitives look them up by document id.
    pub fn register_materials(&mut self, materials: impl IntoIterator<Item = Material>) {
        for m in materials {
            self.materials.insert(m.id, m);
        }
    }

    pub fn upload_texture(&mut self, device: &Device, queue: &Queue, path: &Path, data: &TextureData) {
        let label = path.display().to_string();
        self.textures
            .insert(path.to_path_buf(), GpuTexture::upload(device, queue, &label, data));
    }

    /// Bound view for `path`, or the white pixel when the texture was never uploaded.
    fn view_for(&self, path: Option<&Path>) -> &TextureView {
        path.and_then(|p| self.textures.get(p))
            .map(|t| &t.view)
            .unwrap_or(&self.white.view)
    }

    /// Upload every primitive of `mesh`. Materials must be registered first.
    pub fn upload_mesh(&mut self, device: &Device, uniforms: &UniformManager, mesh: &Mesh) -> MeshId {
        let mut primitives = Vec::with_capacity(mesh.primitives.len());
        for prim in &mesh.primitives {
            if prim.vertices.is_empty() {
                log::warn!("Skipping primitive without vertices in mesh {:?}", mesh.name);
                continue;
            }
            let material = prim
                .material
                .and_then(|id| self.materials.get(&id))
                .cloned()
                .unwrap_or_else(|| Material::engine_default(prim.material.unwrap_or(usize::MAX)));
            let params = MaterialParams::from(&material);

            let vertices: Vec<GpuVertex> = prim.vertices.iter().map(GpuVertex::from).collect();
            let vertex_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh VB"),
                contents: bytemuck::cast_slice(&vertices),
                usage: BufferUsages::VERTEX,
            });
            let index_buf = prim.is_indexed().then(|| {
                device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Mesh IB"),
                    contents: bytemuck::cast_slice(&prim.indices),
                    usage: BufferUsages::INDEX,
                })
            });

            let initial = ObjectUniform::new(mesh.local_transform, params);
            let object = uniforms.create_object(
                device,
                &initial,
                self.view_for(material.diffuse.map().map(|t| t.path.as_path())),
                self.view_for(material.specular.map().map(|t| t.path.as_path())),
            );

            primitives.push(GpuPrimitive {
                vertex_buf,
                index_buf,
                element_count: prim.element_count() as u32,
                material: params,
                object,
            });
        }

        let id = MeshId(self.meshes.len() as u32);
        log::debug!(
            "Pooled mesh {:?} ({:?}) with {} primitives",
            id,
            mesh.name,
            primitives.len()
        );
        self.meshes.push(GpuMesh {
            local_transform: mesh.local_transform,
            primitives,
        });
        id
    }

    pub fn mesh(&self, id: MeshId) -> Option<&GpuMesh> {
        self.meshes.get(id.0 as usize)
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }
}
