//! Uniform manager: the camera uniform shared by every draw and the
//! per-object (model + material) uniforms with their texture bindings.

use std::num::NonZeroU64;

use asset::{Color, Material, MaterialChannel};
use bytemuck::{Pod, Zeroable};
use corelib::camera::Camera;
use glam::{Mat4, Vec3};
use wgpu::{
    BindGroup, BindGroupLayout, BindGroupLayoutDescriptor, BindGroupLayoutEntry, BindingType,
    Buffer, BufferBindingType, BufferUsages, Device, Queue, Sampler, SamplerBindingType,
    ShaderStages, TextureSampleType, TextureView, TextureViewDimension, util::DeviceExt,
};

/// Camera UBO (16-byte aligned).
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub eye: [f32; 4],
    /// Direction the light travels, world space.
    pub light_dir: [f32; 4],
}

impl CameraUniform {
    pub fn new(camera: &Camera, light_dir: Vec3) -> Self {
        Self {
            view_proj: camera.proj_view().to_cols_array_2d(),
            eye: camera.eye.extend(1.0).to_array(),
            light_dir: light_dir.normalize_or_zero().extend(0.0).to_array(),
        }
    }
}

/// Material constants as the shader sees them. A texture-backed channel uploads
/// white so `color * texel` works for both kinds of channel.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct MaterialParams {
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub ambient: [f32; 4],
    /// x = shininess, y = diffuse is mapped, z = specular is mapped
    pub params: [f32; 4],
}

impl From<&Material> for MaterialParams {
    fn from(m: &Material) -> Self {
        fn constant(channel: &MaterialChannel) -> [f32; 4] {
            channel.color().unwrap_or(Color::WHITE).to_array()
        }
        fn mapped(channel: &MaterialChannel) -> f32 {
            if channel.map().is_some() { 1.0 } else { 0.0 }
        }
        Self {
            diffuse: constant(&m.diffuse),
            specular: constant(&m.specular),
            ambient: m.ambient.to_array(),
            params: [m.shininess, mapped(&m.diffuse), mapped(&m.specular), 0.0],
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    pub material: MaterialParams,
}

impl ObjectUniform {
    pub fn new(model: Mat4, material: MaterialParams) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: model.inverse().transpose().to_cols_array_2d(),
            material,
        }
    }
}

/// Uniform buffer + bind group for one drawn primitive.
pub struct ObjectBinding {
    pub buffer: Buffer,
    pub bind_group: BindGroup,
}

pub struct UniformManager {
    camera_bgl: BindGroupLayout,
    camera_bg: BindGroup,
    camera_buf: Buffer,
    object_bgl: BindGroupLayout,
    sampler: Sampler,
}

impl UniformManager {
    pub fn new(device: &Device) -> Self {
        let camera_bgl = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("Camera BGL"),
            entries: &[uniform_entry::<CameraUniform>(
                0,
                ShaderStages::VERTEX | ShaderStages::FRAGMENT,
            )],
        });
        let camera_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera UBO"),
            contents: bytemuck::bytes_of(&CameraUniform::zeroed()),
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        });
        let camera_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera BG"),
            layout: &camera_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buf.as_entire_binding(),
            }],
        });

        let object_bgl = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("Object BGL"),
            entries: &[
                uniform_entry::<ObjectUniform>(0, ShaderStages::VERTEX | ShaderStages::FRAGMENT),
                texture_entry(1),
                texture_entry(2),
                BindGroupLayoutEntry {
                    binding: 3,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Sampler(SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Material sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            camera_bgl,
            camera_bg,
            camera_buf,
            object_bgl,
            sampler,
        }
    }

    pub fn camera_layout(&self) -> &BindGroupLayout {
        &self.camera_bgl
    }

    pub fn object_layout(&self) -> &BindGroupLayout {
        &self.object_bgl
    }

    pub fn camera_bind_group(&self) -> &BindGroup {
        &self.camera_bg
    }

    pub fn write_camera(&self, queue: &Queue, camera: &CameraUniform) {
        queue.write_buffer(&self.camera_buf, 0, bytemuck::bytes_of(camera));
    }

    /// Allocate the uniform buffer and bind group for one primitive.
    pub fn create_object(
        &self,
        device: &Device,
        initial: &ObjectUniform,
        diffuse_map: &TextureView,
        specular_map: &TextureView,
    ) -> ObjectBinding {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Object UBO"),
            contents: bytemuck::bytes_of(initial),
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Object BG"),
            layout: &self.object_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(diffuse_map),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(specular_map),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });
        ObjectBinding { buffer, bind_group }
    }

    pub fn write_object(&self, queue: &Queue, binding: &ObjectBinding, uniform: &ObjectUniform) {
        queue.write_buffer(&binding.buffer, 0, bytemuck::bytes_of(uniform));
    }
}

fn uniform_entry<T>(binding: u32, visibility: ShaderStages) -> BindGroupLayoutEntry {
    BindGroupLayoutEntry {
        binding,
        visibility,
        ty: BindingType::Buffer {
            ty: BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: NonZeroU64::new(std::mem::size_of::<T>() as u64),
        },
        count: None,
    }
}

fn texture_entry(binding: u32) -> BindGroupLayoutEntry {
    BindGroupLayoutEntry {
        binding,
        visibility: ShaderStages::FRAGMENT,
        ty: BindingType::Texture {
            sample_type: TextureSampleType::Float { filterable: true },
            view_dimension: TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}
