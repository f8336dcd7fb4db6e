//! Material decoding.
//!
//! A material entry follows one of two conventions: the legacy
//! `KHR_materials_common` values (diffuse/specular/ambient/shininess) or
//! `pbrMetallicRoughness`. Both are first read into [`Shading`] and then
//! reduced into a single [`Material`] by [`reduce`].

use std::path::Path;

use crate::{
    document::{CommonMaterial, Document, MaterialDef, PbrMetallicRoughness},
    error::{Result, SceneError},
    material::{Color, DEFAULT_SHININESS, Material, MaterialChannel, TextureRef},
};

const PHONG: &str = "PHONG";

/// Shininess of metallic-roughness materials; no physical mapping is attempted.
pub const METALLIC_ROUGHNESS_SHININESS: f32 = 16.0;

enum ShadingModel<'a> {
    Common(&'a CommonMaterial),
    MetallicRoughness(&'a PbrMetallicRoughness),
}

impl<'a> ShadingModel<'a> {
    fn detect(def: &'a MaterialDef) -> Option<Self> {
        if let Some(common) = def
            .extensions
            .as_ref()
            .and_then(|ext| ext.khr_materials_common.as_ref())
        {
            return Some(Self::Common(common));
        }
        def.pbr_metallic_roughness
            .as_ref()
            .map(Self::MetallicRoughness)
    }
}

/// A channel before texture ids are resolved into resource paths.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Source {
    Texture(usize),
    Color(Color),
}

#[derive(Debug, PartialEq)]
struct Shading {
    diffuse: Source,
    specular: Source,
    ambient: Color,
    shininess: f32,
}

/// Decode material `id`.
///
/// `Ok(None)` means the entry uses neither supported convention; the caller
/// should fall back to the engine default material.
pub fn decode_material(doc: &Document, base: &Path, id: usize) -> Result<Option<Material>> {
    let def = doc
        .materials
        .get(id)
        .ok_or_else(|| SceneError::not_found(format!("No material found with id {}", id)))?;

    let shading = match ShadingModel::detect(def) {
        Some(ShadingModel::Common(common)) => common_shading(id, common)?,
        Some(ShadingModel::MetallicRoughness(pbr)) => metallic_roughness_shading(pbr),
        None => {
            log::error!(
                "Material {} ({:?}): type not supported (neither KHR_materials_common nor pbrMetallicRoughness)",
                id,
                def.name
            );
            return Ok(None);
        }
    };

    reduce(doc, base, id, def.name.clone(), shading).map(Some)
}

fn common_shading(id: usize, common: &CommonMaterial) -> Result<Shading> {
    if common.technique.as_deref() != Some(PHONG) {
        log::warn!(
            "Material {}: shading technique {:?} is not supported, PHONG will be used instead",
            id,
            common.technique
        );
    }
    let values = &common.values;

    let diffuse = channel(id, "diffuse", values.diffuse.as_deref())?;
    let specular = channel(id, "specular", values.specular.as_deref())?;
    let ambient = values
        .ambient
        .as_deref()
        .and_then(Color::from_components)
        .unwrap_or(match diffuse {
            Source::Color(c) if c.a > 0.0 => c,
            _ => Color::WHITE,
        });
    let shininess = values
        .shininess
        .as_ref()
        .and_then(|s| s.value())
        .unwrap_or(DEFAULT_SHININESS);

    Ok(Shading {
        diffuse,
        specular,
        ambient,
        shininess,
    })
}

/// `[textureIndex]` is a map, three or more numbers a color, anything else white.
fn channel(id: usize, field: &str, values: Option<&[f32]>) -> Result<Source> {
    match values {
        Some([index]) => texture_index(*index).map(Source::Texture).ok_or_else(|| {
            SceneError::format(format!(
                "Material {} {} texture index {} is not a valid index",
                id, field, index
            ))
        }),
        Some(c) => Ok(Source::Color(Color::from_components(c).unwrap_or(Color::WHITE))),
        None => Ok(Source::Color(Color::WHITE)),
    }
}

fn texture_index(value: f32) -> Option<usize> {
    (value >= 0.0 && value.fract() == 0.0).then_some(value as usize)
}

fn metallic_roughness_shading(pbr: &PbrMetallicRoughness) -> Shading {
    let (diffuse, specular) = match &pbr.base_color_texture {
        Some(tex) => (Source::Texture(tex.index), Color::WHITE),
        None => {
            let base = pbr
                .base_color_factor
                .as_deref()
                .and_then(Color::from_components)
                .unwrap_or(Color::WHITE);
            (Source::Color(base), base)
        }
    };

    Shading {
        diffuse,
        specular: Source::Color(specular),
        ambient: specular,
        shininess: METALLIC_ROUGHNESS_SHININESS,
    }
}

fn reduce(
    doc: &Document,
    base: &Path,
    id: usize,
    name: Option<String>,
    shading: Shading,
) -> Result<Material> {
    let resolve = |source: Source| -> Result<MaterialChannel> {
        Ok(match source {
            Source::Color(c) => MaterialChannel::Color(c),
            Source::Texture(texture) => MaterialChannel::Map(TextureRef {
                texture,
                path: base.join(doc.texture_uri(texture)?),
            }),
        })
    };

    Ok(Material {
        id,
        name,
        diffuse: resolve(shading.diffuse)?,
        specular: resolve(shading.specular)?,
        ambient: shading.ambient,
        shininess: shading.shininess,
    })
}
