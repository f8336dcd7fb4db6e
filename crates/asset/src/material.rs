//! Normalized material record consumed by the renderer.

use std::path::PathBuf;

/// Shininess used whenever the source does not specify one.
pub const DEFAULT_SHININESS: f32 = 16.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build from an RGB or RGBA slice; alpha defaults to 1.0.
    /// Returns `None` for fewer than three components.
    pub fn from_components(c: &[f32]) -> Option<Self> {
        match c {
            [r, g, b] => Some(Self::rgba(*r, *g, *b, 1.0)),
            [r, g, b, a, ..] => Some(Self::rgba(*r, *g, *b, *a)),
            _ => None,
        }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// A texture the renderer should bind, identified by document texture id and
/// the resource path of its image.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TextureRef {
    pub texture: usize,
    pub path: PathBuf,
}

/// Exactly one of map or constant color per channel.
#[derive(Clone, Debug, PartialEq)]
pub enum MaterialChannel {
    Map(TextureRef),
    Color(Color),
}

impl MaterialChannel {
    pub fn color(&self) -> Option<Color> {
        match self {
            Self::Color(c) => Some(*c),
            Self::Map(_) => None,
        }
    }

    pub fn map(&self) -> Option<&TextureRef> {
        match self {
            Self::Map(t) => Some(t),
            Self::Color(_) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    /// Index of the source entry in the document's `materials` array.
    pub id: usize,
    pub name: Option<String>,
    pub diffuse: MaterialChannel,
    pub specular: MaterialChannel,
    pub ambient: Color,
    pub shininess: f32,
}

impl Material {
    /// Plain white material used when a primitive has no (supported) material.
    pub fn engine_default(id: usize) -> Self {
        Self {
            id,
            name: None,
            diffuse: MaterialChannel::Color(Color::WHITE),
            specular: MaterialChannel::Color(Color::WHITE),
            ambient: Color::WHITE,
            shininess: DEFAULT_SHININESS,
        }
    }

    /// Texture maps referenced by this material, diffuse first.
    pub fn maps(&self) -> impl Iterator<Item = &TextureRef> {
        self.diffuse.map().into_iter().chain(self.specular.map())
    }
}
