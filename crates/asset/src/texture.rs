//! Texture loading and data structures.
//! Decodes image resources referenced by material maps into RGBA8.

use std::path::Path;

use anyhow::Context;

use crate::resource::ResourceProvider;

/// Texture data in CPU-friendly format before GPU upload.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureData {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
}

/// Supported texture formats.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TextureFormat {
    Rgba8,
}

impl TextureData {
    /// Create a new texture with given dimensions and RGBA8 format.
    pub fn new_rgba8(width: u32, height: u32, data: Vec<u8>) -> anyhow::Result<Self> {
        let expected = (width as usize) * (height as usize) * 4;
        anyhow::ensure!(
            data.len() == expected,
            "RGBA8 data for {}x{} must be {} bytes, got {}",
            width,
            height,
            expected,
            data.len()
        );
        Ok(Self {
            data,
            width,
            height,
            format: TextureFormat::Rgba8,
        })
    }

    /// Decode an encoded image (PNG, JPEG) from memory.
    pub fn decode(bytes: &[u8]) -> anyhow::Result<Self> {
        let img = image::load_from_memory(bytes).context("Failed to decode image")?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::new_rgba8(width, height, rgba.into_raw())
    }

    /// Load an image resource through `provider`.
    pub fn load<P>(provider: &P, path: &Path) -> anyhow::Result<Self>
    where
        P: ResourceProvider + ?Sized,
    {
        log::info!("Loading texture from {:?}", path);
        let bytes = provider
            .binary_resource(path)
            .with_context(|| format!("Failed to read texture resource {:?}", path))?;
        let tex = Self::decode(&bytes).with_context(|| format!("Texture {:?}", path))?;
        log::info!(
            "Loaded texture {}x{} with {} bytes",
            tex.width,
            tex.height,
            tex.data.len()
        );
        Ok(tex)
    }

    /// 1x1 opaque white; bound wherever a material channel has no map.
    pub fn white_pixel() -> Self {
        Self {
            data: vec![255, 255, 255, 255],
            width: 1,
            height: 1,
            format: TextureFormat::Rgba8,
        }
    }

    /// Get the number of bytes per pixel for the format.
    pub fn bytes_per_pixel(&self) -> u32 {
        match self.format {
            TextureFormat::Rgba8 => 4,
        }
    }

    /// Check if the texture data is valid.
    pub fn is_valid(&self) -> bool {
        let expected_size = (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(self.bytes_per_pixel() as usize);
        self.data.len() == expected_size && self.width > 0 && self.height > 0
    }
}
