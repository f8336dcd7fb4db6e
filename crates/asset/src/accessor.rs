//! Accessor resolution: turns an accessor id into the concrete buffer
//! location and layout needed to read its elements.

use crate::{
    buffer::BinaryBuffer,
    document::Document,
    error::{Result, SceneError},
};

/// Numeric component type codes of the interchange format.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ComponentType {
    Byte,
    UnsignedByte,
    Short,
    UnsignedShort,
    UnsignedInt,
    Float,
}

impl ComponentType {
    pub const fn code(self) -> u32 {
        match self {
            Self::Byte => 5120,
            Self::UnsignedByte => 5121,
            Self::Short => 5122,
            Self::UnsignedShort => 5123,
            Self::UnsignedInt => 5125,
            Self::Float => 5126,
        }
    }

    /// Size of one component in bytes.
    pub const fn size(self) -> usize {
        match self {
            Self::Byte | Self::UnsignedByte => 1,
            Self::Short | Self::UnsignedShort => 2,
            Self::UnsignedInt | Self::Float => 4,
        }
    }
}

impl TryFrom<u32> for ComponentType {
    type Error = SceneError;

    fn try_from(code: u32) -> Result<Self> {
        Ok(match code {
            5120 => Self::Byte,
            5121 => Self::UnsignedByte,
            5122 => Self::Short,
            5123 => Self::UnsignedShort,
            5125 => Self::UnsignedInt,
            5126 => Self::Float,
            other => {
                return Err(SceneError::format(format!(
                    "Unknown component type {}",
                    other
                )));
            }
        })
    }
}

/// What an accessor is being read as. Determines the tight-packed element size
/// and which component types are acceptable.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AttributeKind {
    Position,
    Normal,
    TexCoord,
    Indices,
}

impl AttributeKind {
    pub const fn components(self) -> usize {
        match self {
            Self::Position | Self::Normal => 3,
            Self::TexCoord => 2,
            Self::Indices => 1,
        }
    }

    pub const fn semantic(self) -> &'static str {
        match self {
            Self::Position => "POSITION",
            Self::Normal => "NORMAL",
            Self::TexCoord => "TEXCOORD_0",
            Self::Indices => "indices",
        }
    }

    fn accepts(self, ty: ComponentType) -> bool {
        match self {
            Self::Position | Self::Normal | Self::TexCoord => ty == ComponentType::Float,
            Self::Indices => matches!(ty, ComponentType::UnsignedByte | ComponentType::UnsignedShort),
        }
    }
}

/// Concrete read layout of one accessor.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ResolvedAccessor {
    pub buffer: usize,
    pub source_offset: usize,
    pub stride: usize,
    pub component_type: ComponentType,
    pub count: usize,
}

impl ResolvedAccessor {
    /// Absolute byte offset of element `index`. Elements are never assumed contiguous.
    #[inline]
    pub fn element_offset(&self, index: usize) -> usize {
        self.stride.saturating_mul(index).saturating_add(self.source_offset)
    }

    pub fn read_vec3(&self, buffer: &BinaryBuffer) -> Result<Vec<[f32; 3]>> {
        (0..self.count)
            .map(|i| buffer.read_f32s::<3>(self.element_offset(i)))
            .collect()
    }

    pub fn read_vec2(&self, buffer: &BinaryBuffer) -> Result<Vec<[f32; 2]>> {
        (0..self.count)
            .map(|i| buffer.read_f32s::<2>(self.element_offset(i)))
            .collect()
    }

    pub fn read_indices(&self, buffer: &BinaryBuffer) -> Result<Vec<u16>> {
        (0..self.count)
            .map(|i| {
                let offset = self.element_offset(i);
                match self.component_type {
                    ComponentType::UnsignedByte => buffer.read_u8(offset).map(u16::from),
                    _ => buffer.read_u16(offset),
                }
            })
            .collect()
    }
}

/// Resolve accessor `accessor_id` for reading as `kind`.
///
/// Vertex attributes honour `bufferView.byteStride` verbatim and fall back to
/// tight packing; index accessors are always tight-packed.
pub fn resolve(doc: &Document, accessor_id: usize, kind: AttributeKind) -> Result<ResolvedAccessor> {
    let accessor = doc.accessor(accessor_id)?;
    let component_type = ComponentType::try_from(accessor.component_type)?;
    if !kind.accepts(component_type) {
        return Err(SceneError::format(format!(
            "Unexpected component type {} for {} accessor {}",
            accessor.component_type,
            kind.semantic(),
            accessor_id
        )));
    }

    let view_id = accessor.buffer_view.ok_or_else(|| {
        SceneError::format(format!("Accessor {} has no bufferView", accessor_id))
    })?;
    let view = doc.buffer_view(view_id)?;

    let packed = component_type.size() * kind.components();
    let stride = match kind {
        AttributeKind::Indices => packed,
        _ => match view.byte_stride {
            // every element would alias the first one
            Some(0) => {
                return Err(SceneError::format(format!(
                    "BufferView {} has byteStride 0 (accessor {})",
                    view_id, accessor_id
                )));
            }
            Some(stride) => stride,
            None => packed,
        },
    };

    let source_offset = view
        .byte_offset
        .unwrap_or(0)
        .checked_add(accessor.byte_offset.unwrap_or(0))
        .ok_or_else(|| {
            SceneError::format(format!("Accessor {} byteOffset overflows", accessor_id))
        })?;

    Ok(ResolvedAccessor {
        buffer: view.buffer,
        source_offset,
        stride,
        component_type,
        count: accessor.count,
    })
}
