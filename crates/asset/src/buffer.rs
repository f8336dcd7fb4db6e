//! Immutable binary blobs referenced by buffer id.
//!
//! Reads take an absolute byte offset; there is no cursor, so any number of
//! decode calls may read the same buffer at once.

use crate::error::{Result, SceneError};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BinaryBuffer {
    id: usize,
    bytes: Box<[u8]>,
}

impl BinaryBuffer {
    pub fn new(id: usize, bytes: impl Into<Box<[u8]>>) -> Self {
        Self {
            id,
            bytes: bytes.into(),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Borrow `N` bytes starting at `offset`.
    fn array_at<const N: usize>(&self, offset: usize) -> Result<[u8; N]> {
        offset
            .checked_add(N)
            .and_then(|end| self.bytes.get(offset..end))
            .and_then(|slice| <[u8; N]>::try_from(slice).ok())
            .ok_or_else(|| {
                SceneError::format(format!(
                    "Read of {} bytes at offset {} is out of bounds for buffer {} (len={})",
                    N,
                    offset,
                    self.id,
                    self.bytes.len()
                ))
            })
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8> {
        self.array_at::<1>(offset).map(|[b]| b)
    }

    /// Little-endian `u16`.
    pub fn read_u16(&self, offset: usize) -> Result<u16> {
        self.array_at(offset).map(u16::from_le_bytes)
    }

    /// Little-endian `f32`.
    pub fn read_f32(&self, offset: usize) -> Result<f32> {
        self.array_at(offset).map(f32::from_le_bytes)
    }

    /// `N` consecutive little-endian floats starting at `offset`.
    pub fn read_f32s<const N: usize>(&self, offset: usize) -> Result<[f32; N]> {
        let mut out = [0.0f32; N];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.read_f32(offset.saturating_add(i * 4))?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floats(values: &[f32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn reads_are_position_independent() {
        let buf = BinaryBuffer::new(0, floats(&[1.0, 2.0, 3.0, 4.0]));
        assert_eq!(buf.read_f32s::<2>(8).unwrap(), [3.0, 4.0]);
        // Earlier offsets stay readable after a later read.
        assert_eq!(buf.read_f32(0).unwrap(), 1.0);
    }

    #[test]
    fn little_endian_u16() {
        let buf = BinaryBuffer::new(3, vec![0x34, 0x12, 0xff]);
        assert_eq!(buf.read_u16(0).unwrap(), 0x1234);
        assert_eq!(buf.read_u8(2).unwrap(), 0xff);
    }

    #[test]
    fn out_of_bounds_is_format_error() {
        let buf = BinaryBuffer::new(7, vec![0u8; 10]);
        let err = buf.read_f32s::<3>(0).unwrap_err();
        assert!(err.is_format());
        assert!(err.to_string().contains("buffer 7"));
        assert!(buf.read_u16(usize::MAX).is_err());
    }
}
