use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::format::types::{PixelFormat, PlaneLayout};

/// An owned raw pixel buffer together with the geometry it was produced for.
///
/// The length of `data` always equals `format.size(width, height)`; both
/// constructors enforce it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBuffer {
    data: Vec<u8>,
    width: usize,
    height: usize,
    format: PixelFormat,
}

impl RawBuffer {
    /// Allocates a zeroed buffer of exactly `format.size(width, height)` bytes.
    pub fn new(width: usize, height: usize, format: PixelFormat) -> Self {
        Self {
            data: vec![0u8; format.size(width, height)],
            width,
            height,
            format,
        }
    }

    /// Wraps existing bytes, rejecting anything that is not exactly sized.
    pub fn from_parts(data: Vec<u8>, width: usize, height: usize, format: PixelFormat) -> Result<Self> {
        let expected = format.size(width, height);
        if data.len() != expected {
            return Err(PipelineError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { data, width, height, format })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn planes(&self) -> Vec<PlaneLayout> {
        self.format.planes(self.width, self.height)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Re-checks the size invariant. Transforms call this before reading.
    pub fn check_size(&self) -> Result<()> {
        let expected = self.format.size(self.width, self.height);
        if self.data.len() != expected {
            return Err(PipelineError::BufferSizeMismatch {
                expected,
                actual: self.data.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_allocates_exact_size() {
        for format in PixelFormat::ALL {
            let buffer = RawBuffer::new(7, 3, format);
            assert_eq!(buffer.len(), format.size(7, 3));
            assert!(buffer.check_size().is_ok());
        }
    }

    #[test]
    fn test_from_parts_rejects_wrong_length() {
        let result = RawBuffer::from_parts(vec![0u8; 10], 2, 2, PixelFormat::Bgr24);
        assert!(matches!(
            result,
            Err(PipelineError::BufferSizeMismatch { expected: 12, actual: 10 })
        ));

        let result = RawBuffer::from_parts(vec![0u8; 6], 2, 2, PixelFormat::Nv21);
        assert!(result.is_ok());
    }
}
