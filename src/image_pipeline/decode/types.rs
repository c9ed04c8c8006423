//! Decoded image types

use crate::image_pipeline::common::error::{PipelineError, Result};

/// A decoded bitmap, RGBA with 8 bits per channel, row-major.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl DecodedImage {
    pub fn from_rgba(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        let expected = width * height * 4;
        if data.len() != expected {
            return Err(PipelineError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { width, height, data })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// RGBA sample at `(x, y)`. Panics when out of bounds.
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let at = (y * self.width + x) * 4;
        [self.data[at], self.data[at + 1], self.data[at + 2], self.data[at + 3]]
    }
}
