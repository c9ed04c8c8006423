//! Decoder backed by the `image` crate.
//!
//! Handles every container the crate was built with (PNG, JPEG, BMP, WebP)
//! and can decode at a reduced resolution to bound memory use on large photos.

use std::path::Path;

use image::imageops::FilterType;
use image::{GenericImageView, ImageReader};
use tracing::debug;

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::decode::reader::ImageDecoder;
use crate::image_pipeline::decode::types::DecodedImage;

/// Decoder that reads files with the `image` crate.
///
/// A `sample_size` of `n` keeps one pixel out of every `n` in each direction,
/// so 2 produces a quarter of the pixels. Values below 1 are treated as 1.
pub struct ImageCrateDecoder {
    sample_size: u32,
}

impl ImageCrateDecoder {
    pub fn new(sample_size: u32) -> Self {
        Self {
            sample_size: sample_size.max(1),
        }
    }

    pub fn sample_size(&self) -> u32 {
        self.sample_size
    }
}

impl Default for ImageCrateDecoder {
    fn default() -> Self {
        Self::new(1)
    }
}

impl ImageDecoder for ImageCrateDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedImage> {
        debug!("Decoding image {}", path.display());

        let decode_error = |e: &dyn std::fmt::Display| {
            PipelineError::DecodeError(format!("{}: {}", path.display(), e))
        };
        // Sniff the content rather than trusting the extension.
        let mut decoded = ImageReader::open(path)
            .map_err(|e| decode_error(&e))?
            .with_guessed_format()
            .map_err(|e| decode_error(&e))?
            .decode()
            .map_err(|e| decode_error(&e))?;

        if self.sample_size > 1 {
            let width = (decoded.width() / self.sample_size).max(1);
            let height = (decoded.height() / self.sample_size).max(1);
            debug!(
                "Sampling {}x{} down to {}x{}",
                decoded.width(),
                decoded.height(),
                width,
                height
            );
            decoded = decoded.resize_exact(width, height, FilterType::Nearest);
        }

        let rgba = decoded.to_rgba8();
        let (width, height) = (rgba.width() as usize, rgba.height() as usize);
        DecodedImage::from_rgba(width, height, rgba.into_raw())
    }
}
