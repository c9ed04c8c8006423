use std::fmt;

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::format::RawBuffer;
use crate::image_pipeline::transform::{center_crop, mirror_horizontal, rotate90};

/// Derived variants produced for every converted buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transform {
    /// Save the converted buffer as is
    Identity,
    /// Reverse every row left to right
    MirrorHorizontal,
    /// Rotate 90 degrees clockwise
    Rotate90,
    /// Keep the middle half of each dimension
    CenterCrop,
}

impl Transform {
    /// Catalog order. Processing persists variants in this order.
    pub const ALL: [Transform; 4] = [
        Transform::Identity,
        Transform::MirrorHorizontal,
        Transform::Rotate90,
        Transform::CenterCrop,
    ];

    /// File name suffix, as in `{base}_{suffix}.{ext}`.
    pub fn suffix(&self) -> &'static str {
        match self {
            Transform::Identity => "origin",
            Transform::MirrorHorizontal => "mirror",
            Transform::Rotate90 => "rotate90",
            Transform::CenterCrop => "crop",
        }
    }

    /// Dimensions of the buffer this transform produces from a `width` x `height` source.
    pub fn output_dimensions(&self, width: usize, height: usize) -> (usize, usize) {
        match self {
            Transform::Identity | Transform::MirrorHorizontal => (width, height),
            Transform::Rotate90 => (height, width),
            Transform::CenterCrop => (3 * width / 4 - width / 4, 3 * height / 4 - height / 4),
        }
    }

    pub fn apply(&self, source: &RawBuffer) -> Result<RawBuffer> {
        source.check_size().map_err(|e| {
            PipelineError::TransformError(format!("{} on {}: {}", self, source.format(), e))
        })?;

        match self {
            Transform::Identity => Ok(source.clone()),
            Transform::MirrorHorizontal => mirror_horizontal(source),
            Transform::Rotate90 => rotate90(source),
            Transform::CenterCrop => center_crop(source),
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}
