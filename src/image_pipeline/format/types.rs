//! Pixel format catalog

use std::fmt;

/// One plane of a raw buffer.
///
/// Dimensions are in samples of the plane itself, so the chroma plane of a
/// 4:2:0 format is half the image size (rounded up) in each direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaneLayout {
    /// Byte offset of the plane from the start of the buffer
    pub offset: usize,
    /// Plane width in samples
    pub width: usize,
    /// Plane height in samples
    pub height: usize,
    /// Bytes per sample (e.g. 2 for interleaved VU, 3 for BGR)
    pub bytes_per_sample: usize,
    /// Image pixels per plane sample along each axis (1 for luma, 2 for 4:2:0 chroma)
    pub subsampling: usize,
}

impl PlaneLayout {
    pub fn row_len(&self) -> usize {
        self.width * self.bytes_per_sample
    }

    pub fn len(&self) -> usize {
        self.row_len() * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn end(&self) -> usize {
        self.offset + self.len()
    }
}

/// Supported raw encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// YUV 4:2:0 semi-planar: Y plane followed by interleaved V/U samples
    Nv21,
    /// YUV 4:2:0 planar: Y plane, then U plane, then V plane
    I420,
    /// Packed 24-bit color, B, G, R per pixel
    Bgr24,
}

impl PixelFormat {
    /// Catalog order. Processing visits formats in this order.
    pub const ALL: [PixelFormat; 3] = [PixelFormat::Nv21, PixelFormat::I420, PixelFormat::Bgr24];

    /// Lower-case name, used as the output file extension.
    pub fn name(&self) -> &'static str {
        match self {
            PixelFormat::Nv21 => "nv21",
            PixelFormat::I420 => "i420",
            PixelFormat::Bgr24 => "bgr24",
        }
    }

    pub fn extension(&self) -> &'static str {
        self.name()
    }

    /// Whether chroma is subsampled 2x2, which forces even crop origins.
    pub fn is_subsampled(&self) -> bool {
        matches!(self, PixelFormat::Nv21 | PixelFormat::I420)
    }

    /// Plane table for an image of `width` x `height` pixels.
    pub fn planes(&self, width: usize, height: usize) -> Vec<PlaneLayout> {
        let luma_len = width * height;
        let chroma_width = width.div_ceil(2);
        let chroma_height = height.div_ceil(2);

        match self {
            PixelFormat::Nv21 => vec![
                PlaneLayout { offset: 0, width, height, bytes_per_sample: 1, subsampling: 1 },
                PlaneLayout {
                    offset: luma_len,
                    width: chroma_width,
                    height: chroma_height,
                    bytes_per_sample: 2,
                    subsampling: 2,
                },
            ],
            PixelFormat::I420 => {
                let chroma_len = chroma_width * chroma_height;
                vec![
                    PlaneLayout { offset: 0, width, height, bytes_per_sample: 1, subsampling: 1 },
                    PlaneLayout {
                        offset: luma_len,
                        width: chroma_width,
                        height: chroma_height,
                        bytes_per_sample: 1,
                        subsampling: 2,
                    },
                    PlaneLayout {
                        offset: luma_len + chroma_len,
                        width: chroma_width,
                        height: chroma_height,
                        bytes_per_sample: 1,
                        subsampling: 2,
                    },
                ]
            }
            PixelFormat::Bgr24 => vec![PlaneLayout { offset: 0, width, height, bytes_per_sample: 3, subsampling: 1 }],
        }
    }

    /// Exact buffer size in bytes for an image of `width` x `height` pixels.
    pub fn size(&self, width: usize, height: usize) -> usize {
        match self {
            PixelFormat::Nv21 | PixelFormat::I420 => {
                width * height + 2 * width.div_ceil(2) * height.div_ceil(2)
            }
            PixelFormat::Bgr24 => width * height * 3,
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name().to_uppercase())
    }
}
