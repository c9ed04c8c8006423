use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::format::{PixelFormat, PlaneLayout, RawBuffer};

/// Crop rectangle in image pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

/// Middle half of a `width` x `height` image.
///
/// For subsampled formats the origin is rounded down to even coordinates so
/// the chroma grid stays aligned. The extent never changes.
pub fn crop_rect(width: usize, height: usize, format: PixelFormat) -> Result<CropRect> {
    let mut rect = CropRect {
        x: width / 4,
        y: height / 4,
        width: 3 * width / 4 - width / 4,
        height: 3 * height / 4 - height / 4,
    };
    if rect.width == 0 || rect.height == 0 {
        return Err(PipelineError::TransformError(format!(
            "crop on {}: {}x{} source leaves an empty region",
            format, width, height
        )));
    }
    if format.is_subsampled() {
        rect.x &= !1;
        rect.y &= !1;
    }
    Ok(rect)
}

pub fn center_crop(source: &RawBuffer) -> Result<RawBuffer> {
    source.check_size()?;

    let format = source.format();
    let rect = crop_rect(source.width(), source.height(), format)?;
    let mut dest = RawBuffer::new(rect.width, rect.height, format);
    let dest_planes = dest.planes();

    for (src_plane, dst_plane) in source.planes().iter().zip(&dest_planes) {
        let x = rect.x / src_plane.subsampling;
        let y = rect.y / src_plane.subsampling;
        if x + dst_plane.width > src_plane.width || y + dst_plane.height > src_plane.height {
            return Err(PipelineError::TransformError(format!(
                "crop on {}: region {}x{} at ({}, {}) exceeds plane {}x{}",
                format, dst_plane.width, dst_plane.height, x, y, src_plane.width, src_plane.height
            )));
        }
        let src = &source.data()[src_plane.offset..src_plane.end()];
        let dst = &mut dest.data_mut()[dst_plane.offset..dst_plane.end()];
        crop_plane(src, src_plane, dst, dst_plane, x, y);
    }
    Ok(dest)
}

fn crop_plane(
    src: &[u8],
    src_plane: &PlaneLayout,
    dst: &mut [u8],
    dst_plane: &PlaneLayout,
    x: usize,
    y: usize,
) {
    let bps = src_plane.bytes_per_sample;
    let row_len = dst_plane.row_len();
    if row_len == 0 {
        return;
    }
    for (row, dst_row) in dst.chunks_exact_mut(row_len).enumerate() {
        let start = (y + row) * src_plane.row_len() + x * bps;
        dst_row.copy_from_slice(&src[start..start + row_len]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_rect_quarter_bounds() {
        let rect = crop_rect(100, 100, PixelFormat::Bgr24).unwrap();
        assert_eq!(rect, CropRect { x: 25, y: 25, width: 50, height: 50 });
    }

    #[test]
    fn test_crop_rect_even_origin_for_subsampled() {
        let rect = crop_rect(100, 100, PixelFormat::Nv21).unwrap();
        assert_eq!(rect, CropRect { x: 24, y: 24, width: 50, height: 50 });

        let rect = crop_rect(64, 64, PixelFormat::I420).unwrap();
        assert_eq!(rect, CropRect { x: 16, y: 16, width: 32, height: 32 });
    }

    #[test]
    fn test_crop_rect_empty_region() {
        assert!(crop_rect(1, 100, PixelFormat::Bgr24).is_err());
        assert!(crop_rect(100, 1, PixelFormat::Nv21).is_err());
        assert!(crop_rect(4, 4, PixelFormat::I420).is_ok());
    }
}
