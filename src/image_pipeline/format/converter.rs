//! RGBA to raw buffer conversion.

use tracing::{debug, instrument};

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::decode::DecodedImage;
use crate::image_pipeline::format::buffer::RawBuffer;
use crate::image_pipeline::format::types::{PixelFormat, PlaneLayout};

/// BT.601 limited-range conversion of one RGB triple.
pub fn rgb_to_yuv(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let (r, g, b) = (r as i32, g as i32, b as i32);
    let y = ((66 * r + 129 * g + 25 * b + 128) >> 8) + 16;
    let u = ((-38 * r - 74 * g + 112 * b + 128) >> 8) + 128;
    let v = ((112 * r - 94 * g - 18 * b + 128) >> 8) + 128;
    (clamp_u8(y), clamp_u8(u), clamp_u8(v))
}

fn clamp_u8(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

/// Converts a decoded image into a freshly allocated buffer of `format`.
#[instrument(skip_all, fields(format = %format, width = image.width(), height = image.height()))]
pub fn convert(image: &DecodedImage, format: PixelFormat) -> Result<RawBuffer> {
    let width = image.width();
    let height = image.height();
    if width == 0 || height == 0 {
        return Err(PipelineError::ConversionError(format!(
            "{}: cannot convert empty image {}x{}",
            format, width, height
        )));
    }

    let mut buffer = RawBuffer::new(width, height, format);
    let planes = buffer.planes();
    if let Some(plane) = planes.iter().find(|p| p.end() > buffer.len()) {
        return Err(PipelineError::ConversionError(format!(
            "{}: plane ends at byte {} but buffer holds {}",
            format,
            plane.end(),
            buffer.len()
        )));
    }

    let data = buffer.data_mut();
    match format {
        PixelFormat::Nv21 => {
            write_luma(image, &planes[0], data);
            let vu = planes[1];
            write_chroma(image, &vu, |index, u, v| {
                let at = vu.offset + index * 2;
                data[at] = v;
                data[at + 1] = u;
            });
        }
        PixelFormat::I420 => {
            write_luma(image, &planes[0], data);
            let (u_plane, v_plane) = (planes[1], planes[2]);
            write_chroma(image, &u_plane, |index, u, v| {
                data[u_plane.offset + index] = u;
                data[v_plane.offset + index] = v;
            });
        }
        PixelFormat::Bgr24 => {
            let dst = &mut data[planes[0].offset..planes[0].end()];
            for (index, bgr) in dst.chunks_exact_mut(3).enumerate() {
                let [r, g, b, _] = image.pixel(index % width, index / width);
                bgr.copy_from_slice(&[b, g, r]);
            }
        }
    }

    debug!("Converted {}x{} image to {} ({} bytes)", width, height, format, buffer.len());
    Ok(buffer)
}

fn write_luma(image: &DecodedImage, plane: &PlaneLayout, data: &mut [u8]) {
    let dst = &mut data[plane.offset..plane.end()];
    for (index, luma) in dst.iter_mut().enumerate() {
        let [r, g, b, _] = image.pixel(index % plane.width, index / plane.width);
        *luma = rgb_to_yuv(r, g, b).0;
    }
}

/// Walks the 2x2 blocks of the image, handing the chroma of each block's mean
/// colour to `store` along with the block's index in a `plane`-shaped grid.
/// Blocks on an odd right or bottom edge only average the pixels that exist.
fn write_chroma<F>(image: &DecodedImage, plane: &PlaneLayout, mut store: F)
where
    F: FnMut(usize, u8, u8),
{
    let width = image.width();
    let height = image.height();

    for cy in 0..plane.height {
        for cx in 0..plane.width {
            let (mut r, mut g, mut b, mut count) = (0u32, 0u32, 0u32, 0u32);
            for y in (cy * 2)..(cy * 2 + 2).min(height) {
                for x in (cx * 2)..(cx * 2 + 2).min(width) {
                    let [pr, pg, pb, _] = image.pixel(x, y);
                    r += pr as u32;
                    g += pg as u32;
                    b += pb as u32;
                    count += 1;
                }
            }
            let mean = |sum: u32| ((sum + count / 2) / count) as u8;
            let (_, u, v) = rgb_to_yuv(mean(r), mean(g), mean(b));
            store(cy * plane.width + cx, u, v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: usize, height: usize, rgba: [u8; 4]) -> DecodedImage {
        let data = rgba.iter().copied().cycle().take(width * height * 4).collect();
        DecodedImage::from_rgba(width, height, data).unwrap()
    }

    #[test]
    fn test_rgb_to_yuv_reference_values() {
        assert_eq!(rgb_to_yuv(0, 0, 0), (16, 128, 128));
        assert_eq!(rgb_to_yuv(255, 255, 255), (235, 128, 128));
        let (_, u, v) = rgb_to_yuv(255, 0, 0);
        assert!(v > 200 && u < 128);
    }

    #[test]
    fn test_buffer_length_matches_catalog() {
        let image = solid(5, 3, [10, 20, 30, 255]);
        for format in PixelFormat::ALL {
            let buffer = convert(&image, format).unwrap();
            assert_eq!(buffer.len(), format.size(5, 3));
            assert_eq!((buffer.width(), buffer.height(), buffer.format()), (5, 3, format));
        }
    }

    #[test]
    fn test_bgr24_channel_order() {
        let image = solid(2, 1, [1, 2, 3, 255]);
        let buffer = convert(&image, PixelFormat::Bgr24).unwrap();
        assert_eq!(buffer.data(), &[3, 2, 1, 3, 2, 1]);
    }

    #[test]
    fn test_nv21_interleaves_v_before_u() {
        let image = solid(2, 2, [255, 0, 0, 255]);
        let (y, u, v) = rgb_to_yuv(255, 0, 0);
        let buffer = convert(&image, PixelFormat::Nv21).unwrap();
        assert_eq!(buffer.data(), &[y, y, y, y, v, u]);
    }

    #[test]
    fn test_i420_separate_planes() {
        let image = solid(4, 2, [0, 0, 255, 255]);
        let (y, u, v) = rgb_to_yuv(0, 0, 255);
        let buffer = convert(&image, PixelFormat::I420).unwrap();
        let data = buffer.data();
        assert!(data[..8].iter().all(|&s| s == y));
        assert_eq!(&data[8..10], &[u, u]);
        assert_eq!(&data[10..12], &[v, v]);
    }

    #[test]
    fn test_chroma_averages_block() {
        // Left column black, right column white: the single block is mid grey.
        let data = vec![
            0, 0, 0, 255, 255, 255, 255, 255,
            0, 0, 0, 255, 255, 255, 255, 255,
        ];
        let image = DecodedImage::from_rgba(2, 2, data).unwrap();
        let buffer = convert(&image, PixelFormat::I420).unwrap();
        let (_, u, v) = rgb_to_yuv(128, 128, 128);
        assert_eq!(&buffer.data()[4..], &[u, v]);
    }

    #[test]
    fn test_odd_edge_block_averages_existing_pixels() {
        // 3x1: the second chroma block only covers the last pixel.
        let data = vec![
            0, 0, 0, 255, 0, 0, 0, 255, 200, 30, 90, 255,
        ];
        let image = DecodedImage::from_rgba(3, 1, data).unwrap();
        let buffer = convert(&image, PixelFormat::I420).unwrap();
        assert_eq!(buffer.len(), 7);

        let (_, black_u, black_v) = rgb_to_yuv(0, 0, 0);
        let (_, edge_u, edge_v) = rgb_to_yuv(200, 30, 90);
        let chroma = &buffer.data()[3..];
        assert_eq!(chroma, &[black_u, edge_u, black_v, edge_v]);

        let nv21 = convert(&image, PixelFormat::Nv21).unwrap();
        assert_eq!(&nv21.data()[3..], &[black_v, black_u, edge_v, edge_u]);
    }

    #[test]
    fn test_empty_image_fails() {
        let image = DecodedImage::from_rgba(0, 4, Vec::new()).unwrap();
        for format in PixelFormat::ALL {
            assert!(matches!(
                convert(&image, format),
                Err(PipelineError::ConversionError(_))
            ));
        }
    }
}
