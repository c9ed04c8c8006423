use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::format::{PlaneLayout, RawBuffer};

/// Rotates a buffer 90 degrees clockwise into a `height` x `width` buffer.
///
/// Each plane is rotated on its own sample grid, which makes the operation a
/// pure permutation of samples.
pub fn rotate90(source: &RawBuffer) -> Result<RawBuffer> {
    source.check_size()?;

    let format = source.format();
    let mut dest = RawBuffer::new(source.height(), source.width(), format);
    let dest_planes = dest.planes();

    for (src_plane, dst_plane) in source.planes().iter().zip(&dest_planes) {
        if dst_plane.width != src_plane.height || dst_plane.height != src_plane.width {
            return Err(PipelineError::TransformError(format!(
                "rotate90 on {}: plane {}x{} does not map onto {}x{}",
                format, src_plane.width, src_plane.height, dst_plane.width, dst_plane.height
            )));
        }
        let src = &source.data()[src_plane.offset..src_plane.end()];
        let dst = &mut dest.data_mut()[dst_plane.offset..dst_plane.end()];
        rotate_plane(src, dst, src_plane);
    }
    Ok(dest)
}

// dst(x, y) = src(y, h - 1 - x), where the destination grid is h wide.
fn rotate_plane(src: &[u8], dst: &mut [u8], plane: &PlaneLayout) {
    let (width, height, bps) = (plane.width, plane.height, plane.bytes_per_sample);
    for dy in 0..width {
        for dx in 0..height {
            let from = ((height - 1 - dx) * width + dy) * bps;
            let to = (dy * height + dx) * bps;
            dst[to..to + bps].copy_from_slice(&src[from..from + bps]);
        }
    }
}
