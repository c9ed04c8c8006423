use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::format::{PlaneLayout, RawBuffer};

/// Mirrors a buffer left to right.
///
/// Chroma planes are mirrored at their own resolution, so an interleaved VU
/// pair moves as one sample.
pub fn mirror_horizontal(source: &RawBuffer) -> Result<RawBuffer> {
    source.check_size()?;

    let mut dest = RawBuffer::new(source.width(), source.height(), source.format());
    for plane in source.planes() {
        if plane.is_empty() {
            continue;
        }
        let src = &source.data()[plane.offset..plane.end()];
        let dst = &mut dest.data_mut()[plane.offset..plane.end()];
        mirror_plane(src, dst, &plane);
    }
    Ok(dest)
}

fn mirror_plane(src: &[u8], dst: &mut [u8], plane: &PlaneLayout) {
    let bps = plane.bytes_per_sample;
    let rows = src.chunks_exact(plane.row_len()).zip(dst.chunks_exact_mut(plane.row_len()));
    for (src_row, dst_row) in rows {
        for (dst_sample, src_sample) in dst_row.chunks_exact_mut(bps).zip(src_row.chunks_exact(bps).rev()) {
            dst_sample.copy_from_slice(src_sample);
        }
    }
}
