//! Output writing module
//!
//! Persists raw buffers as plain files next to the source image.

mod writer;
mod fs_writer;

pub use writer::OutputWriter;
pub use fs_writer::FsOutputWriter;
