//! Raw pixel format module
//!
//! This module describes the supported raw buffer layouts and converts decoded
//! RGBA images into them.

pub mod types;
mod buffer;
mod converter;

pub use types::{PixelFormat, PlaneLayout};
pub use buffer::RawBuffer;
pub use converter::{convert, rgb_to_yuv};
