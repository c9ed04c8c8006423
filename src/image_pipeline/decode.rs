//! Image decoding module
//!
//! Turns a compressed file on disk into an RGBA bitmap the converters can sample.

mod reader;
mod image_crate_decoder;
pub mod types;

pub use reader::ImageDecoder;
pub use image_crate_decoder::ImageCrateDecoder;
pub use types::DecodedImage;
