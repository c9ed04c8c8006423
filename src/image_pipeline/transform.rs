//! Geometric transforms on raw buffers
//!
//! Every transform works plane by plane over the format's plane table, so the
//! same kernels serve packed and planar layouts alike.

mod types;
mod mirror;
mod rotate;
mod crop;


pub use types::Transform;
pub use mirror::mirror_horizontal;
pub use rotate::rotate90;
pub use crop::{center_crop, crop_rect, CropRect};
