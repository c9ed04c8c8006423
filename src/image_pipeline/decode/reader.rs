use std::path::Path;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::decode::types::DecodedImage;

pub trait ImageDecoder: Send + Sync {
    fn decode(&self, path: &Path) -> Result<DecodedImage>;
}
