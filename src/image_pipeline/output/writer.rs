use std::path::{Path, PathBuf};

use crate::image_pipeline::common::error::Result;

pub trait OutputWriter: Send + Sync {
    fn create_dir_all(&self, dir: &Path) -> Result<()>;
    fn write(&self, bytes: &[u8], dir: &Path, filename: &str) -> Result<PathBuf>;
}
