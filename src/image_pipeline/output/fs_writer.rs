use std::path::{Path, PathBuf};

use tracing::debug;

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::output::writer::OutputWriter;

pub struct FsOutputWriter;

impl OutputWriter for FsOutputWriter {
    fn create_dir_all(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)
            .map_err(|e| PipelineError::DirectoryError(format!("{}: {}", dir.display(), e)))
    }

    fn write(&self, bytes: &[u8], dir: &Path, filename: &str) -> Result<PathBuf> {
        let path = dir.join(filename);
        std::fs::write(&path, bytes)
            .map_err(|e| PipelineError::OutputWriteError(format!("{}: {}", path.display(), e)))?;
        debug!("Saved: {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}
