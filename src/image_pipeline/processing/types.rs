//! Processing configuration and report types

use std::path::{Path, PathBuf};

use crate::image_pipeline::format::PixelFormat;
use crate::image_pipeline::transform::Transform;

/// Configuration for a processing run
#[derive(Debug, Clone)]
pub struct ProcessingConfig {
    /// Formats to produce, in order
    pub formats: Vec<PixelFormat>,
    /// Variants to derive from each converted buffer, in order
    pub transforms: Vec<Transform>,
    /// Where outputs go. `None` writes next to the source image
    pub output_dir: Option<PathBuf>,
    /// Decode at 1/n resolution in each direction (1 keeps full size)
    pub sample_size: u32,
    /// Whether to reject images larger than `max_dimension`
    pub validate_dimensions: bool,
    /// Upper bound for either image dimension. Unset by default, so only
    /// decode and output directory problems can fail a run
    pub max_dimension: Option<usize>,
    /// Number of images processed concurrently by a `WorkerPool`
    pub workers: usize,
    /// Submissions that may wait for a free worker before `submit` blocks
    pub queue_capacity: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            formats: PixelFormat::ALL.to_vec(),
            transforms: Transform::ALL.to_vec(),
            output_dir: None,
            sample_size: 2,
            validate_dimensions: true,
            max_dimension: None,
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
            queue_capacity: 64,
        }
    }
}

impl ProcessingConfig {
    pub fn builder() -> ProcessingConfigBuilder {
        ProcessingConfigBuilder::default()
    }
}

/// Builder for ProcessingConfig
#[derive(Default)]
pub struct ProcessingConfigBuilder {
    formats: Option<Vec<PixelFormat>>,
    transforms: Option<Vec<Transform>>,
    output_dir: Option<Option<PathBuf>>,
    sample_size: Option<u32>,
    validate_dimensions: Option<bool>,
    max_dimension: Option<Option<usize>>,
    workers: Option<usize>,
    queue_capacity: Option<usize>,
}

impl ProcessingConfigBuilder {
    pub fn formats(mut self, formats: impl Into<Vec<PixelFormat>>) -> Self {
        self.formats = Some(formats.into());
        self
    }

    pub fn transforms(mut self, transforms: impl Into<Vec<Transform>>) -> Self {
        self.transforms = Some(transforms.into());
        self
    }

    pub fn output_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.output_dir = Some(dir);
        self
    }

    pub fn sample_size(mut self, sample_size: u32) -> Self {
        self.sample_size = Some(sample_size);
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn max_dimension(mut self, max: Option<usize>) -> Self {
        self.max_dimension = Some(max);
        self
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = Some(capacity);
        self
    }

    pub fn build(self) -> ProcessingConfig {
        let default = ProcessingConfig::default();
        ProcessingConfig {
            formats: self.formats.unwrap_or(default.formats),
            transforms: self.transforms.unwrap_or(default.transforms),
            output_dir: self.output_dir.unwrap_or(default.output_dir),
            sample_size: self.sample_size.unwrap_or(default.sample_size),
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
            max_dimension: self.max_dimension.unwrap_or(default.max_dimension),
            workers: self.workers.unwrap_or(default.workers),
            queue_capacity: self.queue_capacity.unwrap_or(default.queue_capacity),
        }
    }
}

/// An output that was attempted but not written
#[derive(Debug, Clone)]
pub struct SkippedOutput {
    pub format: PixelFormat,
    /// `None` when the conversion itself failed and no transform ran
    pub transform: Option<Transform>,
    pub reason: String,
}

/// Summary of a completed run
#[derive(Debug, Clone)]
pub struct ProcessingReport {
    pub source: PathBuf,
    pub output_dir: PathBuf,
    pub written: Vec<PathBuf>,
    pub skipped: Vec<SkippedOutput>,
}

impl ProcessingReport {
    pub fn new(source: &Path, output_dir: &Path) -> Self {
        Self {
            source: source.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            written: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn skip(&mut self, format: PixelFormat, transform: Option<Transform>, reason: impl ToString) {
        self.skipped.push(SkippedOutput {
            format,
            transform,
            reason: reason.to_string(),
        });
    }
}
