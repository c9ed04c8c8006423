use std::borrow::Cow;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use tracing::{error, info, instrument, warn};

use crate::image_pipeline::{
    common::error::{PipelineError, Result},
    decode::{DecodedImage, ImageCrateDecoder, ImageDecoder},
    format::{self, PixelFormat},
    output::{FsOutputWriter, OutputWriter},
    processing::{ProcessingConfig, ProcessingObserver, ProcessingReport},
    transform::Transform,
};

/// `{base}_{suffix}.{ext}`, e.g. `IMG_0001_rotate90.nv21`.
pub fn output_filename(base_name: &str, transform: Transform, format: PixelFormat) -> String {
    format!("{}_{}.{}", base_name, transform.suffix(), format.extension())
}

pub struct ImageProcessor<D: ImageDecoder, W: OutputWriter> {
    decoder: D,
    writer: W,
    config: ProcessingConfig,
}

impl ImageProcessor<ImageCrateDecoder, FsOutputWriter> {
    pub fn new(config: ProcessingConfig) -> Self {
        Self {
            decoder: ImageCrateDecoder::new(config.sample_size),
            writer: FsOutputWriter,
            config,
        }
    }
}

impl<D: ImageDecoder, W: OutputWriter> ImageProcessor<D, W> {
    pub fn with_custom(decoder: D, writer: W, config: ProcessingConfig) -> Self {
        Self {
            decoder,
            writer,
            config,
        }
    }

    /// Processes one image, reporting progress to `observer`.
    ///
    /// `on_started` fires first, followed by exactly one of `on_completed` or
    /// `on_failed`. Only decode, path and output directory problems fail the
    /// run; a failed conversion, transform or write is logged, recorded in the
    /// report and skipped.
    pub fn process_image<P: AsRef<Path>>(
        &self,
        path: P,
        observer: &dyn ProcessingObserver,
    ) -> Result<ProcessingReport> {
        let path = path.as_ref();
        observer.on_started();

        // The default panic hook still prints to stderr; the payload is logged below.
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.run(path)))
            .unwrap_or_else(|payload| {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                Err(PipelineError::WorkerError(format!("processing panicked: {}", message)))
            });

        match &result {
            Ok(report) => {
                info!(
                    path = %path.display(),
                    written = report.written.len(),
                    skipped = report.skipped.len(),
                    "Processing complete"
                );
                observer.on_completed();
            }
            Err(e) => {
                error!(path = %path.display(), "Processing failed: {}", e);
                observer.on_failed(&e.to_string());
            }
        }
        result
    }

    #[instrument(skip_all, fields(path = %path.display()))]
    fn run(&self, path: &Path) -> Result<ProcessingReport> {
        let base_name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .ok_or_else(|| PipelineError::InvalidPath(path.display().to_string()))?;

        let image = {
            let _span = tracing::info_span!("decode").entered();
            self.decoder.decode(path).map_err(|e| match e {
                PipelineError::DecodeError(_) => e,
                other => PipelineError::DecodeError(format!("{}: {}", path.display(), other)),
            })?
        };
        info!("Processing image: {}x{}", image.width(), image.height());

        {
            let _span = tracing::info_span!("validate_dimensions",
                width = image.width(),
                height = image.height()
            ).entered();
            self.validate_dimensions(image.width(), image.height())?;
        }

        let output_dir = self.output_dir_for(path);
        {
            let _span = tracing::info_span!("create_output_dir").entered();
            self.writer.create_dir_all(&output_dir).map_err(|e| match e {
                PipelineError::DirectoryError(_) => e,
                other => PipelineError::DirectoryError(format!("{}: {}", output_dir.display(), other)),
            })?;
        }

        let mut report = ProcessingReport::new(path, &output_dir);
        for &format in &self.config.formats {
            self.process_format(&image, format, base_name, &output_dir, &mut report);
        }
        Ok(report)
    }

    fn validate_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(PipelineError::DecodeError(format!(
                "decoded image is empty ({}x{})",
                width, height
            )));
        }

        if !self.config.validate_dimensions {
            return Ok(());
        }

        if let Some(max) = self.config.max_dimension {
            if width > max || height > max {
                warn!(
                    "Image dimensions {}x{} exceed maximum {}",
                    width, height, max
                );
                return Err(PipelineError::InvalidDimensions(width, height));
            }
        }

        Ok(())
    }

    fn output_dir_for(&self, path: &Path) -> PathBuf {
        if let Some(dir) = &self.config.output_dir {
            return dir.clone();
        }
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    #[instrument(skip_all, fields(format = %format))]
    fn process_format(
        &self,
        image: &DecodedImage,
        format: PixelFormat,
        base_name: &str,
        output_dir: &Path,
        report: &mut ProcessingReport,
    ) {
        let base = match format::convert(image, format) {
            Ok(buffer) => buffer,
            Err(e) => {
                warn!("{} conversion failed: {}", format, e);
                report.skip(format, None, e);
                return;
            }
        };

        for &transform in &self.config.transforms {
            let variant = match transform {
                Transform::Identity => Cow::Borrowed(&base),
                other => {
                    let _span = tracing::info_span!("transform", transform = %other).entered();
                    match other.apply(&base) {
                        Ok(buffer) => Cow::Owned(buffer),
                        Err(e) => {
                            warn!("{} {} failed: {}", format, other, e);
                            report.skip(format, Some(other), e);
                            continue;
                        }
                    }
                }
            };

            let filename = output_filename(base_name, transform, format);
            match self.writer.write(variant.data(), output_dir, &filename) {
                Ok(path) => report.written.push(path),
                Err(e) => {
                    error!("Error saving {}: {}", filename, e);
                    report.skip(format, Some(transform), e);
                }
            }
        }
    }

    pub fn config(&self) -> &ProcessingConfig {
        &self.config
    }
}
