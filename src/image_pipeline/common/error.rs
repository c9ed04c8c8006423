use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to decode image: {0}")]
    DecodeError(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Failed to create output directory: {0}")]
    DirectoryError(String),

    #[error("Failed to convert image: {0}")]
    ConversionError(String),

    #[error("Failed to transform buffer: {0}")]
    TransformError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    #[error("Invalid input path: {0}")]
    InvalidPath(String),

    #[error("Worker error: {0}")]
    WorkerError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl PipelineError {
    /// Fatal errors abort the whole run and reach the observer; everything
    /// else is scoped to one format, transform or file and only gets logged.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            PipelineError::DecodeError(_)
                | PipelineError::InvalidDimensions(_, _)
                | PipelineError::DirectoryError(_)
                | PipelineError::InvalidPath(_)
                | PipelineError::WorkerError(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
