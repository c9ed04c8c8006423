//! Image processing pipeline module
//!
//! This module turns a decoded photo into raw pixel buffers (NV21, I420, BGR24)
//! plus mirrored, rotated and cropped variants of each, and writes them to disk.
//! Decoding, format conversion, transforms, output and orchestration live in
//! separate modules.

pub mod common;
pub mod decode;
pub mod format;
pub mod transform;
pub mod output;
pub mod processing;

pub use common::{
    PipelineError,
    Result,
};

pub use decode::{
    DecodedImage,
    ImageDecoder,
    ImageCrateDecoder,
};

pub use format::{
    PixelFormat,
    PlaneLayout,
    RawBuffer,
};

pub use transform::Transform;

pub use output::{
    OutputWriter,
    FsOutputWriter,
};

pub use processing::{
    ChannelObserver,
    ImageProcessor,
    ProcessingConfig,
    ProcessingConfigBuilder,
    ProcessingHandle,
    ProcessingObserver,
    ProcessingOutcome,
    ProcessingReport,
    SkippedOutput,
    WorkerPool,
};
