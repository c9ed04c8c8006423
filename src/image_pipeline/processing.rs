//! Processing orchestration module
//!
//! Drives one image through decode, conversion to every configured format and
//! every configured transform, and runs many such jobs on a bounded worker pool.

mod types;
mod observer;
mod pipeline;
mod pool;


pub use types::{ProcessingConfig, ProcessingConfigBuilder, ProcessingReport, SkippedOutput};
pub use observer::{ChannelObserver, ProcessingObserver, ProcessingOutcome};
pub use pipeline::{ImageProcessor, output_filename};
pub use pool::{ProcessingHandle, WorkerPool};
