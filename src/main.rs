use std::path::PathBuf;

use clap::Parser;
use raw_variants::image_pipeline::{ImageProcessor, ProcessingConfig, ProcessingOutcome, WorkerPool};
use raw_variants::logger;

use tracing::{error, info};

/// Writes NV21, I420 and BGR24 variants (origin, mirror, rotate90, crop) of
/// each image next to it.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Images to process
    #[arg(required = true)]
    paths: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logger::init();
    let cli = Cli::parse();

    info!("Starting raw_variants...");

    let config = ProcessingConfig::default();
    info!(
        "Formats: {:?}, transforms: {:?}, workers: {}",
        config.formats, config.transforms, config.workers
    );
    let pool = WorkerPool::new(ImageProcessor::new(config));

    let mut handles = Vec::with_capacity(cli.paths.len());
    for path in cli.paths {
        handles.push(pool.submit(path).await?);
    }

    let total = handles.len();
    let mut failures = 0;
    for mut handle in handles {
        while let Some(event) = handle.next_event().await {
            match event {
                ProcessingOutcome::Started => info!("Started {}", handle.path().display()),
                ProcessingOutcome::Completed => info!("Completed {}", handle.path().display()),
                ProcessingOutcome::Failed(reason) => {
                    error!("Failed {}: {}", handle.path().display(), reason);
                    failures += 1;
                }
            }
        }
    }

    pool.shutdown().await;

    if failures > 0 {
        anyhow::bail!("{} of {} images failed", failures, total);
    }
    Ok(())
}
