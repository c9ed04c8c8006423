//! Bounded worker pool.
//!
//! A fixed number of workers pull jobs from a bounded submission queue, so a
//! burst of submissions waits in `submit` instead of spawning unbounded work.
//! Each job reports its lifecycle over its own channel.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::image_pipeline::{
    common::error::{PipelineError, Result},
    decode::ImageDecoder,
    output::OutputWriter,
    processing::{ChannelObserver, ImageProcessor, ProcessingObserver, ProcessingOutcome},
};

struct Job {
    path: PathBuf,
    observer: ChannelObserver,
}

pub struct WorkerPool {
    sender: mpsc::Sender<Job>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Starts the workers on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime, since the workers are
    /// spawned with `tokio::spawn`.
    pub fn new<D, W>(processor: ImageProcessor<D, W>) -> Self
    where
        D: ImageDecoder + 'static,
        W: OutputWriter + 'static,
    {
        let worker_count = processor.config().workers.max(1);
        let queue_capacity = processor.config().queue_capacity.max(1);

        let processor = Arc::new(processor);
        let (sender, receiver) = mpsc::channel(queue_capacity);
        let receiver = Arc::new(Mutex::new(receiver));

        let workers = (0..worker_count)
            .map(|id| tokio::spawn(worker_loop(id, Arc::clone(&processor), Arc::clone(&receiver))))
            .collect();

        info!(workers = worker_count, queue_capacity, "Worker pool started");
        Self { sender, workers }
    }

    /// Queues `path` for processing. Waits while the queue is full.
    pub async fn submit<P: Into<PathBuf>>(&self, path: P) -> Result<ProcessingHandle> {
        let path = path.into();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let job = Job {
            path: path.clone(),
            observer: ChannelObserver::new(events_tx),
        };

        self.sender
            .send(job)
            .await
            .map_err(|_| PipelineError::WorkerError("worker pool has shut down".to_string()))?;
        debug!(path = %path.display(), "Job queued");

        Ok(ProcessingHandle {
            path,
            events: events_rx,
        })
    }

    /// Closes the queue and waits for queued and running jobs to finish.
    pub async fn shutdown(self) {
        drop(self.sender);
        for worker in self.workers {
            if let Err(e) = worker.await {
                error!("Worker task ended abnormally: {}", e);
            }
        }
        info!("Worker pool stopped");
    }
}

async fn worker_loop<D, W>(
    id: usize,
    processor: Arc<ImageProcessor<D, W>>,
    receiver: Arc<Mutex<mpsc::Receiver<Job>>>,
) where
    D: ImageDecoder + 'static,
    W: OutputWriter + 'static,
{
    loop {
        let job = receiver.lock().await.recv().await;
        let Some(job) = job else {
            break;
        };
        debug!(worker = id, path = %job.path.display(), "Picked up job");

        let processor = Arc::clone(&processor);
        let observer = job.observer.clone();
        let path = job.path.clone();
        let joined = tokio::task::spawn_blocking(move || {
            // The outcome is delivered through the observer.
            let _ = processor.process_image(&path, &observer);
        })
        .await;

        if let Err(e) = joined {
            error!(worker = id, path = %job.path.display(), "Job aborted: {}", e);
            job.observer.on_failed(&format!("worker {} aborted: {}", id, e));
        }
    }
    debug!(worker = id, "Worker stopped");
}

/// Receiving end of one submitted job
pub struct ProcessingHandle {
    path: PathBuf,
    events: mpsc::UnboundedReceiver<ProcessingOutcome>,
}

impl ProcessingHandle {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Next lifecycle signal, or `None` once the job has finished and all
    /// signals were consumed.
    pub async fn next_event(&mut self) -> Option<ProcessingOutcome> {
        self.events.recv().await
    }

    /// Waits for the terminal signal.
    pub async fn wait(mut self) -> ProcessingOutcome {
        while let Some(event) = self.events.recv().await {
            if event.is_terminal() {
                return event;
            }
        }
        ProcessingOutcome::Failed("job ended without reporting an outcome".to_string())
    }
}
