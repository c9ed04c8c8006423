use std::path::Path;
use std::sync::Mutex;

use image::{Rgba, RgbaImage};
use raw_variants::image_pipeline::{
    ImageProcessor, PixelFormat, ProcessingConfig, ProcessingObserver, ProcessingOutcome, WorkerPool,
};

#[derive(Default)]
struct RecordingObserver {
    events: Mutex<Vec<ProcessingOutcome>>,
}

impl ProcessingObserver for RecordingObserver {
    fn on_started(&self) {
        self.events.lock().unwrap().push(ProcessingOutcome::Started);
    }

    fn on_completed(&self) {
        self.events.lock().unwrap().push(ProcessingOutcome::Completed);
    }

    fn on_failed(&self, reason: &str) {
        self.events.lock().unwrap().push(ProcessingOutcome::Failed(reason.to_string()));
    }
}

fn write_gradient_png(path: &Path, width: u32, height: u32) {
    let image = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 4) as u8, (y * 4) as u8, ((x + y) * 2) as u8, 255])
    });
    image.save(path).unwrap();
}

fn file_len(dir: &Path, name: &str) -> u64 {
    std::fs::metadata(dir.join(name)).unwrap().len()
}

#[test]
fn test_bgr24_outputs_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("sunset.png");
    write_gradient_png(&source, 64, 64);

    let config = ProcessingConfig::builder()
        .formats([PixelFormat::Bgr24])
        .sample_size(1)
        .build();
    let observer = RecordingObserver::default();
    let report = ImageProcessor::new(config).process_image(&source, &observer).unwrap();

    assert_eq!(
        *observer.events.lock().unwrap(),
        [ProcessingOutcome::Started, ProcessingOutcome::Completed]
    );
    assert_eq!(report.written.len(), 4);
    assert_eq!(file_len(dir.path(), "sunset_origin.bgr24"), 12288);
    assert_eq!(file_len(dir.path(), "sunset_mirror.bgr24"), 12288);
    assert_eq!(file_len(dir.path(), "sunset_rotate90.bgr24"), 12288);
    assert_eq!(file_len(dir.path(), "sunset_crop.bgr24"), 3072);
}

#[test]
fn test_default_config_writes_twelve_files_at_half_resolution() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("pier.png");
    write_gradient_png(&source, 128, 96);

    let report = ImageProcessor::new(ProcessingConfig::default())
        .process_image(&source, &RecordingObserver::default())
        .unwrap();

    assert_eq!(report.written.len(), 12);
    // Decoded at 64x48 by the default sample size of 2.
    assert_eq!(file_len(dir.path(), "pier_origin.nv21"), 64 * 48 * 3 / 2);
    assert_eq!(file_len(dir.path(), "pier_rotate90.i420"), 64 * 48 * 3 / 2);
    assert_eq!(file_len(dir.path(), "pier_crop.bgr24"), 32 * 24 * 3);
}

#[test]
fn test_undecodable_file_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("corrupt.png");
    std::fs::write(&source, b"not an image").unwrap();

    let observer = RecordingObserver::default();
    let result = ImageProcessor::new(ProcessingConfig::default()).process_image(&source, &observer);

    assert!(result.is_err());
    let events = observer.events.lock().unwrap();
    assert_eq!(events.len(), 2);
    assert!(matches!(events[1], ProcessingOutcome::Failed(_)));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_unwritable_output_dir_fails() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("lake.png");
    write_gradient_png(&source, 16, 16);
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"a file, not a directory").unwrap();

    let config = ProcessingConfig::builder()
        .output_dir(Some(blocker.join("out")))
        .build();
    let observer = RecordingObserver::default();
    let result = ImageProcessor::new(config).process_image(&source, &observer);

    assert!(result.is_err());
    assert!(matches!(
        observer.events.lock().unwrap().last(),
        Some(ProcessingOutcome::Failed(_))
    ));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_pool_runs_images_concurrently() {
    let dir = tempfile::tempdir().unwrap();
    let names = ["a", "b", "c", "d"];
    for name in names {
        write_gradient_png(&dir.path().join(format!("{}.png", name)), 32, 32);
    }

    let config = ProcessingConfig::builder().workers(2).queue_capacity(2).build();
    let pool = WorkerPool::new(ImageProcessor::new(config));

    let mut handles = Vec::new();
    for name in names {
        handles.push(pool.submit(dir.path().join(format!("{}.png", name))).await.unwrap());
    }
    handles.push(pool.submit(dir.path().join("missing.png")).await.unwrap());

    let mut outcomes = Vec::new();
    for handle in handles {
        outcomes.push(handle.wait().await);
    }
    pool.shutdown().await;

    assert!(outcomes[..4].iter().all(|o| *o == ProcessingOutcome::Completed));
    assert!(matches!(outcomes[4], ProcessingOutcome::Failed(_)));
    for name in names {
        assert_eq!(file_len(dir.path(), &format!("{}_crop.bgr24", name)), 8 * 8 * 3);
    }
}
