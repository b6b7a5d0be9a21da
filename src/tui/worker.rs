//! Background QR scan worker.
//!
//! Reading and decoding an image runs on its own thread so the UI loop
//! keeps drawing. The worker is single-shot: it reports its phases over a
//! channel and ends with exactly one `Complete` or `Error`. A worker that
//! dies without reporting shows up as an `Error` on the handle.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};

use crate::application::{ScanOutcome, ScanService, ScanStage};
use crate::ports::{FrameSource, QrDecoder};
use crate::SehatError;

/// Reported when the worker thread ends without a final update.
pub const WORKER_STOPPED: &str = "Scan worker stopped unexpectedly";

/// Progress updates from the scan worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanProgress {
    /// Reading the image file
    Loading,
    /// Image read, searching for a QR code
    Decoding,
    Complete(ScanOutcome),
    /// The image could not be read, or the worker died
    Error(String),
}

impl From<ScanStage> for ScanProgress {
    fn from(stage: ScanStage) -> Self {
        match stage {
            ScanStage::Loading => Self::Loading,
            ScanStage::Decoding => Self::Decoding,
        }
    }
}

/// Handle to a running scan worker.
pub struct ScanWorkerHandle {
    progress_rx: Receiver<ScanProgress>,
    _handle: JoinHandle<()>,
}

impl ScanWorkerHandle {
    /// Try to receive the next progress update (non-blocking).
    ///
    /// Once the worker is gone and its queue drained, every call returns
    /// `Error(WORKER_STOPPED)`.
    #[must_use]
    pub fn try_recv(&self) -> Option<ScanProgress> {
        match self.progress_rx.try_recv() {
            Ok(progress) => Some(progress),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                Some(ScanProgress::Error(WORKER_STOPPED.to_string()))
            }
        }
    }

    /// Block until the worker finishes and return its final update.
    #[must_use]
    pub fn wait(self) -> ScanProgress {
        self.progress_rx
            .iter()
            .find(|p| matches!(p, ScanProgress::Complete(_) | ScanProgress::Error(_)))
            .unwrap_or_else(|| ScanProgress::Error(WORKER_STOPPED.to_string()))
    }
}

/// Spawns scan workers.
pub struct ScanWorker;

impl ScanWorker {
    /// Spawn a background scan of the image at `path`.
    pub fn spawn<S, Q>(service: ScanService<S, Q>, path: PathBuf) -> ScanWorkerHandle
    where
        S: FrameSource + 'static,
        S::Error: Into<SehatError>,
        Q: QrDecoder + 'static,
    {
        let (tx, rx) = mpsc::channel::<ScanProgress>();

        let handle = thread::spawn(move || {
            let result = service.scan_file_with(&path, |stage| {
                let _ = tx.send(ScanProgress::from(stage));
            });

            let last = match result {
                Ok(outcome) => {
                    tracing::info!(
                        "Scan finished: {}",
                        if matches!(outcome, ScanOutcome::Decoded(_)) { "code found" } else { "no code" }
                    );
                    ScanProgress::Complete(outcome)
                }
                Err(e) => {
                    tracing::warn!("Scan failed: {}", e);
                    ScanProgress::Error(e.to_string())
                }
            };
            let _ = tx.send(last);
        });

        ScanWorkerHandle {
            progress_rx: rx,
            _handle: handle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{ImageFileReader, ImageLoadError};
    use crate::ports::RgbaFrame;
    use std::path::Path;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    struct AlwaysDecodes;

    impl QrDecoder for AlwaysDecodes {
        fn decode(&self, _frame: &RgbaFrame) -> Option<String> {
            Some("35202-1234567-1".to_string())
        }
    }

    struct CrashingDecoder;

    impl QrDecoder for CrashingDecoder {
        fn decode(&self, _frame: &RgbaFrame) -> Option<String> {
            panic!("decoder crashed");
        }
    }

    struct BlankFrames;

    impl FrameSource for BlankFrames {
        type Error = ImageLoadError;

        fn read_frame(&self, _path: &Path) -> Result<RgbaFrame, ImageLoadError> {
            Ok(RgbaFrame::new(2, 2, vec![255; 16]).expect("Valid frame"))
        }
    }

    #[test]
    fn test_worker_reports_read_error() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let handle = ScanWorker::spawn(
            ScanService::new(Arc::new(ImageFileReader), Arc::new(AlwaysDecodes)),
            dir.path().join("missing.png"),
        );
        assert!(matches!(handle.wait(), ScanProgress::Error(_)));
    }

    #[test]
    fn test_worker_completes() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let path = dir.path().join("white.png");
        image::save_buffer(&path, &[255u8; 8 * 8 * 4], 8, 8, image::ExtendedColorType::Rgba8)
            .expect("Should save png");

        let handle = ScanWorker::spawn(
            ScanService::new(Arc::new(ImageFileReader), Arc::new(AlwaysDecodes)),
            path,
        );
        assert_eq!(
            handle.wait(),
            ScanProgress::Complete(ScanOutcome::Decoded("35202-1234567-1".to_string()))
        );
    }

    #[test]
    fn test_worker_reports_stages_in_order() {
        let handle = ScanWorker::spawn(
            ScanService::new(Arc::new(BlankFrames), Arc::new(AlwaysDecodes)),
            PathBuf::from("card.png"),
        );
        let updates: Vec<ScanProgress> = handle.progress_rx.iter().collect();
        assert_eq!(
            updates,
            vec![
                ScanProgress::Loading,
                ScanProgress::Decoding,
                ScanProgress::Complete(ScanOutcome::Decoded("35202-1234567-1".to_string())),
            ]
        );
    }

    #[test]
    fn test_crashed_worker_surfaces_error() {
        let handle = ScanWorker::spawn(
            ScanService::new(Arc::new(BlankFrames), Arc::new(CrashingDecoder)),
            PathBuf::from("card.png"),
        );

        // Drain the way the UI loop does until a final update shows up.
        let deadline = Instant::now() + Duration::from_secs(10);
        let last = loop {
            match handle.try_recv() {
                Some(p @ (ScanProgress::Complete(_) | ScanProgress::Error(_))) => break p,
                Some(_) => {}
                None => {
                    assert!(Instant::now() < deadline, "worker never reported");
                    thread::sleep(Duration::from_millis(5));
                }
            }
        };
        assert_eq!(last, ScanProgress::Error(WORKER_STOPPED.to_string()));
    }

    #[test]
    fn test_crashed_worker_wait() {
        let handle = ScanWorker::spawn(
            ScanService::new(Arc::new(BlankFrames), Arc::new(CrashingDecoder)),
            PathBuf::from("card.png"),
        );
        assert_eq!(handle.wait(), ScanProgress::Error(WORKER_STOPPED.to_string()));
    }
}
