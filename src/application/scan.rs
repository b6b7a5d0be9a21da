//! Scan service: read an image and decode the QR code on it.

use std::path::Path;
use std::sync::Arc;

use crate::ports::{FrameSource, QrDecoder, RgbaFrame};
use crate::SehatError;

/// Result of a completed scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// A QR code was decoded to this (trimmed, non-empty) payload.
    Decoded(String),
    /// No readable QR code in the image.
    NoCode,
}

impl ScanOutcome {
    /// Status line shown to the user.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Decoded(payload) => format!("QR decoded: {payload}"),
            Self::NoCode => "No QR found in image (or poor quality).".to_string(),
        }
    }
}

/// Stage a file scan has reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStage {
    /// Reading the image file
    Loading,
    /// Image read, searching for a code
    Decoding,
}

/// Decodes QR codes from image files.
pub struct ScanService<S, Q>
where
    S: FrameSource,
    Q: QrDecoder,
{
    frames: Arc<S>,
    decoder: Arc<Q>,
}

impl<S, Q> Clone for ScanService<S, Q>
where
    S: FrameSource,
    Q: QrDecoder,
{
    fn clone(&self) -> Self {
        Self {
            frames: Arc::clone(&self.frames),
            decoder: Arc::clone(&self.decoder),
        }
    }
}

impl<S, Q> ScanService<S, Q>
where
    S: FrameSource,
    S::Error: Into<SehatError>,
    Q: QrDecoder,
{
    pub fn new(frames: Arc<S>, decoder: Arc<Q>) -> Self {
        Self { frames, decoder }
    }

    /// Decode a frame already in memory.
    ///
    /// Surrounding whitespace is stripped from the payload; a payload that is
    /// empty afterwards counts as no code.
    #[must_use]
    pub fn scan_frame(&self, frame: &RgbaFrame) -> ScanOutcome {
        match self.decoder.decode(frame) {
            Some(payload) if !payload.trim().is_empty() => {
                ScanOutcome::Decoded(payload.trim().to_string())
            }
            _ => ScanOutcome::NoCode,
        }
    }

    /// Read an image file and decode it.
    ///
    /// # Errors
    /// Returns error if the file cannot be read as an image. An image with no
    /// readable code is `Ok(ScanOutcome::NoCode)`.
    pub fn scan_file(&self, path: &Path) -> Result<ScanOutcome, SehatError> {
        self.scan_file_with(path, |_| {})
    }

    /// Like [`ScanService::scan_file`], reporting each stage to `on_stage`
    /// before it starts.
    ///
    /// # Errors
    /// Same as [`ScanService::scan_file`].
    pub fn scan_file_with<F>(&self, path: &Path, mut on_stage: F) -> Result<ScanOutcome, SehatError>
    where
        F: FnMut(ScanStage),
    {
        on_stage(ScanStage::Loading);
        let frame = self
            .frames
            .read_frame(path)
            .map_err(Into::<SehatError>::into)?;
        tracing::debug!("Scanning {}x{} image", frame.width(), frame.height());

        on_stage(ScanStage::Decoding);
        Ok(self.scan_frame(&frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{ImageFileReader, ImageLoadError};

    struct FixedDecoder(Option<&'static str>);

    impl QrDecoder for FixedDecoder {
        fn decode(&self, _frame: &RgbaFrame) -> Option<String> {
            self.0.map(str::to_string)
        }
    }

    /// Hands out a blank frame for any path.
    struct BlankFrames;

    impl FrameSource for BlankFrames {
        type Error = ImageLoadError;

        fn read_frame(&self, _path: &Path) -> Result<RgbaFrame, ImageLoadError> {
            Ok(frame())
        }
    }

    fn frame() -> RgbaFrame {
        RgbaFrame::new(1, 1, vec![255; 4]).expect("Valid frame")
    }

    fn service(payload: Option<&'static str>) -> ScanService<BlankFrames, FixedDecoder> {
        ScanService::new(Arc::new(BlankFrames), Arc::new(FixedDecoder(payload)))
    }

    #[test]
    fn test_scan_frame_decoded() {
        let outcome = service(Some("35202-1234567-1")).scan_frame(&frame());
        assert_eq!(outcome, ScanOutcome::Decoded("35202-1234567-1".to_string()));
        assert_eq!(outcome.message(), "QR decoded: 35202-1234567-1");
    }

    #[test]
    fn test_payload_whitespace_trimmed() {
        let outcome = service(Some("  35202-1234567-1 \n")).scan_frame(&frame());
        assert_eq!(outcome, ScanOutcome::Decoded("35202-1234567-1".to_string()));
        assert_eq!(outcome.message(), "QR decoded: 35202-1234567-1");
    }

    #[test]
    fn test_blank_payload_is_no_code() {
        assert_eq!(service(Some("")).scan_frame(&frame()), ScanOutcome::NoCode);
        assert_eq!(service(Some("   ")).scan_frame(&frame()), ScanOutcome::NoCode);
        assert_eq!(service(Some("\n\t")).scan_frame(&frame()), ScanOutcome::NoCode);

        let outcome = service(None).scan_frame(&frame());
        assert_eq!(outcome.message(), "No QR found in image (or poor quality).");
    }

    #[test]
    fn test_scan_file_reports_stages() {
        let mut stages = Vec::new();
        let outcome = service(Some("42101-7654321-3"))
            .scan_file_with(Path::new("card.png"), |stage| stages.push(stage))
            .expect("Should scan");
        assert_eq!(outcome, ScanOutcome::Decoded("42101-7654321-3".to_string()));
        assert_eq!(stages, vec![ScanStage::Loading, ScanStage::Decoding]);
    }

    #[test]
    fn test_unreadable_file_is_error() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let path = dir.path().join("not-an-image.png");
        std::fs::write(&path, b"plain text").expect("Should write");

        let svc = ScanService::new(Arc::new(ImageFileReader), Arc::new(FixedDecoder(Some("x"))));
        let mut stages = Vec::new();
        let result = svc.scan_file_with(&path, |stage| stages.push(stage));
        assert!(matches!(result, Err(SehatError::Image(_))));
        assert_eq!(stages, vec![ScanStage::Loading]);
    }
}
