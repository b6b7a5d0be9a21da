//! QR adapter: `rqrr` decoding and image-file loading.
//!
//! Image files are read with the `image` crate and converted to RGBA;
//! decoding itself is delegated to `rqrr` on a greyscale view of the frame.

use std::path::Path;

use crate::ports::{FrameError, FrameSource, QrDecoder, RgbaFrame};

/// Error type for reading an image file into a frame.
#[derive(Debug, thiserror::Error)]
pub enum ImageLoadError {
    #[error("Cannot read image: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid image: {0}")]
    Frame(#[from] FrameError),
}

/// Read an image file (PNG, JPEG, BMP, GIF) as an RGBA frame.
///
/// # Errors
/// Returns error if the file cannot be opened or decoded.
pub fn load_rgba_frame(path: &Path) -> Result<RgbaFrame, ImageLoadError> {
    let rgba = image::open(path)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(RgbaFrame::new(width, height, rgba.into_raw())?)
}

/// `FrameSource` reading image files from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageFileReader;

impl FrameSource for ImageFileReader {
    type Error = ImageLoadError;

    fn read_frame(&self, path: &Path) -> Result<RgbaFrame, ImageLoadError> {
        load_rgba_frame(path)
    }
}

/// `QrDecoder` backed by `rqrr`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RqrrDecoder;

impl RqrrDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl QrDecoder for RqrrDecoder {
    fn decode(&self, frame: &RgbaFrame) -> Option<String> {
        let width = frame.width() as usize;
        let height = frame.height() as usize;

        let mut prepared =
            rqrr::PreparedImage::prepare_from_greyscale(width, height, |x, y| frame.luma_at(x, y));
        let grids = prepared.detect_grids();
        tracing::debug!("Detected {} QR grid candidate(s)", grids.len());

        for grid in grids {
            match grid.decode() {
                Ok((_meta, content)) => return Some(content),
                Err(e) => tracing::debug!("QR grid failed to decode: {:?}", e),
            }
        }
        None
    }
}
