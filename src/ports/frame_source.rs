//! Frame source port: Trait for reading images into pixel frames.

use std::path::Path;

use super::RgbaFrame;

/// Reads an image at a path into an RGBA frame.
pub trait FrameSource: Send + Sync {
    /// Error type for unreadable or undecodable images.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the image at `path`.
    ///
    /// # Errors
    /// Returns error if the file cannot be opened or is not a supported image.
    fn read_frame(&self, path: &Path) -> Result<RgbaFrame, Self::Error>;
}
