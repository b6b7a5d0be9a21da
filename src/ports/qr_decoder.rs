//! QR decoder port: Trait for the image-decode collaborator.
//!
//! The decoder is an external capability; the application only relies on
//! its contract: raw RGBA pixels in, decoded text or nothing out.

/// A raw RGBA8 pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaFrame {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

/// Why a pixel buffer was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    #[error("Image has zero width or height")]
    Empty,

    #[error("Pixel buffer length {actual} does not match {width}x{height} RGBA ({expected} bytes)")]
    LengthMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

impl RgbaFrame {
    /// Wrap an RGBA buffer, checking its length against the dimensions.
    ///
    /// # Errors
    /// Returns `FrameError` on zero dimensions or a length mismatch.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, FrameError> {
        if width == 0 || height == 0 {
            return Err(FrameError::Empty);
        }
        let expected = (width as usize) * (height as usize) * 4;
        if pixels.len() != expected {
            return Err(FrameError::LengthMismatch {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Luma (Rec. 601) of the pixel at `(x, y)`, alpha-blended over white.
    #[must_use]
    pub fn luma_at(&self, x: usize, y: usize) -> u8 {
        let i = (y * self.width as usize + x) * 4;
        let [r, g, b, a] = [
            u32::from(self.pixels[i]),
            u32::from(self.pixels[i + 1]),
            u32::from(self.pixels[i + 2]),
            u32::from(self.pixels[i + 3]),
        ];
        let luma = (299 * r + 587 * g + 114 * b) / 1000;
        // Transparent pixels read as white paper.
        ((luma * a + 255 * (255 - a)) / 255) as u8
    }
}

/// Trait for QR decoding.
pub trait QrDecoder: Send + Sync {
    /// Decode the first readable QR code in the frame.
    ///
    /// Returns `None` when no code is found or none can be read.
    fn decode(&self, frame: &RgbaFrame) -> Option<String>;
}
