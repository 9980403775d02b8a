//! Shared image types

use crate::cam_pipeline::common::error::{CamError, Result};

/// 8-bit RGB image, row-major and interleaved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbImage {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// RGB pixel data interleaved [R, G, B, R, G, B, ...]
    pub data: Vec<u8>,
}

impl RgbImage {
    /// Wraps an interleaved buffer, checking it holds exactly `width * height` pixels.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        if data.len() != width * height * 3 {
            return Err(CamError::ShapeMismatchError(format!(
                "RGB buffer of {} bytes does not match {}x{}x3",
                data.len(),
                width,
                height
            )));
        }
        Ok(Self { width, height, data })
    }

    pub fn filled(width: usize, height: usize, color: [u8; 3]) -> Self {
        let data = std::iter::repeat_n(color, width * height).flatten().collect();
        Self { width, height, data }
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let offset = (y * self.width + x) * 3;
        [self.data[offset], self.data[offset + 1], self.data[offset + 2]]
    }

    pub fn pixels(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.data.chunks_exact(3).map(|p| [p[0], p[1], p[2]])
    }
}
