//! RAW frame data types

/// One decoded sensor frame, as read from its container file.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFrame {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// Samples per pixel; a Bayer mosaic has exactly one
    pub channels: usize,
    /// 8-bit samples, row-major, interleaved when `channels > 1`
    pub data: Vec<u8>,
}

impl RawFrame {
    pub fn mono(width: usize, height: usize, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            channels: 1,
            data,
        }
    }

    pub fn is_single_channel(&self) -> bool {
        self.channels == 1
    }

    /// Sample at (x, y) of a single-channel frame.
    #[inline]
    pub fn sample(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }
}
