use std::path::PathBuf;

use crate::geometry::midpoint;
use crate::Point;

/// Row-major, interleaved pixel buffer (`len = width * height * channels`).
#[derive(Clone, Debug, PartialEq)]
pub struct ImageBuffer<T> {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub data: Vec<T>,
}

impl<T: Copy> ImageBuffer<T> {
    /// Wrap an existing buffer, checking its length.
    pub fn from_raw(width: usize, height: usize, channels: usize, data: Vec<T>) -> Option<Self> {
        let expected = width.checked_mul(height)?.checked_mul(channels)?;
        (data.len() == expected && channels > 0).then_some(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Pixel value at `(x, y, channel)`, `None` outside the image.
    #[inline]
    pub fn get(&self, x: usize, y: usize, channel: usize) -> Option<T> {
        if x >= self.width || y >= self.height || channel >= self.channels {
            return None;
        }
        self.data
            .get((y * self.width + x) * self.channels + channel)
            .copied()
    }
}

/// Converted views of one captured test image plus its file metadata.
///
/// Produced by the image loader before resolution runs; the resolver only
/// reads dimensions from it.
#[derive(Clone, Debug, Default)]
pub struct ImageArtifacts {
    pub mono8: Option<ImageBuffer<u8>>,
    pub mono16: Option<ImageBuffer<u16>>,
    pub color8: Option<ImageBuffer<u8>>,
    pub file_name: Option<String>,
    pub directory: Option<PathBuf>,
}

impl ImageArtifacts {
    /// `(width, height)` of the first available array.
    pub fn dimensions(&self) -> Option<(usize, usize)> {
        self.mono8
            .as_ref()
            .map(|b| (b.width, b.height))
            .or_else(|| self.mono16.as_ref().map(|b| (b.width, b.height)))
            .or_else(|| self.color8.as_ref().map(|b| (b.width, b.height)))
    }

    /// Whole-pixel geometric center of the image.
    pub fn center(&self) -> Option<Point> {
        let (w, h) = self.dimensions()?;
        Some(midpoint(&Point::origin(), &Point::new(w as f64, h as f64)))
    }
}
