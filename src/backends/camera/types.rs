// SPDX-License-Identifier: MPL-2.0

//! Camera device and frame types

use image::{DynamicImage, RgbImage, RgbaImage};
use std::sync::Arc;
use std::time::Instant;

/// Video capture device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    /// Human readable name (from sysfs when available)
    pub name: String,
    /// Device node, e.g. `/dev/video0`
    pub path: String,
}

impl std::fmt::Display for CameraDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.path)
    }
}

/// One RGBA frame from the live preview
///
/// Rows are tightly packed: `data.len() == width * height * 4`.
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    pub data: Arc<[u8]>,
    /// When the frame left the pipeline
    pub captured_at: Instant,
}

impl CameraFrame {
    /// Build a frame from a possibly padded RGBA buffer
    pub fn from_rgba_strided(width: u32, height: u32, stride: usize, data: &[u8]) -> Option<Self> {
        let row_bytes = width as usize * 4;
        if stride < row_bytes || data.len() < stride * (height as usize).saturating_sub(1) + row_bytes
        {
            return None;
        }

        let data: Arc<[u8]> = if stride == row_bytes {
            Arc::from(&data[..row_bytes * height as usize])
        } else {
            let mut packed = Vec::with_capacity(row_bytes * height as usize);
            for row in data.chunks(stride).take(height as usize) {
                packed.extend_from_slice(&row[..row_bytes]);
            }
            Arc::from(packed)
        };

        Some(Self {
            width,
            height,
            data,
            captured_at: Instant::now(),
        })
    }

    /// RGB of the pixel at (x, y), clamped to the frame
    pub fn pixel(&self, x: u32, y: u32) -> (u8, u8, u8) {
        if self.width == 0 || self.height == 0 {
            return (0, 0, 0);
        }
        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        let idx = (y * self.width as usize + x) * 4;
        match self.data.get(idx..idx + 3) {
            Some(px) => (px[0], px[1], px[2]),
            None => (0, 0, 0),
        }
    }

    /// RGBA bytes, optionally flipped horizontally
    pub fn rgba(&self, mirror: bool) -> Vec<u8> {
        if !mirror {
            return self.data.to_vec();
        }
        let row_bytes = self.width as usize * 4;
        let mut out = Vec::with_capacity(self.data.len());
        for row in self.data.chunks_exact(row_bytes.max(4)) {
            for px in row.chunks_exact(4).rev() {
                out.extend_from_slice(px);
            }
        }
        out
    }

    /// Convert to an RGB image for encoding
    pub fn to_rgb_image(&self) -> Option<RgbImage> {
        let rgba = RgbaImage::from_raw(self.width, self.height, self.data.to_vec())?;
        Some(DynamicImage::ImageRgba8(rgba).to_rgb8())
    }
}

/// Camera backend errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// GStreamer or a required element is missing
    NotAvailable(String),
    /// Failed to build or start the pipeline
    InitializationFailed(String),
    /// Camera device not found
    DeviceNotFound(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::NotAvailable(msg) => write!(f, "Backend not available: {}", msg),
            BackendError::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            BackendError::DeviceNotFound(msg) => write!(f, "Device not found: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strided_rows_are_packed() {
        // 2x2 frame with 4 bytes of padding per row
        let mut data = Vec::new();
        data.extend_from_slice(&[1, 2, 3, 255, 4, 5, 6, 255, 0, 0, 0, 0]);
        data.extend_from_slice(&[7, 8, 9, 255, 10, 11, 12, 255]);
        let frame = CameraFrame::from_rgba_strided(2, 2, 12, &data).unwrap();

        assert_eq!(frame.data.len(), 16);
        assert_eq!(frame.pixel(1, 0), (4, 5, 6));
        assert_eq!(frame.pixel(0, 1), (7, 8, 9));
        assert_eq!(frame.pixel(5, 5), (10, 11, 12));
    }

    #[test]
    fn test_short_buffer_rejected() {
        assert!(CameraFrame::from_rgba_strided(2, 2, 8, &[0; 10]).is_none());
    }

    #[test]
    fn test_mirror_flips_each_row() {
        let data = [1, 1, 1, 255, 2, 2, 2, 255, 3, 3, 3, 255, 4, 4, 4, 255];
        let frame = CameraFrame::from_rgba_strided(2, 2, 8, &data).unwrap();
        let mirrored = frame.rgba(true);
        assert_eq!(&mirrored[..8], &[2, 2, 2, 255, 1, 1, 1, 255]);
        assert_eq!(&mirrored[8..], &[4, 4, 4, 255, 3, 3, 3, 255]);
        assert_eq!(frame.rgba(false), data.to_vec());
    }

    #[test]
    fn test_rgb_conversion_drops_alpha() {
        let frame = CameraFrame::from_rgba_strided(1, 1, 4, &[10, 20, 30, 40]).unwrap();
        let rgb = frame.to_rgb_image().unwrap();
        assert_eq!(rgb.get_pixel(0, 0).0, [10, 20, 30]);
    }
}
