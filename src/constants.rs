// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use crate::services::{CaptureOptions, EffectOp, EncodeOptions, SaveFormat};

/// Fixed capture parameters
pub mod capture {
    /// JPEG quality for captured photos (0.0 - 1.0)
    pub const QUALITY: f32 = 0.8;
    /// Wait for a fresh, processed frame instead of grabbing the current one
    pub const SKIP_PROCESSING: bool = false;
    /// File name prefix for captured photos
    pub const FILE_PREFIX: &str = "IMG";
}

/// Fixed effect pipeline: resize to 800px wide, rotate 90°, re-encode as JPEG 0.8
pub mod effect {
    /// Target width of the resize step
    pub const RESIZE_WIDTH: u32 = 800;
    /// Clockwise rotation in degrees
    pub const ROTATE_DEGREES: i32 = 90;
    /// Lossy re-encode quality (0.0 - 1.0)
    pub const QUALITY: f32 = 0.8;
    /// Suffix appended to edited file names
    pub const FILE_SUFFIX: &str = "edited";
}

/// Live preview pipeline settings
pub mod preview {
    /// Frames buffered between pipeline and UI before dropping
    pub const CHANNEL_CAPACITY: usize = 4;
    /// Appsink max-buffers
    pub const MAX_BUFFERS: u32 = 2;
    /// Log frame statistics every N frames
    pub const FRAME_LOG_INTERVAL: u64 = 120;
}

/// Timeouts and delays
pub mod timing {
    use std::time::Duration;

    /// How long a capture waits for a fresh frame
    pub const FRESH_FRAME_TIMEOUT: Duration = Duration::from_secs(2);
    /// Pipeline start timeout in seconds
    pub const START_TIMEOUT_SECS: u64 = 5;
    /// Delay before restarting a failed preview pipeline
    pub const PREVIEW_RETRY_DELAY: Duration = Duration::from_secs(5);
    /// Frame and terminal input poll interval (~60fps)
    pub const FRAME_POLL: Duration = Duration::from_millis(16);
    /// Captures and effect results older than this are removed at startup
    pub const SCRATCH_MAX_AGE: Duration = Duration::from_secs(7 * 24 * 60 * 60);
}

/// GUI sizing
pub mod ui {
    /// Capture button outer diameter
    pub const CAPTURE_BUTTON_OUTER: f32 = 72.0;
    /// Capture button inner diameter
    pub const CAPTURE_BUTTON_INNER: f32 = 60.0;
    /// Capture button corner radius
    pub const CAPTURE_BUTTON_RADIUS: f32 = 30.0;
    /// Share of the window height used by the photo preview
    pub const PREVIEW_HEIGHT_PORTION: u16 = 4;
}

/// Default gallery folder name under the user's Pictures directory
pub const DEFAULT_SAVE_FOLDER: &str = "snapcam";

/// Capture options used by the screen
pub fn capture_options() -> CaptureOptions {
    CaptureOptions {
        quality: capture::QUALITY,
        skip_processing: capture::SKIP_PROCESSING,
    }
}

/// Ordered operations of the effect pipeline
pub fn effect_ops() -> Vec<EffectOp> {
    vec![
        EffectOp::Resize {
            width: effect::RESIZE_WIDTH,
        },
        EffectOp::Rotate {
            degrees: effect::ROTATE_DEGREES,
        },
    ]
}

/// Encoder settings of the effect pipeline
pub fn effect_encoding() -> EncodeOptions {
    EncodeOptions {
        quality: effect::QUALITY,
        format: SaveFormat::Jpeg,
    }
}

/// Convert a 0.0 - 1.0 quality into the 1 - 100 scale JPEG encoders use
pub fn jpeg_quality(quality: f32) -> u8 {
    (quality.clamp(0.0, 1.0) * 100.0).round().max(1.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jpeg_quality_scale() {
        assert_eq!(jpeg_quality(0.8), 80);
        assert_eq!(jpeg_quality(1.0), 100);
        assert_eq!(jpeg_quality(0.0), 1);
        assert_eq!(jpeg_quality(3.0), 100);
    }

    #[test]
    fn test_effect_pipeline_order() {
        assert_eq!(
            effect_ops(),
            vec![
                EffectOp::Resize { width: 800 },
                EffectOp::Rotate { degrees: 90 }
            ]
        );
        assert_eq!(effect_encoding().format, SaveFormat::Jpeg);
    }
}
