// SPDX-License-Identifier: GPL-3.0-only

//! Still capture from the live preview
//!
//! A capture encodes a frame the preview pipeline already delivered. With
//! `skip_processing` off, the capture waits for a frame produced after the
//! request so the photo matches what the user saw when pressing the button.

use super::camera::{CameraFrame, LiveCamera};
use super::encoding;
use crate::constants::{capture, jpeg_quality, timing};
use crate::errors::CaptureError;
use crate::services::{CaptureOptions, CaptureService, PhotoReference, ServiceFuture};
use crate::storage;
use futures::FutureExt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// [`CaptureService`] backed by a [`LiveCamera`]
#[derive(Debug, Clone)]
pub struct FrameCapture {
    live: LiveCamera,
    output_dir: PathBuf,
    fresh_frame_timeout: Duration,
}

impl FrameCapture {
    pub fn new(live: LiveCamera) -> Self {
        Self::with_output_dir(live, storage::get_capture_directory())
    }

    pub fn with_output_dir(live: LiveCamera, output_dir: PathBuf) -> Self {
        Self {
            live,
            output_dir,
            fresh_frame_timeout: timing::FRESH_FRAME_TIMEOUT,
        }
    }

    /// Override how long to wait for a fresh frame
    pub fn with_fresh_frame_timeout(mut self, timeout: Duration) -> Self {
        self.fresh_frame_timeout = timeout;
        self
    }

    async fn take(self, options: CaptureOptions) -> Result<PhotoReference, CaptureError> {
        let requested_at = Instant::now();
        if !self.live.is_live() {
            warn!("Capture requested but the camera is not running");
            return Err(CaptureError::DeviceUnavailable);
        }

        let frame = if options.skip_processing {
            self.live.latest().ok_or(CaptureError::NoFrameAvailable)?
        } else {
            self.wait_for_frame_after(requested_at).await?
        };
        debug!(
            width = frame.width,
            height = frame.height,
            "Encoding captured frame"
        );

        let quality = jpeg_quality(options.quality);
        let data = tokio::task::spawn_blocking(move || encode_frame(&frame, quality))
            .await
            .map_err(|e| CaptureError::EncodingFailed(format!("Encoding task error: {}", e)))??;

        let file_name = storage::timestamped_file_name(capture::FILE_PREFIX, "jpg");
        let path = encoding::write_file(&self.output_dir, &file_name, data)
            .await
            .map_err(|e| CaptureError::SaveFailed(e.to_string()))?;

        info!(path = %path.display(), "Photo captured");
        Ok(PhotoReference::from(path))
    }

    async fn wait_for_frame_after(
        &self,
        requested_at: Instant,
    ) -> Result<Arc<CameraFrame>, CaptureError> {
        let mut rx = self.live.subscribe();
        let deadline = tokio::time::Instant::now() + self.fresh_frame_timeout;

        loop {
            let current = rx.borrow_and_update().clone();
            match current {
                Some(frame) if frame.captured_at >= requested_at => return Ok(frame),
                Some(_) => {}
                None => return Err(CaptureError::DeviceUnavailable),
            }

            match tokio::time::timeout_at(deadline, rx.changed()).await {
                Ok(Ok(())) => {}
                Ok(Err(_)) => return Err(CaptureError::DeviceUnavailable),
                Err(_) => {
                    warn!(timeout = ?self.fresh_frame_timeout, "No fresh frame for capture");
                    return Err(CaptureError::NoFrameAvailable);
                }
            }
        }
    }
}

fn encode_frame(frame: &CameraFrame, quality: u8) -> Result<Vec<u8>, CaptureError> {
    let image = frame
        .to_rgb_image()
        .ok_or_else(|| CaptureError::EncodingFailed("Frame buffer size mismatch".into()))?;
    encoding::encode_jpeg(&image, quality).map_err(CaptureError::EncodingFailed)
}

impl CaptureService for FrameCapture {
    fn capture(&self, options: CaptureOptions) -> ServiceFuture<PhotoReference, CaptureError> {
        self.clone().take(options).boxed()
    }
}
