// SPDX-License-Identifier: GPL-3.0-only

//! Capture handlers
//!
//! Capturing needs a granted permission, no held photo and a live camera
//! that has produced at least one frame. Anything else is a silent no-op.

use crate::errors::CaptureError;
use crate::screen::state::Screen;
use crate::screen::{CameraScreen, Message, Notification, Task};
use crate::services::PhotoReference;
use tracing::{debug, error, info};

impl CameraScreen {
    pub(crate) fn handle_camera_ready(&mut self) -> Task<Message> {
        if !self.state.camera_ready {
            info!("Camera ready for capture");
        }
        self.state.camera_ready = true;
        Task::none()
    }

    pub(crate) fn handle_camera_lost(&mut self) -> Task<Message> {
        if self.state.camera_ready {
            info!("Camera stopped streaming");
        }
        self.state.camera_ready = false;
        Task::none()
    }

    /// Take a photo from the live camera
    pub fn capture(&mut self) -> Task<Message> {
        if self.state.screen() != Screen::Capturing {
            debug!(screen = ?self.state.screen(), "Capture ignored outside the live view");
            return Task::none();
        }
        if !self.state.camera_ready {
            debug!("Capture ignored, camera not initialized yet");
            return Task::none();
        }
        if self.state.capturing {
            debug!("Capture already in progress");
            return Task::none();
        }

        info!(
            quality = self.capture_options.quality,
            skip_processing = self.capture_options.skip_processing,
            "Capturing photo..."
        );
        self.state.capturing = true;
        Task::perform(
            self.services.capture.capture(self.capture_options),
            Message::Captured,
        )
    }

    pub(crate) fn handle_captured(
        &mut self,
        result: Result<PhotoReference, CaptureError>,
    ) -> Task<Message> {
        self.state.capturing = false;

        match result {
            Ok(photo) => {
                if self.state.screen() != Screen::Capturing {
                    debug!(photo = %photo, "Discarding capture, live view no longer shown");
                    return Task::none();
                }
                info!(photo = %photo, "Photo captured");
                self.state.hold(photo);
            }
            Err(e) => {
                error!(error = %e, "Failed to capture photo");
                self.notifier.notify(Notification::CaptureFailed(e));
            }
        }
        Task::none()
    }
}
