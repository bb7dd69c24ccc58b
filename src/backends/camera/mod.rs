// SPDX-License-Identifier: MPL-2.0

//! Live camera
//!
//! ```text
//! ┌──────────────────┐   publish   ┌────────────┐   latest / subscribe
//! │ PreviewPipeline  │ ──────────▶ │ LiveCamera │ ─────────────────────▶ UI, FrameCapture
//! └──────────────────┘             └────────────┘
//! ```
//!
//! The pipeline owns the device; everything else reads frames from the
//! shared [`LiveCamera`] handle, so a still capture never opens the device a
//! second time.

pub mod enumeration;
pub mod pipeline;
pub mod types;

pub use enumeration::{camera_at, enumerate_cameras, select_camera};
pub use pipeline::PreviewPipeline;
pub use types::*;

use std::sync::Arc;
use tokio::sync::watch;

/// Latest frame from the live preview, shared between producer and readers
#[derive(Debug, Clone)]
pub struct LiveCamera {
    sender: Arc<watch::Sender<Option<Arc<CameraFrame>>>>,
}

impl LiveCamera {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Replace the current frame
    pub fn publish(&self, frame: Arc<CameraFrame>) {
        self.sender.send_replace(Some(frame));
    }

    /// Forget the current frame (camera stopped)
    pub fn clear(&self) {
        self.sender.send_replace(None);
    }

    /// The most recent frame, if the camera is running
    pub fn latest(&self) -> Option<Arc<CameraFrame>> {
        self.sender.borrow().clone()
    }

    pub fn is_live(&self) -> bool {
        self.sender.borrow().is_some()
    }

    /// Receiver notified on every publish or clear
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<CameraFrame>>> {
        self.sender.subscribe()
    }
}

impl Default for LiveCamera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(value: u8) -> Arc<CameraFrame> {
        Arc::new(CameraFrame::from_rgba_strided(1, 1, 4, &[value, value, value, 255]).unwrap())
    }

    #[test]
    fn test_latest_tracks_publish_and_clear() {
        let live = LiveCamera::new();
        assert!(live.latest().is_none());

        live.publish(frame(1));
        live.publish(frame(2));
        assert_eq!(live.latest().unwrap().pixel(0, 0), (2, 2, 2));
        assert!(live.is_live());

        live.clear();
        assert!(!live.is_live());
    }

    #[tokio::test]
    async fn test_subscribers_see_new_frames() {
        let live = LiveCamera::new();
        let mut rx = live.subscribe();
        let producer = live.clone();

        tokio::spawn(async move { producer.publish(frame(7)) });
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().as_ref().unwrap().pixel(0, 0), (7, 7, 7));
    }
}
