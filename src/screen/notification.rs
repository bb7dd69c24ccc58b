// SPDX-License-Identifier: GPL-3.0-only

//! User-facing notifications
//!
//! The screen publishes outcomes on a broadcast channel. Whatever UI is
//! attached subscribes and decides how to show them; the screen itself never
//! waits for the user to acknowledge anything.

use crate::errors::{CaptureError, PersistError, TransformError};
use crate::fl;
use crate::services::PhotoReference;
use tokio::sync::broadcast;
use tracing::debug;

/// Notifications kept for slow subscribers before the oldest are dropped
const CHANNEL_CAPACITY: usize = 16;

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Failure,
}

/// Outcome reported to the user
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    PhotoSaved(PhotoReference),
    SaveFailed {
        photo: PhotoReference,
        error: PersistError,
    },
    /// Effect applied; carries the new photo
    EffectApplied(PhotoReference),
    EffectFailed {
        photo: PhotoReference,
        error: TransformError,
    },
    CaptureFailed(CaptureError),
}

impl Notification {
    pub fn kind(&self) -> NoticeKind {
        match self {
            Notification::PhotoSaved(_) | Notification::EffectApplied(_) => NoticeKind::Success,
            Notification::SaveFailed { .. }
            | Notification::EffectFailed { .. }
            | Notification::CaptureFailed(_) => NoticeKind::Failure,
        }
    }

    /// Localized one-line text
    pub fn text(&self) -> String {
        match self {
            Notification::PhotoSaved(_) => fl!("photo-saved"),
            Notification::SaveFailed { .. } => fl!("photo-save-failed"),
            Notification::EffectApplied(_) => fl!("effect-applied"),
            Notification::EffectFailed { .. } => fl!("effect-failed"),
            Notification::CaptureFailed(_) => fl!("capture-failed"),
        }
    }

    /// Technical detail for failures
    pub fn detail(&self) -> Option<String> {
        match self {
            Notification::SaveFailed { error, .. } => Some(error.to_string()),
            Notification::EffectFailed { error, .. } => Some(error.to_string()),
            Notification::CaptureFailed(error) => Some(error.to_string()),
            _ => None,
        }
    }
}

/// Sending half of the notification channel
#[derive(Debug, Clone)]
pub struct Notifier {
    sender: broadcast::Sender<Notification>,
}

impl Notifier {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Receive every notification published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    pub fn notify(&self, notification: Notification) {
        debug!(?notification, "Publishing notification");
        // Err only means nobody is subscribed
        let _ = self.sender.send(notification);
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}
