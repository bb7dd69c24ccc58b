// SPDX-License-Identifier: GPL-3.0-only

//! Camera screen controller
//!
//! `CameraScreen` is the single owner of the permission, the held photo and
//! the processing flag. It follows the same update loop as the COSMIC
//! runtime: user actions and service results arrive as [`Message`]s,
//! `update` mutates state synchronously and returns a [`Task`] describing the
//! service calls to run next. Rendering is a pure function of [`ScreenState`].
//!
//! # Handler Modules
//!
//! - `handlers::permission`: permission query and request
//! - `handlers::capture`: live camera readiness and still capture
//! - `handlers::preview`: back, save to gallery, apply effect

mod handlers;
pub mod notification;
pub mod state;
pub mod task;

use crate::constants;
use crate::errors::{CaptureError, PermissionError, PersistError, TransformError};
use crate::services::{
    CaptureOptions, EffectOp, EncodeOptions, PermissionStatus, PhotoReference, Services,
};
pub use notification::{NoticeKind, Notification, Notifier};
pub use state::{Operation, PermissionState, Screen, ScreenState, UiMode};
pub use task::Task;
use tokio::sync::broadcast;

/// User actions and service results
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // ===== Permission =====
    /// Initial permission query resolved
    PermissionQueried(Result<PermissionStatus, PermissionError>),
    /// User asked to grant camera access
    RequestPermission,
    /// Permission prompt answered
    PermissionRequested(Result<PermissionStatus, PermissionError>),

    // ===== Camera =====
    /// Live camera delivered its first frame
    CameraReady,
    /// Live camera stopped
    CameraLost,
    /// Take a photo
    Capture,
    /// Capture call resolved
    Captured(Result<PhotoReference, CaptureError>),

    // ===== Preview =====
    /// Discard the held photo and return to the live view
    Back,
    /// Save the held photo to the gallery
    Save,
    /// Gallery call resolved
    Saved {
        generation: u64,
        photo: PhotoReference,
        result: Result<(), PersistError>,
    },
    /// Apply the fixed effect to the held photo
    ApplyEffect,
    /// Effect call resolved
    EffectApplied {
        generation: u64,
        photo: PhotoReference,
        result: Result<PhotoReference, TransformError>,
    },
}

/// The camera screen controller
pub struct CameraScreen {
    state: ScreenState,
    services: Services,
    notifier: Notifier,
    capture_options: CaptureOptions,
    effect_ops: Vec<EffectOp>,
    effect_encoding: EncodeOptions,
}

impl CameraScreen {
    /// Create the screen and the task that queries the permission
    pub fn new(services: Services) -> (Self, Task<Message>) {
        let screen = Self {
            state: ScreenState::default(),
            services,
            notifier: Notifier::new(),
            capture_options: constants::capture_options(),
            effect_ops: constants::effect_ops(),
            effect_encoding: constants::effect_encoding(),
        };
        let task = screen.query_permission();
        (screen, task)
    }

    /// Main message handler - routes messages to the handler methods
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            // ===== Permission =====
            Message::PermissionQueried(result) => self.handle_permission_queried(result),
            Message::RequestPermission => self.request_permission(),
            Message::PermissionRequested(result) => self.handle_permission_requested(result),

            // ===== Camera =====
            Message::CameraReady => self.handle_camera_ready(),
            Message::CameraLost => self.handle_camera_lost(),
            Message::Capture => self.capture(),
            Message::Captured(result) => self.handle_captured(result),

            // ===== Preview =====
            Message::Back => self.back(),
            Message::Save => self.save(),
            Message::Saved {
                generation,
                photo,
                result,
            } => self.handle_saved(generation, photo, result),
            Message::ApplyEffect => self.apply_effect(),
            Message::EffectApplied {
                generation,
                photo,
                result,
            } => self.handle_effect_applied(generation, photo, result),
        }
    }

    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    pub fn screen(&self) -> Screen {
        self.state.screen()
    }

    pub fn mode(&self) -> UiMode {
        self.state.mode()
    }

    pub fn permission(&self) -> PermissionState {
        self.state.permission
    }

    /// The photo currently on screen
    pub fn photo(&self) -> Option<&PhotoReference> {
        self.state.photo_reference()
    }

    pub fn is_processing(&self) -> bool {
        self.state.is_processing()
    }

    /// Which operation holds the processing flag
    pub fn processing_operation(&self) -> Option<Operation> {
        self.state.processing.map(|p| p.operation)
    }

    /// Operation running on the photo on screen, for button labels
    pub fn operation_on_photo(&self) -> Option<Operation> {
        self.state.operation_on_held()
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notifier.subscribe()
    }
}

impl std::fmt::Debug for CameraScreen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraScreen")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
