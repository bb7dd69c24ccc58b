// SPDX-License-Identifier: GPL-3.0-only

//! Camera screen state
//!
//! Only three facts are stored: the permission, the held photo and the
//! in-flight operation. The visible screen and the capture/preview mode are
//! derived from them so they can never disagree.

use crate::services::PhotoReference;

/// Camera permission lifecycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PermissionState {
    /// Query not answered yet
    #[default]
    Unknown,
    Denied,
    Granted,
}

/// Derived capture/preview mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    /// Live camera view
    Capture,
    /// Held photo view
    Preview,
}

/// Derived screen shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    AwaitingPermission,
    PermissionDenied,
    Capturing,
    Previewing,
}

/// Kind of post-processing operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Save,
    Effect,
}

/// Photo currently held by the screen
///
/// The generation identifies this particular hold. It changes whenever the
/// photo is replaced or dropped, so late results can tell whether the photo
/// they were started for is still on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeldPhoto {
    pub reference: PhotoReference,
    pub generation: u64,
}

/// Operation waiting on a service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InFlight {
    pub operation: Operation,
    /// Generation of the photo the operation was started on
    pub generation: u64,
}

/// Mutable screen state, owned by `CameraScreen`
#[derive(Debug, Clone, Default)]
pub struct ScreenState {
    pub permission: PermissionState,
    pub photo: Option<HeldPhoto>,
    pub processing: Option<InFlight>,
    /// Live camera is streaming and can be captured from
    pub camera_ready: bool,
    /// A capture call is outstanding
    pub capturing: bool,
    next_generation: u64,
}

impl ScreenState {
    pub fn mode(&self) -> UiMode {
        if self.photo.is_some() {
            UiMode::Preview
        } else {
            UiMode::Capture
        }
    }

    pub fn screen(&self) -> Screen {
        match (self.permission, self.mode()) {
            (PermissionState::Unknown, _) => Screen::AwaitingPermission,
            (PermissionState::Denied, _) => Screen::PermissionDenied,
            (PermissionState::Granted, UiMode::Capture) => Screen::Capturing,
            (PermissionState::Granted, UiMode::Preview) => Screen::Previewing,
        }
    }

    pub fn photo_reference(&self) -> Option<&PhotoReference> {
        self.photo.as_ref().map(|p| &p.reference)
    }

    pub fn is_processing(&self) -> bool {
        self.processing.is_some()
    }

    /// Hold a new photo under a fresh generation
    pub fn hold(&mut self, reference: PhotoReference) -> u64 {
        self.next_generation += 1;
        let generation = self.next_generation;
        self.photo = Some(HeldPhoto {
            reference,
            generation,
        });
        generation
    }

    /// Drop the held photo, returning it if there was one
    pub fn release(&mut self) -> Option<PhotoReference> {
        self.photo.take().map(|p| p.reference)
    }

    /// Operation running on the photo currently held
    ///
    /// An operation started on an earlier photo still holds the processing
    /// flag, and so still blocks new ones, but it is not reported here.
    pub fn operation_on_held(&self) -> Option<Operation> {
        self.processing
            .filter(|p| self.is_current(p.generation))
            .map(|p| p.operation)
    }

    /// Whether `generation` still names the held photo
    pub fn is_current(&self, generation: u64) -> bool {
        self.photo
            .as_ref()
            .is_some_and(|p| p.generation == generation)
    }
}
