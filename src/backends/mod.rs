// SPDX-License-Identifier: MPL-2.0

//! Platform implementations of the camera screen services
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                    CameraScreen                      │
//! └───────┬──────────────┬──────────────┬────────────────┘
//!         │ permission   │ capture      │ gallery / effects
//! ┌───────┴──────┐ ┌─────┴────────┐ ┌───┴──────────────────────┐
//! │ XDG portal   │ │ FrameCapture │ │ FolderGallery            │
//! │ + /dev check │ │ ← LiveCamera │ │ ImageEffects (image)     │
//! └──────────────┘ └──────────────┘ └──────────────────────────┘
//! ```

pub mod camera;
pub mod capture;
pub mod effects;
pub mod encoding;
pub mod gallery;
pub mod permission;

pub use camera::LiveCamera;
pub use capture::FrameCapture;
pub use effects::ImageEffects;
pub use gallery::FolderGallery;
pub use permission::PortalPermission;

use crate::services::Services;
use std::sync::Arc;

/// Services backed by the real camera, portal, gallery folder and codec
///
/// `gallery` is shared with the caller so it can be retargeted later.
pub fn platform_services(live: LiveCamera, gallery: FolderGallery) -> Services {
    Services {
        permission: Arc::new(PortalPermission::new()),
        capture: Arc::new(FrameCapture::new(live)),
        gallery: Arc::new(gallery),
        effects: Arc::new(ImageEffects::new()),
    }
}
