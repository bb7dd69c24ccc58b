// SPDX-License-Identifier: GPL-3.0-only

//! Application state types

use crate::backends::FolderGallery;
use crate::backends::camera::{CameraDevice, CameraFrame, LiveCamera};
use crate::config::Config;
use crate::screen::{self, CameraScreen, Notification};
use cosmic::widget::about::About;
use cosmic::widget::image::Handle;
use std::sync::Arc;

/// The application model stores app-specific state used to describe its interface and
/// drive its logic.
pub struct AppModel {
    /// Application state which is managed by the COSMIC runtime.
    pub core: cosmic::Core,
    /// Display a context drawer with the designated page if defined.
    pub context_page: ContextPage,
    /// The about page for this app.
    pub about: About,
    /// Configuration data that persists between application runs.
    pub config: Config,
    /// The camera screen controller
    pub screen: CameraScreen,
    /// Frames shared between the preview pipeline and the capture service
    pub live: LiveCamera,
    /// Gallery the screen saves into; retargeted on config changes
    pub gallery: FolderGallery,
    /// Cameras found at startup
    pub cameras: Vec<CameraDevice>,
    /// Camera opened by the preview subscription
    pub camera: Option<CameraDevice>,
    /// Camera enumeration finished
    pub cameras_initialized: bool,
    /// Latest preview frame, ready to draw
    pub preview: Option<Handle>,
    /// Notification waiting for the user to dismiss it
    pub notice: Option<Notification>,
}

/// The context page to display in the context drawer.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ContextPage {
    #[default]
    About,
}

/// Messages emitted by the application and its widgets.
#[derive(Debug, Clone)]
pub enum Message {
    // ===== UI Navigation =====
    /// Open external URL (repository, etc.)
    LaunchUrl(String),
    /// Toggle context drawer page
    ToggleContextPage(ContextPage),

    // ===== Camera =====
    /// Cameras enumerated at startup
    CamerasInitialized(Vec<CameraDevice>),
    /// New camera frame received from pipeline
    CameraFrame(Arc<CameraFrame>),

    // ===== Screen =====
    /// Action or service result for the camera screen
    Screen(screen::Message),
    /// Notification raised by the camera screen
    Notify(Notification),
    /// Close the notification banner
    DismissNotice,

    // ===== Settings =====
    /// Configuration changed on disk
    UpdateConfig(Config),
}
