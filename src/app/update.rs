// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! Screen actions and service results are forwarded to the
//! [`CameraScreen`](crate::screen::CameraScreen); everything else is
//! presentation state owned by the app.

use crate::app::screen_task;
use crate::app::state::{AppModel, ContextPage, Message};
use crate::backends::camera::{CameraDevice, CameraFrame, select_camera};
use crate::config::Config;
use crate::screen::{self, Notification};
use cosmic::Task;
use cosmic::widget::image::Handle;
use std::sync::Arc;
use tracing::{debug, error, info};

impl AppModel {
    /// Main message handler - routes messages to appropriate handler methods.
    pub fn update(&mut self, message: Message) -> Task<cosmic::Action<Message>> {
        match message {
            // ===== UI Navigation =====
            Message::LaunchUrl(url) => self.handle_launch_url(url),
            Message::ToggleContextPage(page) => self.handle_toggle_context_page(page),

            // ===== Camera =====
            Message::CamerasInitialized(cameras) => self.handle_cameras_initialized(cameras),
            Message::CameraFrame(frame) => self.handle_camera_frame(frame),

            // ===== Screen =====
            Message::Screen(message) => screen_task(self.screen.update(message)),
            Message::Notify(notification) => self.handle_notify(notification),
            Message::DismissNotice => {
                self.notice = None;
                Task::none()
            }

            // ===== Settings =====
            Message::UpdateConfig(config) => self.handle_update_config(config),
        }
    }

    fn handle_launch_url(&self, url: String) -> Task<cosmic::Action<Message>> {
        if let Err(err) = open::that_detached(&url) {
            error!(url = %url, error = %err, "Failed to open URL");
        }
        Task::none()
    }

    fn handle_toggle_context_page(
        &mut self,
        context_page: ContextPage,
    ) -> Task<cosmic::Action<Message>> {
        if self.context_page == context_page {
            self.core.window.show_context = !self.core.window.show_context;
        } else {
            self.context_page = context_page;
            self.core.window.show_context = true;
        }
        Task::none()
    }

    fn handle_cameras_initialized(
        &mut self,
        cameras: Vec<CameraDevice>,
    ) -> Task<cosmic::Action<Message>> {
        self.camera = select_camera(&cameras, self.config.camera_path.as_deref());
        self.cameras = cameras;
        self.cameras_initialized = true;
        match &self.camera {
            Some(camera) => info!(camera = %camera, "Selected camera"),
            None => info!("No camera enumerated, using the system default source"),
        }
        Task::none()
    }

    /// Apply a configuration change from disk
    ///
    /// The camera subscription is keyed on the device path, so picking a
    /// different camera restarts the preview on the next subscription pass.
    fn handle_update_config(&mut self, config: Config) -> Task<cosmic::Action<Message>> {
        info!(?config, "Configuration updated");
        let old = std::mem::replace(&mut self.config, config);
        let mut tasks = Vec::new();

        if old.app_theme != self.config.app_theme {
            tasks.push(cosmic::command::set_theme(self.config.app_theme.theme()));
        }

        if old.save_folder_name != self.config.save_folder_name {
            self.gallery.set_folder_name(&self.config.save_folder_name);
        }

        if old.camera_path != self.config.camera_path && self.cameras_initialized {
            let camera = select_camera(&self.cameras, self.config.camera_path.as_deref());
            if camera != self.camera {
                info!(camera = ?camera, "Switching camera");
                self.camera = camera;
                self.live.clear();
                self.preview = None;
                tasks.push(screen_task(
                    self.screen.update(screen::Message::CameraLost),
                ));
            }
        }

        Task::batch(tasks)
    }

    fn handle_camera_frame(&mut self, frame: Arc<CameraFrame>) -> Task<cosmic::Action<Message>> {
        self.preview = Some(Handle::from_rgba(
            frame.width,
            frame.height,
            frame.rgba(self.config.mirror_preview),
        ));
        Task::none()
    }

    fn handle_notify(&mut self, notification: Notification) -> Task<cosmic::Action<Message>> {
        debug!(?notification, "Showing notification");
        self.notice = Some(notification);
        Task::none()
    }
}
