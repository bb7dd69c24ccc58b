// SPDX-License-Identifier: MPL-2.0

//! COSMIC front end for the camera screen
//!
//! # Architecture
//!
//! - `state`: `AppModel`, `Message`, `ContextPage`
//! - `update`: message handling; screen messages go to [`CameraScreen`]
//! - `view`: permission prompt, live view with capture button, photo preview
//!
//! The live preview runs in a subscription that owns the GStreamer pipeline
//! and forwards frames to the view. A second subscription relays screen
//! notifications into the message loop.

mod state;
mod update;
mod view;

use crate::backends::camera::{LiveCamera, PreviewPipeline, enumerate_cameras};
use crate::backends::{FolderGallery, platform_services};
use crate::config::Config;
use crate::constants::{preview, timing};
use crate::fl;
use crate::screen::{self, CameraScreen, PermissionState};
use cosmic::app::context_drawer;
use cosmic::iced::Subscription;
use cosmic::widget::{self, about::About};
use cosmic::{Element, Task};
pub use state::{AppModel, ContextPage, Message};
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};

const REPOSITORY: &str = "https://github.com/snapcam/snapcam";

/// Run a screen task on the COSMIC executor
pub(crate) fn screen_task(task: screen::Task<screen::Message>) -> Task<cosmic::Action<Message>> {
    Task::batch(task.into_futures().into_iter().map(|future| {
        Task::perform(future, |message| {
            cosmic::Action::App(Message::Screen(message))
        })
    }))
}

impl cosmic::Application for AppModel {
    /// The async executor that will be used to run your application's commands.
    type Executor = cosmic::executor::Default;

    /// Data that your application receives to its init method.
    type Flags = ();

    /// Messages which the application and its widgets will emit.
    type Message = Message;

    /// Unique identifier in RDNN (reverse domain name notation) format.
    const APP_ID: &'static str = "io.github.snapcam.Snapcam";

    fn core(&self) -> &cosmic::Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut cosmic::Core {
        &mut self.core
    }

    /// Initializes the application with any given flags and startup commands.
    fn init(
        core: cosmic::Core,
        _flags: Self::Flags,
    ) -> (Self, Task<cosmic::Action<Self::Message>>) {
        let about = About::default()
            .name(fl!("app-title"))
            .version(env!("GIT_VERSION"))
            .links([(fl!("repository"), REPOSITORY)])
            .license(env!("CARGO_PKG_LICENSE"));

        let config = Config::load(Self::APP_ID);

        // Initialize GStreamer early (required before any GStreamer calls)
        if let Err(e) = gstreamer::init() {
            error!(error = %e, "Failed to initialize GStreamer");
        }

        let live = LiveCamera::new();
        let gallery = FolderGallery::new(&config.save_folder_name);
        let services = platform_services(live.clone(), gallery.clone());
        let (screen, permission_task) = CameraScreen::new(services);

        let app = AppModel {
            core,
            context_page: ContextPage::default(),
            about,
            config,
            screen,
            live,
            gallery,
            cameras: Vec::new(),
            camera: None,
            cameras_initialized: false,
            preview: None,
            notice: None,
        };

        let init_task = Task::perform(
            async {
                tokio::task::spawn_blocking(enumerate_cameras)
                    .await
                    .unwrap_or_default()
            },
            |cameras| cosmic::Action::App(Message::CamerasInitialized(cameras)),
        );

        let theme_task = cosmic::command::set_theme(app.config.app_theme.theme());

        (
            app,
            Task::batch([theme_task, init_task, screen_task(permission_task)]),
        )
    }

    /// Elements to pack at the end of the header bar.
    fn header_end(&self) -> Vec<Element<'_, Self::Message>> {
        vec![
            widget::button::icon(widget::icon::from_name("help-about-symbolic"))
                .on_press(Message::ToggleContextPage(ContextPage::About))
                .into(),
        ]
    }

    /// Display a context drawer if the context page is requested.
    fn context_drawer(&self) -> Option<context_drawer::ContextDrawer<'_, Self::Message>> {
        if !self.core.window.show_context {
            return None;
        }

        Some(match self.context_page {
            ContextPage::About => context_drawer::about(
                &self.about,
                |url| Message::LaunchUrl(url.to_string()),
                Message::ToggleContextPage(ContextPage::About),
            ),
        })
    }

    /// Describes the interface based on the current state of the application model.
    fn view(&self) -> Element<'_, Self::Message> {
        self.view()
    }

    /// Handles messages emitted by the application and its widgets.
    fn update(&mut self, message: Self::Message) -> Task<cosmic::Action<Self::Message>> {
        self.update(message)
    }

    /// Register subscriptions for this application.
    fn subscription(&self) -> Subscription<Self::Message> {
        use cosmic::iced::futures::SinkExt;

        let config_sub = self
            .core()
            .watch_config::<Config>(Self::APP_ID)
            .map(|update| Message::UpdateConfig(update.config));

        let notifier = self.screen.notifier().clone();
        let notice_sub = Subscription::run_with_id(
            "notifications",
            cosmic::iced::stream::channel(16, move |mut output| async move {
                let mut receiver = notifier.subscribe();
                loop {
                    match receiver.recv().await {
                        Ok(notification) => {
                            if output.send(Message::Notify(notification)).await.is_err() {
                                break;
                            }
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            warn!(skipped, "Notification relay lagged");
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
            }),
        );

        // The camera only runs once access is granted and devices are known
        let camera_allowed =
            self.screen.permission() == PermissionState::Granted && self.cameras_initialized;
        if !camera_allowed {
            return Subscription::batch([config_sub, notice_sub]);
        }

        let device = self.camera.clone();
        let live = self.live.clone();
        let camera_sub = Subscription::run_with_id(
            ("camera", device.as_ref().map(|d| d.path.clone())),
            cosmic::iced::stream::channel(preview::CHANNEL_CAPACITY, move |mut output| async move {
                loop {
                    if let Some(cam) = &device {
                        info!(name = %cam.name, path = %cam.path, "Creating camera");
                    } else {
                        info!("Creating default camera");
                    }

                    let pipeline = {
                        let device = device.clone();
                        let live = live.clone();
                        tokio::task::spawn_blocking(move || {
                            PreviewPipeline::new(device.as_ref(), live)
                        })
                        .await
                    };

                    let pipeline = match pipeline {
                        Ok(Ok(pipeline)) => pipeline,
                        Ok(Err(e)) => {
                            error!(error = %e, "Failed to initialize pipeline");
                            tokio::time::sleep(timing::PREVIEW_RETRY_DELAY).await;
                            continue;
                        }
                        Err(e) => {
                            error!(error = %e, "Pipeline task failed");
                            break;
                        }
                    };

                    let mut frames = live.subscribe();
                    let mut ready = false;
                    loop {
                        if output.is_closed() {
                            info!("Output channel closed - camera subscription being cancelled");
                            break;
                        }
                        if let Some(err) = pipeline.poll_error() {
                            error!(error = %err, "Preview pipeline error");
                            break;
                        }

                        match tokio::time::timeout(timing::FRAME_POLL, frames.changed()).await {
                            Ok(Ok(())) => {
                                let current = frames.borrow_and_update().clone();
                                let Some(frame) = current else {
                                    continue;
                                };
                                if !ready {
                                    ready = true;
                                    let _ = output
                                        .send(Message::Screen(screen::Message::CameraReady))
                                        .await;
                                }
                                // Dropping frames is fine for live preview
                                if let Err(e) = output.try_send(Message::CameraFrame(frame))
                                    && e.is_disconnected()
                                {
                                    break;
                                }
                            }
                            Ok(Err(_)) => break,
                            Err(_) => continue,
                        }
                    }

                    drop(pipeline);
                    live.clear();
                    if output
                        .send(Message::Screen(screen::Message::CameraLost))
                        .await
                        .is_err()
                    {
                        break;
                    }
                    info!("Restarting preview after delay");
                    tokio::time::sleep(timing::PREVIEW_RETRY_DELAY).await;
                }
            }),
        );

        Subscription::batch([config_sub, notice_sub, camera_sub])
    }
}
