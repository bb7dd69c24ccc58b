// SPDX-License-Identifier: GPL-3.0-only

//! Terminal front end for the camera screen
//!
//! Renders the live camera or the held photo with Unicode half-block
//! characters and maps keys to screen actions. Service calls run on a tokio
//! runtime and report back through a channel drained by the draw loop.

use crate::app::AppModel;
use crate::backends::camera::{
    CameraFrame, LiveCamera, PreviewPipeline, enumerate_cameras, select_camera,
};
use crate::backends::{FolderGallery, platform_services};
use crate::config::Config;
use crate::constants::timing;
use crate::fl;
use crate::screen::{self, CameraScreen, Notification, Operation, Screen};
use crate::services::PhotoReference;
use cosmic::Application;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal, backend::CrosstermBackend, buffer::Buffer, layout::Rect, style::Color,
    widgets::Widget,
};
use std::io::{self, stdout};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{broadcast, mpsc};
use tracing::{error, info, warn};

/// Run the terminal camera screen
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    gstreamer::init()?;
    let runtime = tokio::runtime::Runtime::new()?;

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &runtime);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// What a key press does on the current screen
#[derive(Debug, Clone, PartialEq)]
enum KeyAction {
    Quit,
    Screen(screen::Message),
}

fn key_action(screen: Screen, code: KeyCode, modifiers: KeyModifiers) -> Option<KeyAction> {
    if code == KeyCode::Char('q')
        || (code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL))
    {
        return Some(KeyAction::Quit);
    }

    let message = match (screen, code) {
        (Screen::PermissionDenied, KeyCode::Char('g')) => screen::Message::RequestPermission,
        (Screen::Capturing, KeyCode::Char('p') | KeyCode::Char(' ')) => screen::Message::Capture,
        (Screen::Previewing, KeyCode::Char('b') | KeyCode::Esc) => screen::Message::Back,
        (Screen::Previewing, KeyCode::Char('s')) => screen::Message::Save,
        (Screen::Previewing, KeyCode::Char('e')) => screen::Message::ApplyEffect,
        _ => return None,
    };
    Some(KeyAction::Screen(message))
}

/// Spawns screen tasks and feeds their results back to the loop
struct Dispatcher<'a> {
    runtime: &'a tokio::runtime::Runtime,
    sender: mpsc::UnboundedSender<screen::Message>,
}

impl Dispatcher<'_> {
    fn spawn(&self, task: screen::Task<screen::Message>) {
        for future in task.into_futures() {
            let sender = self.sender.clone();
            self.runtime.spawn(async move {
                let _ = sender.send(future.await);
            });
        }
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    runtime: &tokio::runtime::Runtime,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(AppModel::APP_ID);
    let camera = select_camera(&enumerate_cameras(), config.camera_path.as_deref());
    match &camera {
        Some(camera) => info!(camera = %camera, "Selected camera"),
        None => info!("No camera enumerated, using the system default source"),
    }

    let live = LiveCamera::new();
    let gallery = FolderGallery::new(&config.save_folder_name);
    let (mut screen, task) = CameraScreen::new(platform_services(live.clone(), gallery));
    let mut notices = screen.subscribe();

    let (sender, mut results) = mpsc::unbounded_channel();
    let dispatcher = Dispatcher { runtime, sender };
    dispatcher.spawn(task);

    let mut pipeline: Option<PreviewPipeline> = None;
    let mut retry_at = Instant::now();
    let mut view = FrameWidget::new(config.mirror_preview);
    let mut photo_view = PhotoCache::default();
    let mut notice: Option<Notification> = None;

    loop {
        while let Ok(message) = results.try_recv() {
            dispatcher.spawn(screen.update(message));
        }
        loop {
            match notices.try_recv() {
                Ok(notification) => notice = Some(notification),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "Notifications dropped");
                }
                Err(_) => break,
            }
        }

        // Camera lifecycle follows the permission
        let granted = screen.permission() == screen::PermissionState::Granted;
        if granted && pipeline.is_none() && Instant::now() >= retry_at {
            match PreviewPipeline::new(camera.as_ref(), live.clone()) {
                Ok(p) => pipeline = Some(p),
                Err(e) => {
                    error!(error = %e, "Failed to start camera");
                    retry_at = Instant::now() + timing::PREVIEW_RETRY_DELAY;
                }
            }
        }
        if let Some(err) = pipeline.as_ref().and_then(|p| p.poll_error()) {
            error!(error = %err, "Preview pipeline error");
            pipeline = None;
            live.clear();
            view.frame = None;
            retry_at = Instant::now() + timing::PREVIEW_RETRY_DELAY;
            dispatcher.spawn(screen.update(screen::Message::CameraLost));
        }
        if let Some(frame) = live.latest() {
            if !screen.state().camera_ready {
                dispatcher.spawn(screen.update(screen::Message::CameraReady));
            }
            view.frame = Some(frame);
        }

        let current = screen.screen();
        let shown = match (current, screen.photo()) {
            (Screen::Previewing, Some(photo)) => photo_view.get(photo),
            _ => view.frame.clone(),
        };
        let status = status_line(&screen, notice.as_ref());
        let placeholder = match current {
            Screen::AwaitingPermission => fl!("permission-loading"),
            Screen::PermissionDenied => fl!("permission-needed"),
            _ => fl!("camera-starting"),
        };
        let mirror = view.mirror && current == Screen::Capturing;

        terminal.draw(|f| {
            let area = f.area();
            let camera_area = Rect {
                x: area.x,
                y: area.y,
                width: area.width,
                height: area.height.saturating_sub(1),
            };
            let status_area = Rect {
                x: area.x,
                y: area.height.saturating_sub(1),
                width: area.width,
                height: 1,
            };

            let widget = FrameView {
                frame: if current == Screen::PermissionDenied {
                    None
                } else {
                    shown.as_deref()
                },
                mirror,
                placeholder: &placeholder,
            };
            f.render_widget(widget, camera_area);
            f.render_widget(StatusBar { message: &status }, status_area);
        })?;

        if event::poll(timing::FRAME_POLL)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            let action = key_action(current, key.code, key.modifiers);
            if action == Some(KeyAction::Quit) {
                break;
            }
            if notice.take().is_some() {
                continue;
            }
            if let Some(KeyAction::Screen(message)) = action {
                dispatcher.spawn(screen.update(message));
            }
        }
    }

    drop(pipeline);
    Ok(())
}

fn status_line(screen: &CameraScreen, notice: Option<&Notification>) -> String {
    if let Some(notice) = notice {
        let mut line = notice.text();
        if let Some(detail) = notice.detail() {
            line.push_str(": ");
            line.push_str(&detail);
        }
        line.push_str(" | ");
        line.push_str(&fl!("terminal-keys-notice"));
        return line;
    }

    match screen.screen() {
        Screen::AwaitingPermission => fl!("permission-loading"),
        Screen::PermissionDenied => fl!("terminal-keys-permission"),
        Screen::Capturing => fl!("terminal-keys-capture"),
        Screen::Previewing => match screen.operation_on_photo() {
            Some(Operation::Save) => fl!("saving"),
            Some(Operation::Effect) => fl!("processing"),
            None => fl!("terminal-keys-preview"),
        },
    }
}

/// Latest live frame
struct FrameWidget {
    frame: Option<Arc<CameraFrame>>,
    mirror: bool,
}

impl FrameWidget {
    fn new(mirror: bool) -> Self {
        Self {
            frame: None,
            mirror,
        }
    }
}

/// Decoded copy of the held photo, reloaded when the photo changes
#[derive(Default)]
struct PhotoCache {
    photo: Option<PhotoReference>,
    frame: Option<Arc<CameraFrame>>,
}

impl PhotoCache {
    fn get(&mut self, photo: &PhotoReference) -> Option<Arc<CameraFrame>> {
        if self.photo.as_ref() != Some(photo) {
            self.photo = Some(photo.clone());
            self.frame = match image::open(photo.as_path()) {
                Ok(image) => {
                    let rgba = image.to_rgba8();
                    let (width, height) = rgba.dimensions();
                    CameraFrame::from_rgba_strided(width, height, width as usize * 4, rgba.as_raw())
                        .map(Arc::new)
                }
                Err(e) => {
                    warn!(photo = %photo, error = %e, "Could not load photo for display");
                    None
                }
            };
        }
        self.frame.clone()
    }
}

/// Renders a frame using half-block characters
struct FrameView<'a> {
    frame: Option<&'a CameraFrame>,
    mirror: bool,
    placeholder: &'a str,
}

impl Widget for FrameView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(frame) = self.frame.filter(|f| f.width > 0 && f.height > 0) else {
            let x = area.x + (area.width.saturating_sub(self.placeholder.chars().count() as u16)) / 2;
            let y = area.y + area.height / 2;
            if y < area.y + area.height && x < area.x + area.width {
                buf.set_string(x, y, self.placeholder, ratatui::style::Style::default());
            }
            return;
        };

        // Each terminal cell displays 2 vertical pixels
        let (display_width, display_height) =
            fit_half_blocks(frame.width, frame.height, area.width, area.height);
        if display_width == 0 || display_height == 0 {
            return;
        }

        let x_offset = area.x + (area.width.saturating_sub(display_width)) / 2;
        let y_offset = area.y + (area.height.saturating_sub(display_height)) / 2;
        let x_scale = frame.width as f64 / display_width as f64;
        let y_scale = frame.height as f64 / (display_height * 2) as f64;

        for ty in 0..display_height {
            for tx in 0..display_width {
                let mut src_x = (tx as f64 * x_scale) as u32;
                if self.mirror {
                    src_x = frame.width.saturating_sub(1).saturating_sub(src_x);
                }
                let src_y_top = (ty as f64 * 2.0 * y_scale) as u32;
                let src_y_bottom = ((ty as f64 * 2.0 + 1.0) * y_scale) as u32;

                let (r, g, b) = frame.pixel(src_x, src_y_top);
                let top = Color::Rgb(r, g, b);
                let (r, g, b) = frame.pixel(src_x, src_y_bottom);
                let bottom = Color::Rgb(r, g, b);

                if let Some(cell) = buf.cell_mut((x_offset + tx, y_offset + ty)) {
                    cell.set_char('▀');
                    cell.set_fg(top);
                    cell.set_bg(bottom);
                }
            }
        }
    }
}

/// Size in cells that fits a `width`x`height` image into `cols`x`rows`
fn fit_half_blocks(width: u32, height: u32, cols: u16, rows: u16) -> (u16, u16) {
    let frame_aspect = width as f64 / height as f64;
    let term_width = cols as f64;
    let term_height = (rows as f64) * 2.0;

    if term_width / term_height > frame_aspect {
        let w = term_height * frame_aspect;
        ((w as u16).min(cols), rows)
    } else {
        let h = term_width / frame_aspect;
        (cols, ((h / 2.0) as u16).min(rows))
    }
}

/// Status bar widget
struct StatusBar<'a> {
    message: &'a str,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell_mut((x, area.y)) {
                cell.set_char(' ');
                cell.set_bg(Color::DarkGray);
            }
        }

        let text: String = self.message.chars().take(area.width as usize).collect();
        buf.set_string(
            area.x,
            area.y,
            text,
            ratatui::style::Style::default()
                .fg(Color::White)
                .bg(Color::DarkGray),
        );
    }
}
