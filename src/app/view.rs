// SPDX-License-Identifier: GPL-3.0-only

//! Main application view
//!
//! One layout per [`Screen`]: permission prompt, live view with the capture
//! button, or the captured photo with back/save/effect. A notification
//! banner sits above whichever layout is active.

use crate::app::state::{AppModel, Message};
use crate::constants::ui;
use crate::fl;
use crate::screen::{self, NoticeKind, Operation, Screen};
use cosmic::Element;
use cosmic::iced::{Alignment, Background, Color, ContentFit, Length};
use cosmic::widget::{self, image::Handle};

impl AppModel {
    /// Build the main application view
    pub fn view(&self) -> Element<'_, Message> {
        let body = match self.screen.screen() {
            Screen::AwaitingPermission => centered(widget::text::body(fl!("permission-loading"))),
            Screen::PermissionDenied => self.build_permission_prompt(),
            Screen::Capturing => self.build_live_view(),
            Screen::Previewing => self.build_photo_preview(),
        };

        let mut column = widget::column().width(Length::Fill).height(Length::Fill);
        if let Some(banner) = self.build_notice_banner() {
            column = column.push(banner);
        }
        column.push(body).into()
    }

    fn build_permission_prompt(&self) -> Element<'_, Message> {
        let spacing = cosmic::theme::spacing();
        let content = widget::column()
            .push(widget::text::title3(fl!("permission-needed")))
            .push(
                widget::button::suggested(fl!("permission-grant"))
                    .on_press(Message::Screen(screen::Message::RequestPermission)),
            )
            .spacing(spacing.space_m)
            .align_x(Alignment::Center);
        centered(content)
    }

    fn build_live_view(&self) -> Element<'_, Message> {
        let preview: Element<'_, Message> = match &self.preview {
            Some(handle) if self.screen.state().camera_ready => {
                widget::image::Image::new(handle.clone())
                    .content_fit(ContentFit::Contain)
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .into()
            }
            _ => centered(widget::text::body(fl!("camera-starting"))),
        };

        widget::column()
            .push(
                widget::container(preview)
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .style(|_theme| widget::container::Style {
                        background: Some(Background::Color(Color::BLACK)),
                        ..Default::default()
                    }),
            )
            .push(self.build_capture_button())
            .into()
    }

    /// Round white shutter button; grey and inert until the camera is ready
    fn build_capture_button(&self) -> Element<'_, Message> {
        let spacing = cosmic::theme::spacing();
        let state = self.screen.state();
        let enabled = state.camera_ready && !state.capturing;

        let color = if enabled {
            Color::WHITE
        } else {
            Color::from_rgba(0.5, 0.5, 0.5, 0.3)
        };
        let (inner_size, outer_size) = if state.capturing {
            (ui::CAPTURE_BUTTON_INNER * 0.85, ui::CAPTURE_BUTTON_OUTER * 0.85)
        } else {
            (ui::CAPTURE_BUTTON_INNER, ui::CAPTURE_BUTTON_OUTER)
        };

        let inner = widget::container(widget::Space::new(
            Length::Fixed(inner_size),
            Length::Fixed(inner_size),
        ))
        .style(move |_theme| widget::container::Style {
            background: Some(Background::Color(color)),
            border: cosmic::iced::Border {
                radius: [ui::CAPTURE_BUTTON_RADIUS * (inner_size / ui::CAPTURE_BUTTON_INNER); 4]
                    .into(),
                ..Default::default()
            },
            ..Default::default()
        });

        let button = widget::button::custom(inner)
            .on_press_maybe(enabled.then_some(Message::Screen(screen::Message::Capture)))
            .padding(0)
            .width(Length::Fixed(outer_size))
            .height(Length::Fixed(outer_size));

        let wrapper = widget::container(button)
            .width(Length::Fixed(ui::CAPTURE_BUTTON_OUTER))
            .height(Length::Fixed(ui::CAPTURE_BUTTON_OUTER))
            .center_x(ui::CAPTURE_BUTTON_OUTER)
            .center_y(ui::CAPTURE_BUTTON_OUTER);

        widget::container(wrapper)
            .width(Length::Fill)
            .center_x(Length::Fill)
            .padding([spacing.space_xs, 0])
            .into()
    }

    fn build_photo_preview(&self) -> Element<'_, Message> {
        let spacing = cosmic::theme::spacing();
        let Some(photo) = self.screen.photo() else {
            return centered(widget::text::body(fl!("camera-starting")));
        };

        let image = widget::image::Image::new(Handle::from_path(photo.as_path()))
            .content_fit(ContentFit::Contain)
            .width(Length::Fill)
            .height(Length::FillPortion(ui::PREVIEW_HEIGHT_PORTION));

        // Buttons stay disabled while any operation runs; labels only
        // describe one started on this photo
        let running = self.screen.operation_on_photo();
        let idle = !self.screen.is_processing();
        let save_label = if running == Some(Operation::Save) {
            fl!("saving")
        } else {
            fl!("save")
        };
        let effect_label = if running == Some(Operation::Effect) {
            fl!("processing")
        } else {
            fl!("effect")
        };

        let actions = widget::row()
            .push(
                widget::button::standard(fl!("back"))
                    .on_press(Message::Screen(screen::Message::Back)),
            )
            .push(
                widget::button::suggested(save_label)
                    .on_press_maybe(idle.then_some(Message::Screen(screen::Message::Save))),
            )
            .push(
                widget::button::standard(effect_label)
                    .on_press_maybe(idle.then_some(Message::Screen(screen::Message::ApplyEffect))),
            )
            .spacing(spacing.space_s)
            .align_y(Alignment::Center);

        widget::column()
            .push(image)
            .push(
                widget::container(actions)
                    .width(Length::Fill)
                    .height(Length::FillPortion(1))
                    .center_x(Length::Fill)
                    .center_y(Length::Fill),
            )
            .into()
    }

    fn build_notice_banner(&self) -> Option<Element<'_, Message>> {
        let notice = self.notice.as_ref()?;
        let spacing = cosmic::theme::spacing();

        let mut text = widget::column().push(widget::text::heading(notice.text()));
        if let Some(detail) = notice.detail() {
            text = text.push(widget::text::caption(detail));
        }

        let icon = match notice.kind() {
            NoticeKind::Success => "emblem-ok-symbolic",
            NoticeKind::Failure => "dialog-error-symbolic",
        };

        let row = widget::row()
            .push(widget::icon::from_name(icon).size(20))
            .push(text.width(Length::Fill))
            .push(widget::button::text(fl!("dismiss")).on_press(Message::DismissNotice))
            .spacing(spacing.space_s)
            .align_y(Alignment::Center);

        Some(
            widget::container(row)
                .padding(spacing.space_s)
                .width(Length::Fill)
                .class(cosmic::theme::Container::Card)
                .into(),
        )
    }
}

fn centered<'a>(content: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    widget::container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}
