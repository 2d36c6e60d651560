use iced::widget::text::Shaping;
use iced::widget::{
    button, center, column, container, image, mouse_area, row, slider, stack, text,
};
use iced::{alignment, Border, Color, ContentFit, Element, Length, Theme};
use iced_video_player::{Video, VideoPlayer};

use crate::lightbox::{Direction, Session};
use crate::message::Message;
use crate::page::{Page, PageElement};
use crate::state::{App, Playback};
use crate::thumbs::Thumbnail;
use crate::trigger::TriggerConfig;

const STRIP_THUMB_SIZE: f32 = 64.0;

/// Get the safe duration of a video, handling invalid values.
pub fn safe_duration(video: &Video) -> f64 {
    let duration = video.duration().as_secs_f64();
    if duration.is_finite() && duration > 0.0 {
        duration
    } else {
        1.0 // Default to 1 second if invalid (prevents slider from breaking)
    }
}

/// Backdrop opacity for each presentation state of the overlay.
pub fn backdrop_alpha(visible: bool, hidden: bool) -> f32 {
    match (visible, hidden) {
        (true, _) => 0.92,
        (false, false) => 0.5,
        (false, true) => 0.2,
    }
}

/// Media opacity: hidden until the fade-in tick marks it shown.
pub fn media_opacity(shown: bool) -> f32 {
    if shown { 1.0 } else { 0.0 }
}

/// Render the main view.
pub fn render_main_view(app: &App) -> Element<'_, Message> {
    // Error state
    if let Some(error) = &app.error {
        return center(column![
            text("Error Loading Page").size(32),
            text(error.clone()),
            text("").size(10),
            button(text("[Browse]").size(14))
                .on_press(Message::BrowsePage)
                .padding(5),
        ])
        .width(Length::Fill)
        .height(Length::Fill)
        .into();
    }

    let Some(page) = &app.page else {
        return center(
            column![
                text("Drop a Gallery Page Here").size(48),
                text("or click browse to open a page file").size(16),
                button(text("[Browse Files]").size(18))
                    .padding(10)
                    .on_press(Message::BrowsePage),
                text("").size(10),
                text(app.status.clone()).size(12),
            ]
            .spacing(20),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .into();
    };

    let page_view: Element<'_, Message> = column![
        text(page.display_title()).size(28),
        render_page_grid(app, page),
        render_controls_bar(app),
    ]
    .spacing(10)
    .padding(10)
    .width(Length::Fill)
    .height(Length::Fill)
    .into();

    let overlay = app.lightbox.overlay();
    match app.lightbox.session() {
        Some(session) if overlay.displayed => {
            stack![page_view, render_overlay(app, page, session)].into()
        }
        _ => page_view,
    }
}

/// Lay the page's elements out in rows of `grid_columns`.
fn render_page_grid<'a>(app: &'a App, page: &'a Page) -> Element<'a, Message> {
    let mut rows: Vec<Element<'a, Message>> = Vec::new();

    let cells: Vec<(usize, &PageElement)> = page.elements.iter().enumerate().collect();
    for chunk in cells.chunks(app.grid_columns) {
        let row_content: Vec<Element<'a, Message>> = chunk
            .iter()
            .map(|(index, element)| create_element_cell(app, *index, element))
            .collect();

        rows.push(
            row(row_content)
                .spacing(5)
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
        );
    }

    column(rows)
        .spacing(5)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// Create a page cell: a trigger card, or plain text for unmarked elements.
fn create_element_cell<'a>(
    app: &'a App,
    index: usize,
    element: &'a PageElement,
) -> Element<'a, Message> {
    let label = element.text.clone().unwrap_or_default();

    let Some(config) = TriggerConfig::from_element(element) else {
        return container(text(label).size(14))
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into();
    };

    // Only registered triggers respond to clicks
    let on_press = app
        .triggers
        .iter()
        .find(|t| t.element == index)
        .filter(|_| app.active)
        .map(|t| Message::TriggerPressed(t.id));

    let preview: Element<'a, Message> = match app.thumbnails.get(config.group_entry()) {
        Some(Thumbnail::Ready(handle)) => image(handle.clone())
            .content_fit(ContentFit::Contain)
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
        _ => center(text(config.source.clone()).size(12)).into(),
    };

    button(
        column![preview, text(label).size(14)]
            .spacing(4)
            .align_x(alignment::Horizontal::Center),
    )
    .on_press_maybe(on_press)
    .padding(5)
    .width(Length::Fill)
    .height(Length::Fill)
    .into()
}

/// Build the full-window overlay for the open session.
fn render_overlay<'a>(app: &'a App, page: &'a Page, session: &'a Session) -> Element<'a, Message> {
    let overlay = app.lightbox.overlay();
    let alpha = backdrop_alpha(overlay.visible, overlay.hidden);

    // Anything not capturing the click falls through to the backdrop and closes
    let backdrop = mouse_area(
        container("")
            .width(Length::Fill)
            .height(Length::Fill)
            .style(move |_theme: &Theme| container::Style {
                background: Some(Color::from_rgba(0.0, 0.0, 0.0, alpha).into()),
                ..Default::default()
            }),
    )
    .on_press(Message::CloseOverlay);

    let top_bar = row![
        text(session.counter_text())
            .size(16)
            .shaping(Shaping::Basic)
            .color(Color::WHITE),
        container("").width(Length::Fill),
        button(text("X").size(20))
            .on_press(Message::CloseOverlay)
            .padding(5)
            .width(Length::Shrink)
            .height(Length::Shrink)
    ]
    .align_y(alignment::Vertical::Center)
    .padding(10);

    let content = container(mouse_area(render_media(app, page, session)).on_press(Message::MediaPressed))
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill);

    let middle = row![
        button(text("<").size(24))
            .on_press(Message::Navigate(Direction::Previous))
            .padding(10),
        content,
        button(text(">").size(24))
            .on_press(Message::Navigate(Direction::Next))
            .padding(10),
    ]
    .spacing(10)
    .align_y(alignment::Vertical::Center)
    .height(Length::Fill);

    let layout = column![top_bar, middle, render_thumbnail_strip(app, session)]
        .spacing(10)
        .padding(10)
        .width(Length::Fill)
        .height(Length::Fill);

    stack![backdrop, layout].into()
}

/// Render the media element, or a notice when a video could not be started.
fn render_media<'a>(app: &'a App, page: &'a Page, session: &'a Session) -> Element<'a, Message> {
    if session.media.kind.is_video() {
        return match &app.playback {
            // The player can't be made translucent, so it stays out until shown
            Some(_) if !session.media_shown => container("")
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            Some(playback) => render_video(playback),
            None => text(format!("Unable to play {}", session.media.src))
                .color(Color::WHITE)
                .into(),
        };
    }

    image(image::Handle::from_path(page.resolve_path(&session.media.src)))
        .content_fit(ContentFit::Contain)
        .opacity(media_opacity(session.media_shown))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// Render a video with its playback controls.
fn render_video(playback: &Playback) -> Element<'_, Message> {
    let player = container(
        VideoPlayer::new(&playback.video)
            .on_end_of_stream(Message::EndOfStream)
            .on_new_frame(Message::NewFrame),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .center_x(Length::Fill)
    .center_y(Length::Fill);

    let controls = column![
        // Seek slider
        slider(
            0.0..=safe_duration(&playback.video),
            playback.position,
            Message::Seek
        )
        .step(0.1)
        .on_release(Message::SeekRelease),
        // Control buttons
        row![
            button(text(if playback.video.paused() { ">" } else { "||" }).size(12))
                .on_press(Message::TogglePause)
                .padding(8)
                .width(Length::Shrink)
                .height(Length::Shrink),
            button(text(if playback.video.muted() { "M" } else { "~" }).size(12))
                .on_press(Message::ToggleMute)
                .padding(8)
                .width(Length::Shrink)
                .height(Length::Shrink),
            text(format!(
                "{}:{:02}",
                playback.position as u64 / 60,
                playback.position as u64 % 60
            ))
            .size(12)
            .color(Color::WHITE)
        ]
        .spacing(5)
        .align_y(alignment::Vertical::Center)
        .width(Length::Shrink)
    ]
    .spacing(5)
    .padding(10);

    column![player, controls]
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// Render one clickable thumbnail per group entry.
fn render_thumbnail_strip<'a>(app: &'a App, session: &'a Session) -> Element<'a, Message> {
    let thumbs: Vec<Element<'a, Message>> = session
        .thumbnails()
        .map(|(index, src)| {
            let active = session.is_active_thumbnail(index);
            let hovered = session.hovered == Some(index);

            let preview: Element<'a, Message> = match app.thumbnails.get(src) {
                Some(Thumbnail::Ready(handle)) => image(handle.clone())
                    .content_fit(ContentFit::Cover)
                    .width(Length::Fixed(STRIP_THUMB_SIZE))
                    .height(Length::Fixed(STRIP_THUMB_SIZE))
                    .into(),
                Some(Thumbnail::Pending) => center(text("...").size(12))
                    .width(Length::Fixed(STRIP_THUMB_SIZE))
                    .height(Length::Fixed(STRIP_THUMB_SIZE))
                    .into(),
                _ => center(text(format!("{}", index + 1)).size(14).color(Color::WHITE))
                    .width(Length::Fixed(STRIP_THUMB_SIZE))
                    .height(Length::Fixed(STRIP_THUMB_SIZE))
                    .into(),
            };

            let framed = container(preview).padding(2).style(move |_theme: &Theme| {
                let (color, width) = if active {
                    (Color::WHITE, 3.0)
                } else if hovered {
                    (Color::from_rgba(1.0, 1.0, 1.0, 0.6), 2.0)
                } else {
                    (Color::TRANSPARENT, 0.0)
                };
                container::Style {
                    border: Border {
                        color,
                        width,
                        radius: 4.0.into(),
                    },
                    ..Default::default()
                }
            });

            mouse_area(
                button(framed)
                    .on_press(Message::ThumbnailPressed(index))
                    .padding(0)
                    .style(button::text),
            )
            .on_enter(Message::ThumbnailHovered(index, true))
            .on_exit(Message::ThumbnailHovered(index, false))
            .into()
        })
        .collect();

    container(row(thumbs).spacing(6))
        .width(Length::Fill)
        .center_x(Length::Fill)
        .padding(5)
        .into()
}

/// Render the bottom control bar.
fn render_controls_bar(app: &App) -> Element<'_, Message> {
    container(
        row![
            button(text("<").size(16))
                .on_press(Message::DecreaseColumns)
                .padding(5),
            text(format!("Grid: {} columns", app.grid_columns)).size(14),
            button(text(">").size(16))
                .on_press(Message::IncreaseColumns)
                .padding(5),
            container("").width(Length::Fill),
            button(text("[Browse]").size(14))
                .on_press(Message::BrowsePage)
                .padding(5),
            button(text("[Rescan]").size(12))
                .on_press_maybe(app.active.then_some(Message::Rescan))
                .padding(5),
            text(app.status.clone()).size(12),
        ]
        .spacing(10)
        .align_y(alignment::Vertical::Center),
    )
    .padding(5)
    .width(Length::Fill)
    .into()
}
