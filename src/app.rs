use iced::event;
use iced::keyboard::key::Named;
use iced::{Element, Subscription, Task};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::Error;
use crate::lightbox::{Direction, Navigation};
use crate::loader;
use crate::message::Message;
use crate::settings::{MAX_GRID_COLUMNS, MIN_GRID_COLUMNS};
use crate::state::App;
use crate::thumbs::{self, Thumbnail};
use crate::transition::CloseStage;
use crate::trigger;
use crate::ui;

/// Map a key press to the message it stands for.
fn shortcut(key: Named, overlay_open: bool) -> Option<Message> {
    match key {
        Named::Escape => Some(Message::CloseOverlay),
        Named::ArrowRight if overlay_open => Some(Message::Navigate(Direction::Next)),
        Named::ArrowLeft if overlay_open => Some(Message::Navigate(Direction::Previous)),
        _ => None,
    }
}

impl App {
    /// Build the initial state, loading `page_path` when one was given.
    pub fn new(page_path: Option<PathBuf>) -> (Self, Task<Message>) {
        let mut app = App::default();
        let task = match page_path {
            Some(path) => loader::load_page_from_path(&mut app, path),
            None => Task::none(),
        };
        (app, task)
    }

    pub fn title(&self) -> String {
        match &self.page {
            Some(page) => format!("{} - gallerypop", page.display_title()),
            None => "gallerypop".to_string(),
        }
    }

    /// Handle UI messages and state updates.
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::BrowsePage => {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Gallery page", &["json", "JSON"])
                    .pick_file()
                {
                    return loader::load_page_from_path(self, path);
                }
                Task::none()
            }
            Message::Rescan => self.rescan(),
            Message::EventOccurred(event) => match event {
                iced::Event::Window(iced::window::Event::FileDropped(path)) => {
                    loader::load_page_from_path(self, path)
                }
                iced::Event::Keyboard(iced::keyboard::Event::KeyPressed {
                    key: iced::keyboard::Key::Named(key),
                    ..
                }) => match shortcut(key, self.lightbox.is_open()) {
                    Some(message) => self.update(message),
                    None => Task::none(),
                },
                _ => Task::none(),
            },
            Message::Activate(generation) => {
                if generation != self.page_generation {
                    return Task::none();
                }
                self.activate()
            }
            Message::TriggerPressed(id) => self.open_trigger(id),
            Message::Navigate(direction) => self.navigate(direction),
            Message::ThumbnailPressed(index) => {
                let result = self.lightbox.jump(index);
                self.after_navigation(result)
            }
            Message::ThumbnailHovered(index, hovered) => {
                self.lightbox.hover_thumbnail(index, hovered);
                Task::none()
            }
            Message::ThumbnailLoaded(src, result) => {
                let thumbnail = match result {
                    Ok(handle) => Thumbnail::Ready(handle),
                    Err(e) => {
                        log::warn!("Thumbnail unavailable: {}", e);
                        Thumbnail::Unavailable
                    }
                };
                self.thumbnails.insert(src, thumbnail);
                Task::none()
            }
            Message::CloseOverlay => self.close_overlay(),
            // Clicks on the media itself never dismiss the overlay
            Message::MediaPressed => Task::none(),
            Message::MediaShown(ticket) => {
                self.lightbox.show_media(ticket);
                Task::none()
            }
            Message::CloseStage(ticket, stage) => {
                if self.lightbox.apply_close_stage(ticket, stage) && stage == CloseStage::Teardown {
                    self.playback = None;
                    self.close_task = None;
                    self.status = "Overlay closed".to_string();
                }
                Task::none()
            }
            Message::TogglePause => {
                if let Some(playback) = self.playback.as_mut() {
                    playback.video.set_paused(!playback.video.paused());
                }
                Task::none()
            }
            Message::ToggleMute => {
                if let Some(playback) = self.playback.as_mut() {
                    let muted = playback.video.muted();
                    playback.video.set_muted(!muted);
                }
                Task::none()
            }
            Message::Seek(secs) => {
                if let Some(playback) = self.playback.as_mut() {
                    // Validate secs is a valid number
                    if secs.is_finite() && secs >= 0.0 {
                        playback.dragging = true;
                        playback.video.set_paused(true);
                        playback.position = secs;
                    }
                }
                Task::none()
            }
            Message::SeekRelease => {
                if let Some(playback) = self.playback.as_mut() {
                    playback.dragging = false;
                    if playback.position.is_finite() && playback.position >= 0.0 {
                        if let Err(e) = playback
                            .video
                            .seek(Duration::from_secs_f64(playback.position), true)
                        {
                            log::warn!("Seek failed: {}", e);
                        }
                    }
                    playback.video.set_paused(false);
                }
                Task::none()
            }
            Message::EndOfStream => {
                if let Some(playback) = self.playback.as_mut() {
                    playback.video.set_paused(true);
                }
                Task::none()
            }
            Message::NewFrame => {
                if let Some(playback) = self.playback.as_mut() {
                    if !playback.dragging {
                        let pos = playback.video.position().as_secs_f64();
                        // Only update position if it's a valid number
                        if pos.is_finite() && pos >= 0.0 {
                            playback.position = pos;
                        }
                    }
                }
                Task::none()
            }
            Message::IncreaseColumns => {
                if self.grid_columns < MAX_GRID_COLUMNS {
                    self.grid_columns += 1;
                }
                Task::none()
            }
            Message::DecreaseColumns => {
                if self.grid_columns > MIN_GRID_COLUMNS {
                    self.grid_columns -= 1;
                }
                Task::none()
            }
        }
    }

    /// Subscribe to events.
    pub fn subscription(&self) -> Subscription<Message> {
        event::listen().map(Message::EventOccurred)
    }

    /// Render the view.
    pub fn view(&self) -> Element<'_, Message> {
        ui::render_main_view(self)
    }

    /// Register the page's triggers.
    fn activate(&mut self) -> Task<Message> {
        let Some(page) = self.page.as_ref() else {
            return Task::none();
        };
        self.triggers = trigger::scan(page);
        self.active = true;

        let groups: HashSet<_> = self.triggers.iter().map(|t| &t.config.group).collect();
        log::info!(
            "Activated {} triggers in {} groups",
            self.triggers.len(),
            groups.len()
        );
        self.status = format!(
            "{} trigger{} in {} group{}",
            self.triggers.len(),
            if self.triggers.len() == 1 { "" } else { "s" },
            groups.len(),
            if groups.len() == 1 { "" } else { "s" }
        );

        let entries: Vec<String> = self
            .triggers
            .iter()
            .map(|t| t.config.group_entry().to_string())
            .collect();
        self.request_thumbnails(entries)
    }

    /// Re-read the page file and pick up triggers added since the last scan.
    ///
    /// Groups already resolved keep their entries.
    fn rescan(&mut self) -> Task<Message> {
        if !self.active {
            return Task::none();
        }
        let Some(path) = self.page_path.clone() else {
            return Task::none();
        };
        match crate::page::Page::load(&path) {
            Ok(page) => {
                self.page = Some(page);
                self.activate()
            }
            Err(e) => {
                log::warn!("Rescan failed: {}", e);
                self.status = format!("Rescan failed: {}", e);
                Task::none()
            }
        }
    }

    fn open_trigger(&mut self, id: usize) -> Task<Message> {
        if !self.active {
            return Task::none();
        }
        let Some(trigger) = self.triggers.get(id) else {
            log::warn!("{}", Error::UnknownTrigger(id));
            return Task::none();
        };

        if let Some(handle) = self.close_task.take() {
            handle.abort();
        }

        match self.lightbox.open(trigger, &self.triggers) {
            Ok(ticket) => {
                self.sync_playback();
                let delay = self.lightbox.settings().fade_in_delay();
                let fade_in = Task::perform(
                    async move { tokio::time::sleep(delay).await },
                    move |_| Message::MediaShown(ticket),
                );
                let entries: Vec<String> = self
                    .lightbox
                    .session()
                    .map(|session| session.entries.iter().cloned().collect())
                    .unwrap_or_default();
                Task::batch([fade_in, self.request_thumbnails(entries)])
            }
            Err(e) => {
                log::warn!("Failed to open trigger {}: {}", id, e);
                Task::none()
            }
        }
    }

    fn navigate(&mut self, direction: Direction) -> Task<Message> {
        let result = self.lightbox.step(direction);
        self.after_navigation(result)
    }

    fn after_navigation(&mut self, result: crate::error::Result<Navigation>) -> Task<Message> {
        match result {
            Ok(navigation) => {
                if navigation.source_changed || navigation.recreated {
                    self.sync_playback();
                }
            }
            Err(e) => log::debug!("Navigation ignored: {}", e),
        }
        Task::none()
    }

    fn close_overlay(&mut self) -> Task<Message> {
        match self.lightbox.close() {
            Ok(schedule) => {
                let (task, handle) = Task::run(schedule.into_stream(), |(ticket, stage)| {
                    Message::CloseStage(ticket, stage)
                })
                .abortable();
                self.close_task = Some(handle);
                task
            }
            Err(e) => {
                log::debug!("Close ignored: {}", e);
                Task::none()
            }
        }
    }

    /// Make the playback match the session's media element.
    fn sync_playback(&mut self) {
        let (Some(session), Some(page)) = (self.lightbox.session(), self.page.as_ref()) else {
            self.playback = None;
            return;
        };
        if !session.media.kind.is_video() {
            self.playback = None;
            return;
        }

        // Drop the old pipeline before building the next one
        self.playback = None;
        match loader::load_playback(page, &session.media.src) {
            Ok(playback) => self.playback = Some(playback),
            Err(e) => {
                log::warn!("Failed to play {}: {}", session.media.src, e);
                self.status = format!("Failed to play {}", session.media.src);
            }
        }
    }

    fn request_thumbnails(&mut self, sources: Vec<String>) -> Task<Message> {
        let size = self.lightbox.settings().thumbnail_size;
        let mut tasks = Vec::new();

        for src in sources {
            if self.thumbnails.contains_key(&src) {
                continue;
            }
            if !thumbs::is_decodable(&src) {
                self.thumbnails.insert(src, Thumbnail::Unavailable);
                continue;
            }
            let Some(page) = self.page.as_ref() else {
                break;
            };
            let path = page.resolve_path(&src);
            self.thumbnails.insert(src.clone(), Thumbnail::Pending);
            tasks.push(Task::perform(
                async move {
                    tokio::task::spawn_blocking(move || thumbs::decode(&path, size))
                        .await
                        .unwrap_or_else(|e| Err(format!("thumbnail task failed: {}", e)))
                },
                move |result| Message::ThumbnailLoaded(src.clone(), result),
            ));
        }

        Task::batch(tasks)
    }
}
