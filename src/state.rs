use std::collections::HashMap;
use std::path::PathBuf;

use iced::task;
use iced_video_player::Video;

use crate::lightbox::Lightbox;
use crate::page::Page;
use crate::settings::Settings;
use crate::thumbs::Thumbnail;
use crate::trigger::Trigger;

/// Playback of the overlay's video element.
pub struct Playback {
    pub video: Video,
    pub position: f64,
    pub dragging: bool,
}

/// Application state: the loaded page, its triggers and the lightbox.
pub struct App {
    pub page: Option<Page>,
    pub page_path: Option<PathBuf>,
    // Bumped on every page load so a late activation for an old page is ignored
    pub page_generation: u64,
    pub triggers: Vec<Trigger>,
    pub active: bool,
    pub lightbox: Lightbox,
    pub playback: Option<Playback>,
    pub close_task: Option<task::Handle>,
    pub thumbnails: HashMap<String, Thumbnail>,
    pub grid_columns: usize,
    pub error: Option<String>,
    pub status: String,
}

impl Default for App {
    fn default() -> Self {
        let settings = Settings::default();
        App {
            page: None,
            page_path: None,
            page_generation: 0,
            triggers: Vec::new(),
            active: false,
            grid_columns: settings.grid_columns(),
            lightbox: Lightbox::new(settings),
            playback: None,
            close_task: None,
            thumbnails: HashMap::new(),
            error: None,
            status: "Open a gallery page to begin".to_string(),
        }
    }
}
