use iced::Task;
use iced_video_player::Video;
use std::path::PathBuf;

use crate::error::Result;
use crate::lightbox::Lightbox;
use crate::message::Message;
use crate::page::Page;
use crate::state::{App, Playback};

/// Load a page file and schedule its activation.
///
/// Triggers are not registered until the page's startup delay has elapsed.
pub fn load_page_from_path(app: &mut App, page_path: PathBuf) -> Task<Message> {
    app.status = "Loading page...".to_string();

    match Page::load(&page_path) {
        Ok(page) => {
            let settings = page.settings.clone();
            log::info!(
                "Page loaded: path={}, elements={}, startup_delay={}ms",
                page_path.display(),
                page.elements.len(),
                settings.startup_delay_ms
            );

            if let Some(handle) = app.close_task.take() {
                handle.abort();
            }
            app.page_generation += 1;
            app.triggers.clear();
            app.active = false;
            app.playback = None;
            app.thumbnails.clear();
            app.grid_columns = settings.grid_columns();
            app.lightbox = Lightbox::new(settings.clone());
            app.error = None;
            app.status = format!(
                "Page loaded: {}",
                page_path.file_name().unwrap_or_default().to_string_lossy()
            );
            app.page = Some(page);
            app.page_path = Some(page_path);

            let generation = app.page_generation;
            let delay = settings.startup_delay();
            Task::perform(async move { tokio::time::sleep(delay).await }, move |_| {
                Message::Activate(generation)
            })
        }
        Err(e) => {
            log::warn!("Failed to load page: {}", e);
            app.error = Some(e.to_string());
            Task::none()
        }
    }
}

/// Open `src` for playback, started immediately.
pub fn load_playback(page: &Page, src: &str) -> Result<Playback> {
    let url = page.resolve_url(src)?;
    let mut video = Video::new(&url)?;
    video.set_looping(false);
    video.set_paused(false);
    log::info!("Video loaded: src={}, url={}", src, url);
    Ok(Playback {
        video,
        position: 0.0,
        dragging: false,
    })
}
