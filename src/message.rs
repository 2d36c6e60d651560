use iced::Event;
use iced::widget::image;

use crate::lightbox::Direction;
use crate::transition::{CloseStage, Ticket};

#[derive(Clone, Debug)]
pub enum Message {
    BrowsePage,
    Rescan,
    EventOccurred(Event),
    Activate(u64), // page generation
    TriggerPressed(usize),
    Navigate(Direction),
    ThumbnailPressed(usize),
    ThumbnailHovered(usize, bool),
    ThumbnailLoaded(String, Result<image::Handle, String>),
    CloseOverlay,
    MediaPressed,
    MediaShown(Ticket),
    CloseStage(Ticket, CloseStage),
    TogglePause,
    ToggleMute,
    Seek(f64),
    SeekRelease,
    EndOfStream,
    NewFrame,
    IncreaseColumns,
    DecreaseColumns,
}
