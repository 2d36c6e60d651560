use std::path::PathBuf;

use thiserror::Error;

use crate::trigger::GroupKey;

/// Errors produced by page loading and the lightbox controller.
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read page {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed page {path}: {source}")]
    Page {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// No media element is on screen.
    #[error("lightbox is not open")]
    NotOpen,

    #[error("lightbox is already closing")]
    Closing,

    #[error("index {index} out of range for a group of {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("group {0} has no media")]
    EmptyGroup(GroupKey),

    #[error("no trigger with id {0}")]
    UnknownTrigger(usize),

    #[error("invalid media location: {0}")]
    InvalidUrl(String),

    #[error("video error: {0}")]
    Video(#[from] iced_video_player::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
