//! Thumbnail decoding for trigger cards and the overlay strip.

use std::path::Path;

use iced::widget::image::Handle;

use crate::media::MediaKind;

#[derive(Clone, Debug)]
pub enum Thumbnail {
    Pending,
    Ready(Handle),
    /// Videos, remote sources and files that failed to decode.
    Unavailable,
}

/// Whether `src` can be decoded locally into a thumbnail.
pub fn is_decodable(src: &str) -> bool {
    if MediaKind::classify(src).is_video() {
        return false;
    }
    !matches!(url::Url::parse(src), Ok(url) if url.scheme().len() > 1)
}

/// Decode `path` into a handle that fits a `size` x `size` box.
pub fn decode(path: &Path, size: u32) -> Result<Handle, String> {
    let thumbnail = decode_rgba(path, size)?;
    let (width, height) = thumbnail.dimensions();
    Ok(Handle::from_rgba(width, height, thumbnail.into_raw()))
}

fn decode_rgba(path: &Path, size: u32) -> Result<image::RgbaImage, String> {
    let decoded = image::open(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    Ok(decoded.thumbnail(size, size).to_rgba8())
}
