//! Media classification.

/// Extensions played back as video. Everything else is shown as an image.
pub const VIDEO_EXTENSIONS: [&str; 3] = ["mp4", "webm", "ogv"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classify a source string by its trailing extension (ASCII case-insensitive).
    ///
    /// Only the very end of the string counts, so `clip.mp4?t=3` is an image.
    pub fn classify(src: &str) -> Self {
        let is_video = src
            .rsplit_once('.')
            .map(|(_, ext)| {
                VIDEO_EXTENSIONS
                    .iter()
                    .any(|video_ext| ext.eq_ignore_ascii_case(video_ext))
            })
            .unwrap_or(false);

        if is_video {
            MediaKind::Video
        } else {
            MediaKind::Image
        }
    }

    pub fn is_video(self) -> bool {
        self == MediaKind::Video
    }
}

/// The element currently displayed in the overlay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaElement {
    pub kind: MediaKind,
    pub src: String,
}

impl MediaElement {
    pub fn new(src: impl Into<String>) -> Self {
        let src = src.into();
        MediaElement {
            kind: MediaKind::classify(&src),
            src,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_extensions_are_case_insensitive() {
        assert_eq!(MediaKind::classify("clip.mp4"), MediaKind::Video);
        assert_eq!(MediaKind::classify("media/Clip.WEBM"), MediaKind::Video);
        assert_eq!(MediaKind::classify("old.OgV"), MediaKind::Video);
    }

    #[test]
    fn everything_else_is_an_image() {
        assert_eq!(MediaKind::classify("photo.jpg"), MediaKind::Image);
        assert_eq!(MediaKind::classify("sound.ogg"), MediaKind::Image);
        assert_eq!(MediaKind::classify("clip.mp4?t=3"), MediaKind::Image);
        assert_eq!(MediaKind::classify("dir.mp4/photo"), MediaKind::Image);
        assert_eq!(MediaKind::classify("mp4"), MediaKind::Image);
        assert_eq!(MediaKind::classify(""), MediaKind::Image);
    }

    #[test]
    fn element_kind_follows_source() {
        let element = MediaElement::new("https://example.com/a.webm");
        assert!(element.kind.is_video());
        assert_eq!(element.src, "https://example.com/a.webm");
    }
}
