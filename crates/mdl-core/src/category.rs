//! Extension-based media classification.
//!
//! The category of an asset is derived purely from the extension of the last
//! URL path segment. Extensionless URLs are rejected even when the server would
//! serve media for them.

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::url_model::extension_from_url;

pub const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "svg", "avif", "tiff", "tif", "bmp", "ico",
];
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "webm", "ogv", "mov", "avi", "wmv", "flv", "mkv", "mpg", "mpeg", "m4v",
];
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "aac", "flac", "m4a", "wma", "opus"];

/// Media category of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Image,
    Video,
    Audio,
    Rejected,
}

impl Category {
    /// Categories that are downloaded, in output order.
    pub const MEDIA: [Category; 3] = [Category::Image, Category::Video, Category::Audio];

    /// Classify a bare extension (case-insensitive, without the dot).
    pub fn from_extension(ext: &str) -> Self {
        let ext = ext.to_ascii_lowercase();
        let ext = ext.as_str();
        if IMAGE_EXTENSIONS.contains(&ext) {
            Category::Image
        } else if VIDEO_EXTENSIONS.contains(&ext) {
            Category::Video
        } else if AUDIO_EXTENSIONS.contains(&ext) {
            Category::Audio
        } else {
            Category::Rejected
        }
    }

    /// Classify a normalized URL by the extension of its last path segment.
    pub fn from_url(url: &Url) -> Self {
        extension_from_url(url)
            .map(|ext| Self::from_extension(&ext))
            .unwrap_or(Category::Rejected)
    }

    /// Output subdirectory for this category; `None` for `Rejected`.
    pub fn dir_name(self) -> Option<&'static str> {
        match self {
            Category::Image => Some("images"),
            Category::Video => Some("videos"),
            Category::Audio => Some("audio"),
            Category::Rejected => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Image => "image",
            Category::Video => "video",
            Category::Audio => "audio",
            Category::Rejected => "rejected",
        }
    }

    pub fn is_media(self) -> bool {
        self != Category::Rejected
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a URL string; unparseable URLs are rejected.
pub fn classify(url: &str) -> Category {
    Url::parse(url)
        .map(|u| Category::from_url(&u))
        .unwrap_or(Category::Rejected)
}

/// Every recognized media extension, image first then video then audio.
pub fn all_media_extensions() -> impl Iterator<Item = &'static str> {
    IMAGE_EXTENSIONS
        .iter()
        .chain(VIDEO_EXTENSIONS)
        .chain(AUDIO_EXTENSIONS)
        .copied()
}
