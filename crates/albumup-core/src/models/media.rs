use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Broad kind of a supported media file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Photo,
    Video,
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Photo => write!(f, "photo"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

/// Extensions accepted by the photo library, with their MIME types.
const PHOTO_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("heic", "image/heic"),
    ("heif", "image/heif"),
    ("webp", "image/webp"),
    ("bmp", "image/bmp"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("ico", "image/x-icon"),
    ("avif", "image/avif"),
    ("cr2", "image/x-canon-cr2"),
    ("nef", "image/x-nikon-nef"),
    ("arw", "image/x-sony-arw"),
    ("dng", "image/x-adobe-dng"),
];

const VIDEO_TYPES: &[(&str, &str)] = &[
    ("mp4", "video/mp4"),
    ("m4v", "video/x-m4v"),
    ("mov", "video/quicktime"),
    ("avi", "video/x-msvideo"),
    ("3gp", "video/3gpp"),
    ("3g2", "video/3gpp2"),
    ("mkv", "video/x-matroska"),
    ("mpg", "video/mpeg"),
    ("mpeg", "video/mpeg"),
    ("mts", "video/mp2t"),
    ("m2ts", "video/mp2t"),
    ("wmv", "video/x-ms-wmv"),
    ("asf", "video/x-ms-asf"),
];

impl MediaKind {
    /// Classify a file extension (case-insensitive, without the dot).
    /// Returns the kind and the MIME type sent with the upload.
    pub fn from_extension(ext: &str) -> Option<(MediaKind, &'static str)> {
        let ext = ext.to_lowercase();
        if let Some((_, mime)) = PHOTO_TYPES.iter().find(|(e, _)| *e == ext) {
            return Some((MediaKind::Photo, mime));
        }
        VIDEO_TYPES
            .iter()
            .find(|(e, _)| *e == ext)
            .map(|(_, mime)| (MediaKind::Video, *mime))
    }
}

/// A local file considered for upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaCandidate {
    pub path: PathBuf,
    /// Dedup identifier: the file name, compared case-sensitively against
    /// the names of items already in the remote album.
    pub file_name: String,
    pub kind: MediaKind,
    pub mime_type: String,
}

impl MediaCandidate {
    pub fn identifier(&self) -> &str {
        &self.file_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_extensions() {
        assert_eq!(
            MediaKind::from_extension("JPG"),
            Some((MediaKind::Photo, "image/jpeg"))
        );
        assert_eq!(
            MediaKind::from_extension("mov"),
            Some((MediaKind::Video, "video/quicktime"))
        );
        assert_eq!(MediaKind::from_extension("txt"), None);
        assert_eq!(MediaKind::from_extension(""), None);
    }
}
