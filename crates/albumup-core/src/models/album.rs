use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::AlbumupError;

/// Title of an album, taken from the name of the local folder it mirrors.
///
/// Matching against remote albums is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlbumTitle(pub String);

impl AlbumTitle {
    pub fn new(title: impl Into<String>) -> Self {
        Self(title.into())
    }

    /// Derive the title from the final component of a directory path.
    pub fn from_dir(path: &Path) -> Result<Self, AlbumupError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| AlbumupError::Other(format!(
                "cannot derive an album title from {}",
                path.display()
            )))?;
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AlbumTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An album as listed by the remote library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteAlbum {
    pub id: String,
    pub title: String,
    /// Ownership marker: only albums created through this tool's own
    /// creation path are reported as writeable.
    pub is_writeable: bool,
    pub media_items_count: Option<u64>,
}

/// Existence and writability of the album a folder maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlbumState {
    /// No remote album carries this title.
    New,
    /// The album exists and this tool may add items to it.
    ExistingWritable(RemoteAlbum),
    /// The album exists but was curated elsewhere; never modified.
    ExistingReadOnly(RemoteAlbum),
}

impl AlbumState {
    pub fn remote(&self) -> Option<&RemoteAlbum> {
        match self {
            AlbumState::New => None,
            AlbumState::ExistingWritable(album) | AlbumState::ExistingReadOnly(album) => {
                Some(album)
            }
        }
    }
}

impl std::fmt::Display for AlbumState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlbumState::New => write!(f, "new"),
            AlbumState::ExistingWritable(_) => write!(f, "existing_writable"),
            AlbumState::ExistingReadOnly(_) => write!(f, "existing_read_only"),
        }
    }
}
