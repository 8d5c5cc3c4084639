pub mod google;
pub mod memory;

use std::collections::HashSet;

use albumup_core::error::AlbumupError;
use albumup_core::models::album::{AlbumTitle, RemoteAlbum};
use async_trait::async_trait;

/// An uploaded item waiting to be attached to an album.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMediaItem {
    pub upload_token: String,
    pub file_name: String,
}

/// Per-token result of an attach call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachResult {
    pub upload_token: String,
    /// `None` when the item was added to the album.
    pub error: Option<String>,
}

impl AttachResult {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Capabilities of a remote photo library.
#[async_trait]
pub trait PhotoLibrary: Send + Sync {
    /// List all albums visible to the user (handles pagination).
    async fn list_albums(&self) -> Result<Vec<RemoteAlbum>, AlbumupError>;

    /// Create an album. Albums created here are writeable by this tool.
    async fn create_album(&self, title: &AlbumTitle) -> Result<RemoteAlbum, AlbumupError>;

    /// File names of the items already in an album.
    async fn list_album_items(&self, album_id: &str) -> Result<HashSet<String>, AlbumupError>;

    /// Upload the bytes of one file, returning an upload token.
    async fn upload_bytes(
        &self,
        file_name: &str,
        mime_type: &str,
        content: Vec<u8>,
    ) -> Result<String, AlbumupError>;

    /// Attach uploaded items to an album.
    async fn attach_items(
        &self,
        album_id: &str,
        items: &[NewMediaItem],
    ) -> Result<Vec<AttachResult>, AlbumupError>;
}

/// Create the Google Photos backed library.
pub fn create_library(
    api_url: &url::Url,
    access_token: &str,
    album_page_size: u32,
) -> Result<Box<dyn PhotoLibrary>, AlbumupError> {
    Ok(Box::new(google::GooglePhotosLibrary::new(
        api_url.clone(),
        access_token,
        album_page_size,
    )?))
}
