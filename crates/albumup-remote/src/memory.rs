use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use albumup_core::error::AlbumupError;
use albumup_core::models::album::{AlbumTitle, RemoteAlbum};

use crate::{AttachResult, NewMediaItem, PhotoLibrary};

/// A call made against a [`MemoryLibrary`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryCall {
    ListAlbums,
    CreateAlbum(String),
    ListAlbumItems(String),
    UploadBytes(String),
    AttachItems { album_id: String, count: usize },
}

impl LibraryCall {
    /// Whether the call changes remote state.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            LibraryCall::CreateAlbum(_)
                | LibraryCall::UploadBytes(_)
                | LibraryCall::AttachItems { .. }
        )
    }
}

#[derive(Default)]
struct State {
    albums: Vec<(RemoteAlbum, Vec<String>)>,
    pending: HashMap<String, String>,
    calls: Vec<LibraryCall>,
    fail_listing: bool,
    fail_create: HashSet<String>,
    fail_upload: HashSet<String>,
    reject_attach: HashSet<String>,
    drop_attach_results: bool,
}

/// In-process photo library with seedable albums, injectable failures and
/// a call log.
#[derive(Default)]
pub struct MemoryLibrary {
    state: Mutex<State>,
}

impl MemoryLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an album that already exists remotely.
    pub fn seed_album(&self, title: &str, is_writeable: bool, items: &[&str]) -> RemoteAlbum {
        let album = RemoteAlbum {
            id: Uuid::now_v7().to_string(),
            title: title.to_string(),
            is_writeable,
            media_items_count: Some(items.len() as u64),
        };
        let names = items.iter().map(|s| s.to_string()).collect();
        self.state.lock().unwrap().albums.push((album.clone(), names));
        album
    }

    /// Make `list_albums` fail.
    pub fn fail_album_listing(&self) {
        self.state.lock().unwrap().fail_listing = true;
    }

    /// Make `create_album` fail for this title.
    pub fn fail_creation_of(&self, title: &str) {
        self.state.lock().unwrap().fail_create.insert(title.to_string());
    }

    /// Make `upload_bytes` fail for this file name.
    pub fn fail_upload_of(&self, file_name: &str) {
        self.state.lock().unwrap().fail_upload.insert(file_name.to_string());
    }

    /// Accept the bytes of this file but refuse to attach it.
    pub fn reject_attachment_of(&self, file_name: &str) {
        self.state
            .lock()
            .unwrap()
            .reject_attach
            .insert(file_name.to_string());
    }

    /// Answer attach calls without any per-token results.
    pub fn drop_attach_results(&self) {
        self.state.lock().unwrap().drop_attach_results = true;
    }

    pub fn calls(&self) -> Vec<LibraryCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn mutation_count(&self) -> usize {
        self.calls().iter().filter(|c| c.is_mutation()).count()
    }

    pub fn upload_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, LibraryCall::UploadBytes(_)))
            .count()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    /// File names currently in the album with this title.
    pub fn album_items(&self, title: &str) -> Option<Vec<String>> {
        self.state
            .lock()
            .unwrap()
            .albums
            .iter()
            .find(|(a, _)| a.title == title)
            .map(|(_, items)| items.clone())
    }

    pub fn album_count(&self) -> usize {
        self.state.lock().unwrap().albums.len()
    }
}

#[async_trait]
impl PhotoLibrary for MemoryLibrary {
    async fn list_albums(&self) -> Result<Vec<RemoteAlbum>, AlbumupError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(LibraryCall::ListAlbums);
        if state.fail_listing {
            return Err(AlbumupError::RemoteUnavailable {
                message: "album listing failed".into(),
            });
        }
        Ok(state
            .albums
            .iter()
            .map(|(album, items)| RemoteAlbum {
                media_items_count: Some(items.len() as u64),
                ..album.clone()
            })
            .collect())
    }

    async fn create_album(&self, title: &AlbumTitle) -> Result<RemoteAlbum, AlbumupError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(LibraryCall::CreateAlbum(title.to_string()));
        if state.fail_create.contains(title.as_str()) {
            return Err(AlbumupError::QuotaExceeded {
                message: format!("cannot create album {title}"),
            });
        }
        let album = RemoteAlbum {
            id: Uuid::now_v7().to_string(),
            title: title.to_string(),
            is_writeable: true,
            media_items_count: Some(0),
        };
        state.albums.push((album.clone(), Vec::new()));
        Ok(album)
    }

    async fn list_album_items(&self, album_id: &str) -> Result<HashSet<String>, AlbumupError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(LibraryCall::ListAlbumItems(album_id.to_string()));
        state
            .albums
            .iter()
            .find(|(a, _)| a.id == album_id)
            .map(|(_, items)| items.iter().cloned().collect())
            .ok_or_else(|| AlbumupError::ApiError {
                status: 404,
                message: format!("album {album_id} not found"),
            })
    }

    async fn upload_bytes(
        &self,
        file_name: &str,
        _mime_type: &str,
        content: Vec<u8>,
    ) -> Result<String, AlbumupError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(LibraryCall::UploadBytes(file_name.to_string()));
        if state.fail_upload.contains(file_name) {
            return Err(AlbumupError::RemoteUnavailable {
                message: format!("upload of {file_name} failed"),
            });
        }
        if content.is_empty() {
            return Err(AlbumupError::InvalidContent {
                file_name: file_name.to_string(),
                message: "empty file".into(),
            });
        }
        let token = Uuid::new_v4().to_string();
        state.pending.insert(token.clone(), file_name.to_string());
        Ok(token)
    }

    async fn attach_items(
        &self,
        album_id: &str,
        items: &[NewMediaItem],
    ) -> Result<Vec<AttachResult>, AlbumupError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(LibraryCall::AttachItems {
            album_id: album_id.to_string(),
            count: items.len(),
        });
        if state.drop_attach_results {
            return Ok(Vec::new());
        }

        let mut results = Vec::with_capacity(items.len());
        let mut attached = Vec::new();
        for item in items {
            let taken = state.pending.remove(&item.upload_token);
            let error = match taken {
                None => Some("unknown upload token".to_string()),
                Some(name) if state.reject_attach.contains(&name) => {
                    Some(format!("{name} was rejected"))
                }
                Some(name) => {
                    attached.push(name);
                    None
                }
            };
            results.push(AttachResult {
                upload_token: item.upload_token.clone(),
                error,
            });
        }

        let (_, album_items) = state
            .albums
            .iter_mut()
            .find(|(a, _)| a.id == album_id)
            .ok_or_else(|| AlbumupError::ApiError {
                status: 404,
                message: format!("album {album_id} not found"),
            })?;
        album_items.extend(attached);
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_then_attach_adds_item() {
        let library = MemoryLibrary::new();
        let album = library
            .create_album(&AlbumTitle::new("Trip"))
            .await
            .unwrap();
        let token = library
            .upload_bytes("a.jpg", "image/jpeg", vec![1, 2, 3])
            .await
            .unwrap();
        let results = library
            .attach_items(
                &album.id,
                &[NewMediaItem {
                    upload_token: token,
                    file_name: "a.jpg".into(),
                }],
            )
            .await
            .unwrap();

        assert!(results[0].is_ok());
        assert_eq!(library.album_items("Trip").unwrap(), vec!["a.jpg"]);
        assert_eq!(library.mutation_count(), 3);
    }

    #[tokio::test]
    async fn test_listing_does_not_count_as_mutation() {
        let library = MemoryLibrary::new();
        let album = library.seed_album("Summer", false, &["x.jpg"]);
        library.list_albums().await.unwrap();
        let items = library.list_album_items(&album.id).await.unwrap();
        assert!(items.contains("x.jpg"));
        assert_eq!(library.mutation_count(), 0);
    }
}
