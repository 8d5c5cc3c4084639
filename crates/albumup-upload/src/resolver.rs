use albumup_core::error::AlbumupError;
use albumup_core::models::album::{AlbumState, AlbumTitle, RemoteAlbum};
use albumup_remote::PhotoLibrary;

/// Works out whether the album for a title exists and may be modified.
pub struct AlbumResolver<'a> {
    library: &'a dyn PhotoLibrary,
}

impl<'a> AlbumResolver<'a> {
    pub fn new(library: &'a dyn PhotoLibrary) -> Self {
        Self { library }
    }

    /// Resolve the state of the album titled `title`. Any failure to list
    /// albums is reported as `RemoteUnavailable`.
    pub async fn resolve(&self, title: &AlbumTitle) -> Result<AlbumState, AlbumupError> {
        let albums = self
            .library
            .list_albums()
            .await
            .map_err(AlbumupError::into_remote_unavailable)?;
        let state = classify(title, albums);
        tracing::debug!("album {title} resolved as {state}");
        Ok(state)
    }
}

/// Classify an album listing against a title. Exact, case-sensitive match;
/// a writeable match wins over read-only ones with the same title.
pub fn classify(title: &AlbumTitle, albums: Vec<RemoteAlbum>) -> AlbumState {
    let mut matches: Vec<RemoteAlbum> = albums
        .into_iter()
        .filter(|a| a.title == title.as_str())
        .collect();

    if matches.is_empty() {
        return AlbumState::New;
    }
    if matches.len() > 1 {
        tracing::warn!("{} remote albums are titled {title}", matches.len());
    }

    match matches.iter().position(|a| a.is_writeable) {
        Some(idx) => AlbumState::ExistingWritable(matches.swap_remove(idx)),
        None => AlbumState::ExistingReadOnly(matches.swap_remove(0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use albumup_remote::memory::MemoryLibrary;

    fn album(id: &str, title: &str, is_writeable: bool) -> RemoteAlbum {
        RemoteAlbum {
            id: id.to_string(),
            title: title.to_string(),
            is_writeable,
            media_items_count: None,
        }
    }

    #[test]
    fn test_classify_exact_match_only() {
        let title = AlbumTitle::new("Summer");
        let albums = vec![album("1", "summer", true), album("2", "Summer 2020", true)];
        assert_eq!(classify(&title, albums), AlbumState::New);
    }

    #[test]
    fn test_classify_ownership() {
        let title = AlbumTitle::new("Summer");
        assert_eq!(
            classify(&title, vec![album("1", "Summer", false)]),
            AlbumState::ExistingReadOnly(album("1", "Summer", false))
        );
        assert_eq!(
            classify(
                &title,
                vec![album("1", "Summer", false), album("2", "Summer", true)]
            ),
            AlbumState::ExistingWritable(album("2", "Summer", true))
        );
    }

    #[tokio::test]
    async fn test_listing_failure_is_remote_unavailable() {
        let library = MemoryLibrary::new();
        library.fail_album_listing();
        let resolver = AlbumResolver::new(&library);
        let err = resolver.resolve(&AlbumTitle::new("Any")).await.unwrap_err();
        assert!(matches!(err, AlbumupError::RemoteUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_resolve_against_library() {
        let library = MemoryLibrary::new();
        library.seed_album("Trip", true, &[]);
        let resolver = AlbumResolver::new(&library);
        let state = resolver.resolve(&AlbumTitle::new("Trip")).await.unwrap();
        assert!(matches!(state, AlbumState::ExistingWritable(_)));
        assert_eq!(library.mutation_count(), 0);
    }
}
