use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use albumup_core::error::AlbumupError;
use albumup_core::models::media::{MediaCandidate, MediaKind};

/// Options controlling which files count as media.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Extra extensions (without the dot, any case) treated as photos.
    pub extra_extensions: Vec<String>,
}

impl ScanOptions {
    fn classify(&self, path: &Path) -> Option<(MediaKind, String)> {
        let ext = path.extension()?.to_string_lossy().to_lowercase();
        if let Some((kind, mime)) = MediaKind::from_extension(&ext) {
            return Some((kind, mime.to_string()));
        }
        self.extra_extensions
            .iter()
            .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(&ext))
            .then(|| (MediaKind::Photo, "application/octet-stream".to_string()))
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

/// Immediate children of `dir`, skipping hidden entries, sorted by name.
fn children(dir: &Path) -> Result<Vec<DirEntry>, AlbumupError> {
    if !dir.is_dir() {
        return Err(AlbumupError::PathNotFound {
            path: dir.to_path_buf(),
        });
    }

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    let mut entries = Vec::new();
    for entry in walker {
        match entry {
            Ok(entry) if !is_hidden(&entry) => entries.push(entry),
            Ok(_) => {}
            Err(e) => tracing::warn!("skipping unreadable entry in {}: {e}", dir.display()),
        }
    }
    Ok(entries)
}

/// Enumerate the supported media files directly inside `dir`, sorted by
/// file name. Unsupported files are left out without comment.
pub fn scan_media(dir: &Path, options: &ScanOptions) -> Result<Vec<MediaCandidate>, AlbumupError> {
    let mut candidates = Vec::new();
    let mut ignored = 0usize;

    for entry in children(dir)? {
        if !entry.file_type().is_file() {
            continue;
        }
        match options.classify(entry.path()) {
            Some((kind, mime_type)) => candidates.push(MediaCandidate {
                path: entry.path().to_path_buf(),
                file_name: entry.file_name().to_string_lossy().to_string(),
                kind,
                mime_type,
            }),
            None => ignored += 1,
        }
    }

    tracing::debug!(
        "{}: {} media files, {ignored} ignored",
        dir.display(),
        candidates.len()
    );
    Ok(candidates)
}

/// Immediate, non-hidden subdirectories of `root` in ascending name order.
pub fn list_album_dirs(root: &Path) -> Result<Vec<PathBuf>, AlbumupError> {
    Ok(children(root)?
        .into_iter()
        .filter(|e| e.file_type().is_dir())
        .map(|e| e.into_path())
        .collect())
}
