use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};

use albumup_core::config::AlbumupConfig;
use albumup_core::error::AlbumupError;
use albumup_core::models::album::{AlbumState, AlbumTitle};
use albumup_core::models::media::MediaCandidate;
use albumup_core::models::outcome::{
    AbortReason, AlbumUploadOutcome, FileUploadOutcome, FileUploadRecord,
};
use albumup_remote::{AttachResult, NewMediaItem, PhotoLibrary};
use albumup_scan::{scan_media, ScanOptions};

/// Tuning for album uploads.
#[derive(Debug, Clone)]
pub struct UploadOptions {
    pub attach_batch_size: usize,
    pub upload_delay: Duration,
    pub show_progress: bool,
    pub scan: ScanOptions,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            attach_batch_size: 50,
            upload_delay: Duration::ZERO,
            show_progress: false,
            scan: ScanOptions::default(),
        }
    }
}

impl From<&AlbumupConfig> for UploadOptions {
    fn from(config: &AlbumupConfig) -> Self {
        Self {
            attach_batch_size: config.attach_batch_size.max(1),
            upload_delay: Duration::from_millis(config.upload_delay_ms),
            show_progress: config.show_progress,
            scan: ScanOptions {
                extra_extensions: config.extra_extensions.clone(),
            },
        }
    }
}

/// Uploads the media of one folder into its album.
pub struct AlbumUploader<'a> {
    library: &'a dyn PhotoLibrary,
    options: &'a UploadOptions,
}

impl<'a> AlbumUploader<'a> {
    pub fn new(library: &'a dyn PhotoLibrary, options: &'a UploadOptions) -> Self {
        Self { library, options }
    }

    /// Upload the files of `dir` missing from the album.
    ///
    /// Flow:
    /// 1. Enumerate supported media files
    /// 2. Drop candidates already in the album
    /// 3. Create the album if it is new
    /// 4. Upload each remaining file
    /// 5. Attach the uploaded items in batches
    /// 6. Summarize
    ///
    /// Failures never escape: each lands in the returned outcome.
    pub async fn upload(
        &self,
        dir: &Path,
        title: &AlbumTitle,
        state: &AlbumState,
    ) -> AlbumUploadOutcome {
        let started_at = Utc::now();

        if let AlbumState::ExistingReadOnly(_) = state {
            return AlbumUploadOutcome::aborted(title, dir, AbortReason::NotWritable, started_at);
        }

        // 1. Enumerate
        let candidates = match scan_media(dir, &self.options.scan) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!("could not read {}: {e}", dir.display());
                return AlbumUploadOutcome::failed(
                    title,
                    dir,
                    format!("could not read folder: {e}"),
                    Vec::new(),
                    started_at,
                );
            }
        };

        // 2. Dedup against the album
        let existing = match state.remote() {
            Some(album) => match self.library.list_album_items(&album.id).await {
                Ok(items) => items,
                Err(e) => {
                    tracing::error!("could not list items of album {title}: {e}");
                    return AlbumUploadOutcome::failed(
                        title,
                        dir,
                        format!("could not list album contents: {e}"),
                        Vec::new(),
                        started_at,
                    );
                }
            },
            None => HashSet::new(),
        };

        let mut outcomes = Vec::with_capacity(candidates.len());
        let mut pending: Vec<(usize, &MediaCandidate)> = Vec::new();
        let mut seen = HashSet::new();
        for candidate in &candidates {
            let id = candidate.identifier();
            if existing.contains(id) || !seen.insert(id) {
                outcomes.push(FileUploadOutcome::SkippedDuplicate);
            } else {
                pending.push((outcomes.len(), candidate));
                outcomes.push(FileUploadOutcome::Failed("not attempted".into()));
            }
        }
        tracing::info!(
            "album {title}: {} files found, {} to upload",
            candidates.len(),
            pending.len()
        );

        // 3. Create if new
        let album = match state.remote() {
            Some(album) => album.clone(),
            None => match self.library.create_album(title).await {
                Ok(album) => {
                    tracing::info!("created album {title}");
                    album
                }
                Err(e) => {
                    tracing::error!("could not create album {title}: {e}");
                    return AlbumUploadOutcome::failed(
                        title,
                        dir,
                        format!("could not create album: {e}"),
                        Vec::new(),
                        started_at,
                    );
                }
            },
        };

        // 4. Upload
        let pb = self.progress_bar(title, pending.len());
        let mut uploaded: Vec<(usize, NewMediaItem)> = Vec::new();
        for (n, (idx, candidate)) in pending.iter().enumerate() {
            if n > 0 && !self.options.upload_delay.is_zero() {
                tokio::time::sleep(self.options.upload_delay).await;
            }
            pb.set_message(candidate.file_name.clone());
            match self.upload_file(candidate).await {
                Ok(upload_token) => uploaded.push((
                    *idx,
                    NewMediaItem {
                        upload_token,
                        file_name: candidate.file_name.clone(),
                    },
                )),
                Err(e) => {
                    tracing::warn!("upload of {} failed: {e}", candidate.path.display());
                    outcomes[*idx] = FileUploadOutcome::Failed(e.to_string());
                }
            }
            pb.inc(1);
        }
        pb.finish_and_clear();

        // 5. Attach
        for chunk in uploaded.chunks(self.options.attach_batch_size.max(1)) {
            let items: Vec<NewMediaItem> = chunk.iter().map(|(_, item)| item.clone()).collect();
            match self.library.attach_items(&album.id, &items).await {
                Ok(results) => {
                    let by_token: HashMap<&str, &AttachResult> = results
                        .iter()
                        .map(|r| (r.upload_token.as_str(), r))
                        .collect();
                    for (idx, item) in chunk {
                        outcomes[*idx] = match by_token.get(item.upload_token.as_str()) {
                            Some(result) if result.is_ok() => FileUploadOutcome::Uploaded,
                            Some(result) => {
                                let err = result.error.as_deref().unwrap_or_default();
                                tracing::warn!(
                                    "{} was not added to {title}: {err}",
                                    item.file_name
                                );
                                FileUploadOutcome::Failed(format!("attach failed: {err}"))
                            }
                            None => {
                                tracing::warn!("no attach result for {}", item.file_name);
                                FileUploadOutcome::Failed("attach result missing".into())
                            }
                        };
                    }
                }
                Err(e) => {
                    tracing::error!("attaching {} items to {title} failed: {e}", chunk.len());
                    for (idx, _) in chunk {
                        outcomes[*idx] = FileUploadOutcome::Failed(format!("attach failed: {e}"));
                    }
                }
            }
        }

        // 6. Summarize
        let records = candidates
            .iter()
            .zip(outcomes)
            .map(|(c, outcome)| FileUploadRecord::new(c.file_name.clone(), outcome))
            .collect();
        let outcome = AlbumUploadOutcome::finished(title, dir, records, started_at);
        tracing::info!("{}", outcome.summary_text());
        outcome
    }

    async fn upload_file(&self, candidate: &MediaCandidate) -> Result<String, AlbumupError> {
        let content = tokio::fs::read(&candidate.path).await?;
        self.library
            .upload_bytes(&candidate.file_name, &candidate.mime_type, content)
            .await
    }

    fn progress_bar(&self, title: &AlbumTitle, len: usize) -> ProgressBar {
        if !self.options.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len as u64);
        let style =
            ProgressStyle::with_template("{spinner:.green} [{bar:30}] {pos}/{len} {prefix} {msg}")
                .unwrap()
                .progress_chars("=> ");
        pb.set_style(style);
        pb.set_prefix(title.to_string());
        pb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use albumup_core::models::outcome::AlbumStatus;
    use albumup_remote::memory::{LibraryCall, MemoryLibrary};

    fn folder(files: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for name in files {
            std::fs::write(dir.path().join(name), b"jpegdata").unwrap();
        }
        dir
    }

    fn outcome_of<'o>(outcome: &'o AlbumUploadOutcome, name: &str) -> &'o FileUploadOutcome {
        &outcome
            .file_outcomes()
            .iter()
            .find(|r| r.file_name == name)
            .unwrap()
            .outcome
    }

    #[tokio::test]
    async fn test_new_album_uploads_everything() {
        let dir = folder(&["a.jpg", "b.png", "readme.txt"]);
        let library = MemoryLibrary::new();
        let options = UploadOptions::default();
        let uploader = AlbumUploader::new(&library, &options);
        let title = AlbumTitle::new("Trip");

        let outcome = uploader.upload(dir.path(), &title, &AlbumState::New).await;

        assert!(outcome.success());
        assert_eq!(outcome.uploaded_count(), 2);
        assert_eq!(outcome.file_outcomes().len(), 2);
        assert_eq!(library.album_items("Trip").unwrap(), vec!["a.jpg", "b.png"]);
        assert_eq!(outcome.summary_text(), "Trip: 2 uploaded, 0 skipped, 0 failed");
    }

    #[tokio::test]
    async fn test_existing_items_are_not_reuploaded() {
        let dir = folder(&["a.jpg", "b.jpg"]);
        let library = MemoryLibrary::new();
        let album = library.seed_album("Trip", true, &["a.jpg", "b.jpg"]);
        let options = UploadOptions::default();
        let uploader = AlbumUploader::new(&library, &options);

        let outcome = uploader
            .upload(dir.path(), &AlbumTitle::new("Trip"), &AlbumState::ExistingWritable(album))
            .await;

        assert!(outcome.success());
        assert_eq!(outcome.uploaded_count(), 0);
        assert_eq!(outcome.skipped_count(), 2);
        assert_eq!(library.mutation_count(), 0);
    }

    #[tokio::test]
    async fn test_dedup_is_case_sensitive() {
        let dir = folder(&["A.jpg"]);
        let library = MemoryLibrary::new();
        let album = library.seed_album("Trip", true, &["a.jpg"]);
        let options = UploadOptions::default();
        let uploader = AlbumUploader::new(&library, &options);

        let outcome = uploader
            .upload(dir.path(), &AlbumTitle::new("Trip"), &AlbumState::ExistingWritable(album))
            .await;
        assert_eq!(outcome.uploaded_count(), 1);
    }

    #[tokio::test]
    async fn test_one_failed_file_does_not_stop_the_rest() {
        let dir = folder(&["a.jpg", "b.jpg", "c.jpg"]);
        let library = MemoryLibrary::new();
        library.fail_upload_of("b.jpg");
        let options = UploadOptions::default();
        let uploader = AlbumUploader::new(&library, &options);

        let outcome = uploader
            .upload(dir.path(), &AlbumTitle::new("Trip"), &AlbumState::New)
            .await;

        assert!(!outcome.success());
        assert_eq!(outcome.status(), &AlbumStatus::PartialFailure);
        assert_eq!(outcome_of(&outcome, "a.jpg"), &FileUploadOutcome::Uploaded);
        assert!(matches!(outcome_of(&outcome, "b.jpg"), FileUploadOutcome::Failed(_)));
        assert_eq!(outcome_of(&outcome, "c.jpg"), &FileUploadOutcome::Uploaded);
        assert_eq!(library.album_items("Trip").unwrap(), vec!["a.jpg", "c.jpg"]);
    }

    #[tokio::test]
    async fn test_rejected_attachment_marks_file_failed() {
        let dir = folder(&["a.jpg", "b.jpg"]);
        let library = MemoryLibrary::new();
        library.reject_attachment_of("a.jpg");
        let options = UploadOptions::default();
        let uploader = AlbumUploader::new(&library, &options);

        let outcome = uploader
            .upload(dir.path(), &AlbumTitle::new("Trip"), &AlbumState::New)
            .await;

        assert!(matches!(outcome_of(&outcome, "a.jpg"), FileUploadOutcome::Failed(_)));
        assert_eq!(outcome_of(&outcome, "b.jpg"), &FileUploadOutcome::Uploaded);
        assert_eq!(outcome.uploaded_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_attach_results_are_failures() {
        let dir = folder(&["a.jpg"]);
        let library = MemoryLibrary::new();
        library.drop_attach_results();
        let options = UploadOptions::default();
        let uploader = AlbumUploader::new(&library, &options);

        let outcome = uploader
            .upload(dir.path(), &AlbumTitle::new("Trip"), &AlbumState::New)
            .await;

        assert_eq!(outcome.uploaded_count(), 0);
        assert_eq!(outcome.failed_count(), 1);
        assert!(!outcome.success());
    }

    #[tokio::test]
    async fn test_attach_is_batched() {
        let dir = folder(&["1.jpg", "2.jpg", "3.jpg", "4.jpg", "5.jpg"]);
        let library = MemoryLibrary::new();
        let options = UploadOptions {
            attach_batch_size: 2,
            ..UploadOptions::default()
        };
        let uploader = AlbumUploader::new(&library, &options);

        let outcome = uploader
            .upload(dir.path(), &AlbumTitle::new("Trip"), &AlbumState::New)
            .await;

        assert!(outcome.success());
        let sizes: Vec<usize> = library
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                LibraryCall::AttachItems { count, .. } => Some(count),
                _ => None,
            })
            .collect();
        assert_eq!(sizes, vec![2, 2, 1]);
    }

    #[tokio::test]
    async fn test_creation_failure_fails_album() {
        let dir = folder(&["a.jpg"]);
        let library = MemoryLibrary::new();
        library.fail_creation_of("Trip");
        let options = UploadOptions::default();
        let uploader = AlbumUploader::new(&library, &options);

        let outcome = uploader
            .upload(dir.path(), &AlbumTitle::new("Trip"), &AlbumState::New)
            .await;

        assert!(!outcome.success());
        assert!(matches!(outcome.status(), AlbumStatus::Failed(_)));
        assert_eq!(library.upload_count(), 0);
    }

    #[tokio::test]
    async fn test_read_only_album_is_left_alone() {
        let dir = folder(&["a.jpg"]);
        let library = MemoryLibrary::new();
        let album = library.seed_album("Summer", false, &[]);
        let options = UploadOptions::default();
        let uploader = AlbumUploader::new(&library, &options);

        let outcome = uploader
            .upload(dir.path(), &AlbumTitle::new("Summer"), &AlbumState::ExistingReadOnly(album))
            .await;

        assert!(!outcome.success());
        assert!(library.calls().is_empty());
    }

    #[tokio::test]
    async fn test_vanished_folder_is_an_outcome() {
        let dir = folder(&[]);
        let gone = dir.path().join("gone");
        let library = MemoryLibrary::new();
        let options = UploadOptions::default();
        let uploader = AlbumUploader::new(&library, &options);

        let outcome = uploader
            .upload(&gone, &AlbumTitle::new("gone"), &AlbumState::New)
            .await;

        assert!(matches!(outcome.status(), AlbumStatus::Failed(_)));
        assert_eq!(library.mutation_count(), 0);
    }
}
