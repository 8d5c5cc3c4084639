use std::path::Path;

use chrono::{DateTime, Utc};

use albumup_core::error::AlbumupError;
use albumup_core::models::album::{AlbumState, AlbumTitle};
use albumup_core::models::directive::UploadDirective;
use albumup_core::models::outcome::{AbortReason, AlbumUploadOutcome, BatchResult};
use albumup_remote::PhotoLibrary;
use albumup_scan::list_album_dirs;

use crate::policy::{Confirm, ConfirmationPolicy, Decision};
use crate::resolver::AlbumResolver;
use crate::uploader::{AlbumUploader, UploadOptions};

/// Drives folders through resolve, confirm and upload, one at a time.
pub struct BatchOrchestrator<'a> {
    library: &'a dyn PhotoLibrary,
    confirm: &'a dyn Confirm,
    options: UploadOptions,
}

impl<'a> BatchOrchestrator<'a> {
    pub fn new(
        library: &'a dyn PhotoLibrary,
        confirm: &'a dyn Confirm,
        options: UploadOptions,
    ) -> Self {
        Self {
            library,
            confirm,
            options,
        }
    }

    /// Upload one folder as one album. A missing folder is reported as
    /// `PathNotFound` before the library is contacted; every other problem
    /// ends up in the outcome.
    pub async fn process_single_album(
        &self,
        path: &Path,
        directive: UploadDirective,
    ) -> Result<AlbumUploadOutcome, AlbumupError> {
        if !path.is_dir() {
            tracing::error!("the folder could not be found: '{}'", path.display());
            return Err(AlbumupError::PathNotFound {
                path: path.to_path_buf(),
            });
        }
        Ok(self.process_album_dir(path, directive).await)
    }

    /// Upload each immediate subfolder of `root` as its own album, in
    /// ascending name order. One album failing never stops the others.
    pub async fn process_main_directory(
        &self,
        root: &Path,
        directive: UploadDirective,
    ) -> Result<BatchResult, AlbumupError> {
        let dirs = list_album_dirs(root)?;
        tracing::info!("{} album folders found in {}", dirs.len(), root.display());

        let mut batch = BatchResult::new();
        for dir in &dirs {
            let outcome = self.process_album_dir(dir, directive).await;
            if !outcome.success() {
                tracing::warn!(
                    "upload of album '{}' from {} did not succeed",
                    outcome.album_title(),
                    outcome.path().display()
                );
            }
            batch.push(outcome);
        }

        tracing::info!(
            "batch finished: {} succeeded, {} not",
            batch.succeeded_count(),
            batch.failed_count()
        );
        Ok(batch)
    }

    /// Album boundary: errors below are logged and become an outcome.
    async fn process_album_dir(
        &self,
        path: &Path,
        directive: UploadDirective,
    ) -> AlbumUploadOutcome {
        let started_at = Utc::now();
        let outcome = match self.try_process_album_dir(path, directive, started_at).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("error during processing of '{}': {e}", path.display());
                AlbumUploadOutcome::fault(path, e.to_string(), started_at)
            }
        };
        tracing::debug!(
            "{} done in {}ms",
            outcome.path().display(),
            (outcome.finished_at() - outcome.started_at()).num_milliseconds()
        );
        outcome
    }

    async fn try_process_album_dir(
        &self,
        path: &Path,
        directive: UploadDirective,
        started_at: DateTime<Utc>,
    ) -> Result<AlbumUploadOutcome, AlbumupError> {
        if !path.is_dir() {
            return Err(AlbumupError::PathNotFound {
                path: path.to_path_buf(),
            });
        }
        // The folder's own name, not a symlink target. `.` and `..` have none.
        let title = match path.file_name() {
            Some(_) => AlbumTitle::from_dir(path)?,
            None => AlbumTitle::from_dir(&path.canonicalize()?)?,
        };
        tracing::info!("uploading album: {title}");

        let state = match AlbumResolver::new(self.library).resolve(&title).await {
            Ok(state) => state,
            Err(e) => {
                tracing::error!("could not resolve album {title}: {e}");
                return Ok(AlbumUploadOutcome::resolution_failed(
                    &title,
                    path,
                    e.to_string(),
                    started_at,
                ));
            }
        };

        match &state {
            AlbumState::New => {}
            AlbumState::ExistingReadOnly(_) => {
                tracing::info!("album {title} was created outside albumup and is not updated");
                return Ok(AlbumUploadOutcome::aborted(
                    &title,
                    path,
                    AbortReason::NotWritable,
                    started_at,
                ));
            }
            AlbumState::ExistingWritable(album) => {
                match ConfirmationPolicy::new(self.confirm).decide(album, directive) {
                    Decision::Proceed => {}
                    Decision::Abort(reason) => {
                        return Ok(AlbumUploadOutcome::aborted(&title, path, reason, started_at))
                    }
                }
            }
        }

        Ok(AlbumUploader::new(self.library, &self.options)
            .upload(path, &title, &state)
            .await)
    }
}
