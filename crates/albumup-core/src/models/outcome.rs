use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::album::AlbumTitle;

/// Summary text for albums this tool refuses to modify.
pub const NOT_WRITABLE_TEXT: &str =
    "Album not updated. For safety reasons an album created outside this utility is not updated.";

/// Summary text when the directive forbids extending an existing album.
pub const ALBUM_EXISTS_TEXT: &str = "Album already exists and is not updated.";

/// Summary text when the operator did not confirm the upload.
pub const UPLOAD_ABORTED_TEXT: &str = "Upload aborted.";

/// What happened to a single media candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileUploadOutcome {
    Uploaded,
    SkippedDuplicate,
    Failed(String),
}

impl std::fmt::Display for FileUploadOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileUploadOutcome::Uploaded => write!(f, "uploaded"),
            FileUploadOutcome::SkippedDuplicate => write!(f, "skipped"),
            FileUploadOutcome::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Outcome of one file, keyed by its file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileUploadRecord {
    pub file_name: String,
    pub outcome: FileUploadOutcome,
}

impl FileUploadRecord {
    pub fn new(file_name: impl Into<String>, outcome: FileUploadOutcome) -> Self {
        Self {
            file_name: file_name.into(),
            outcome,
        }
    }
}

/// Why an album attempt stopped before uploading anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbortReason {
    /// The album exists but was not created by this tool.
    NotWritable,
    /// The album exists and the directive said not to extend it.
    AlbumExists,
    /// The operator declined, or the answer could not be read.
    OperatorDeclined,
}

impl std::fmt::Display for AbortReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AbortReason::NotWritable => write!(f, "not_writable"),
            AbortReason::AlbumExists => write!(f, "album_exists"),
            AbortReason::OperatorDeclined => write!(f, "operator_declined"),
        }
    }
}

/// Terminal state of one album attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlbumStatus {
    Completed,
    PartialFailure,
    Aborted(AbortReason),
    ResolutionFailed(String),
    /// An album-level step (scan, membership listing, creation) failed,
    /// or an unexpected error was caught at the album boundary.
    Failed(String),
}

impl std::fmt::Display for AlbumStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlbumStatus::Completed => write!(f, "completed"),
            AlbumStatus::PartialFailure => write!(f, "partial_failure"),
            AlbumStatus::Aborted(reason) => write!(f, "aborted:{reason}"),
            AlbumStatus::ResolutionFailed(_) => write!(f, "resolution_failed"),
            AlbumStatus::Failed(_) => write!(f, "failed"),
        }
    }
}

/// Result of processing one local folder. Built once by one of the
/// constructors and read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumUploadOutcome {
    album_title: String,
    path: PathBuf,
    status: AlbumStatus,
    success: bool,
    summary_text: String,
    file_outcomes: Vec<FileUploadRecord>,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
}

impl AlbumUploadOutcome {
    fn build(
        album_title: String,
        path: &Path,
        status: AlbumStatus,
        summary_text: String,
        file_outcomes: Vec<FileUploadRecord>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            album_title,
            path: path.to_path_buf(),
            success: status == AlbumStatus::Completed,
            status,
            summary_text,
            file_outcomes,
            started_at,
            finished_at: Utc::now(),
        }
    }

    /// Every candidate was processed. Completed if none failed.
    pub fn finished(
        title: &AlbumTitle,
        path: &Path,
        file_outcomes: Vec<FileUploadRecord>,
        started_at: DateTime<Utc>,
    ) -> Self {
        let (uploaded, skipped, failed) = count_outcomes(&file_outcomes);
        let status = if failed == 0 {
            AlbumStatus::Completed
        } else {
            AlbumStatus::PartialFailure
        };
        let summary = format!("{title}: {uploaded} uploaded, {skipped} skipped, {failed} failed");
        Self::build(title.to_string(), path, status, summary, file_outcomes, started_at)
    }

    /// The attempt stopped before any mutation.
    pub fn aborted(
        title: &AlbumTitle,
        path: &Path,
        reason: AbortReason,
        started_at: DateTime<Utc>,
    ) -> Self {
        let text = match reason {
            AbortReason::NotWritable => NOT_WRITABLE_TEXT,
            AbortReason::AlbumExists => ALBUM_EXISTS_TEXT,
            AbortReason::OperatorDeclined => UPLOAD_ABORTED_TEXT,
        };
        Self::build(
            title.to_string(),
            path,
            AlbumStatus::Aborted(reason),
            format!("{title}: {text}"),
            Vec::new(),
            started_at,
        )
    }

    /// The remote album state could not be determined.
    pub fn resolution_failed(
        title: &AlbumTitle,
        path: &Path,
        reason: String,
        started_at: DateTime<Utc>,
    ) -> Self {
        let summary = format!("{title}: Could not look up the album: {reason}");
        Self::build(
            title.to_string(),
            path,
            AlbumStatus::ResolutionFailed(reason),
            summary,
            Vec::new(),
            started_at,
        )
    }

    /// An album-level step failed. `file_outcomes` holds whatever was
    /// recorded before the failure.
    pub fn failed(
        title: &AlbumTitle,
        path: &Path,
        reason: String,
        file_outcomes: Vec<FileUploadRecord>,
        started_at: DateTime<Utc>,
    ) -> Self {
        let summary = format!("{title}: Album upload failed: {reason}");
        Self::build(
            title.to_string(),
            path,
            AlbumStatus::Failed(reason),
            summary,
            file_outcomes,
            started_at,
        )
    }

    /// Generic outcome for an error caught at the album boundary, when not
    /// even the title may be known.
    pub fn fault(path: &Path, reason: String, started_at: DateTime<Utc>) -> Self {
        let summary = format!(
            "{}: An error occurred during album upload, check the log",
            path.display()
        );
        Self::build(
            path.display().to_string(),
            path,
            AlbumStatus::Failed(reason),
            summary,
            Vec::new(),
            started_at,
        )
    }

    pub fn album_title(&self) -> &str {
        &self.album_title
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn status(&self) -> &AlbumStatus {
        &self.status
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn summary_text(&self) -> &str {
        &self.summary_text
    }

    pub fn file_outcomes(&self) -> &[FileUploadRecord] {
        &self.file_outcomes
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn finished_at(&self) -> DateTime<Utc> {
        self.finished_at
    }

    pub fn uploaded_count(&self) -> usize {
        count_outcomes(&self.file_outcomes).0
    }

    pub fn skipped_count(&self) -> usize {
        count_outcomes(&self.file_outcomes).1
    }

    pub fn failed_count(&self) -> usize {
        count_outcomes(&self.file_outcomes).2
    }
}

impl std::fmt::Display for AlbumUploadOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.summary_text)
    }
}

fn count_outcomes(records: &[FileUploadRecord]) -> (usize, usize, usize) {
    records
        .iter()
        .fold((0, 0, 0), |(u, s, f), r| match r.outcome {
            FileUploadOutcome::Uploaded => (u + 1, s, f),
            FileUploadOutcome::SkippedDuplicate => (u, s + 1, f),
            FileUploadOutcome::Failed(_) => (u, s, f + 1),
        })
}

/// Outcomes of a batch, in the order the folders were processed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchResult {
    outcomes: Vec<AlbumUploadOutcome>,
}

impl BatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, outcome: AlbumUploadOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn outcomes(&self) -> &[AlbumUploadOutcome] {
        &self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn succeeded_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.success()).count()
    }

    /// One line per album, in processing order.
    pub fn render_summary(&self) -> String {
        let mut out = String::from("------------------------\nUpload summary:\n");
        for outcome in &self.outcomes {
            out.push_str(outcome.summary_text());
            out.push('\n');
        }
        out
    }
}
