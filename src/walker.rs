//! Directory scanning.
//!
//! Enumerates video files in a single directory (no recursion), runs each
//! through the [`ThumbnailPipeline`] sequentially, and tallies the outcomes.
//! No per-file failure stops the batch.

use std::path::{Path, PathBuf};

use crate::{
    error::ThumbgridError,
    pipeline::{SheetOptions, SheetOutcome, ThumbnailPipeline},
    progress::{OperationType, ProgressTracker},
};

/// Recognised video file extensions, matched case-insensitively against
/// [`Path::extension`]. A name merely ending in one of these strings without
/// the dot (e.g. `clipm4v`) does not match.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mkv", "mov", "m4v"];

/// Whether a path carries one of the recognised video extensions.
pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| {
            VIDEO_EXTENSIONS
                .iter()
                .any(|candidate| extension.eq_ignore_ascii_case(candidate))
        })
}

/// Outcome counts for one directory scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[must_use]
pub struct ScanSummary {
    /// Sheets successfully assembled and written.
    pub persisted: u64,
    /// Videos that fell back to the 1×1 placeholder.
    pub placeholders: u64,
    /// Videos skipped because their sheet already existed.
    pub skipped: u64,
    /// Videos that could not be opened (nothing written).
    pub open_failed: u64,
}

impl ScanSummary {
    /// Total number of video files visited.
    pub fn total(&self) -> u64 {
        self.persisted + self.placeholders + self.skipped + self.open_failed
    }

    fn record(&mut self, outcome: &SheetOutcome) {
        match outcome {
            SheetOutcome::Persisted(_) => self.persisted += 1,
            SheetOutcome::Placeholder(_) => self.placeholders += 1,
            SheetOutcome::SkippedExisting(_) => self.skipped += 1,
            SheetOutcome::OpenFailed => self.open_failed += 1,
        }
    }
}

/// Walks a directory and generates one contact sheet per video file.
///
/// # Example
///
/// ```no_run
/// use thumbgrid::{DirectoryWalker, SheetOptions};
///
/// let walker = DirectoryWalker::new(SheetOptions::new());
/// let summary = walker.scan(".".as_ref())?;
/// println!("{} sheets written", summary.persisted);
/// # Ok::<(), thumbgrid::ThumbgridError>(())
/// ```
pub struct DirectoryWalker {
    options: SheetOptions,
    pipeline: ThumbnailPipeline,
}

impl DirectoryWalker {
    /// Create a walker; the pipeline (and its font probe) is built once.
    pub fn new(options: SheetOptions) -> Self {
        let pipeline = ThumbnailPipeline::new(options.clone());
        Self { options, pipeline }
    }

    /// List the video files in `directory`, sorted by name for a
    /// deterministic processing order.
    ///
    /// # Errors
    ///
    /// Returns [`ThumbgridError::Io`] when the directory cannot be read.
    pub fn video_files(&self, directory: &Path) -> Result<Vec<PathBuf>, ThumbgridError> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(directory)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && is_video_file(path))
            .collect();
        files.sort();
        Ok(files)
    }

    /// Process every video file in `directory`, one at a time.
    ///
    /// Each file runs to a terminal [`SheetOutcome`] before the next starts;
    /// the per-file source handle is released in between. Only the directory
    /// listing itself can fail.
    pub fn scan(&self, directory: &Path) -> Result<ScanSummary, ThumbgridError> {
        let files = self.video_files(directory)?;
        log::info!(
            "Scanning {}: {} video file(s)",
            directory.display(),
            files.len(),
        );

        let mut tracker = ProgressTracker::new(
            self.options.progress.clone(),
            OperationType::DirectoryScan,
            Some(files.len() as u64),
        );

        let mut summary = ScanSummary::default();
        for file in &files {
            let outcome = self.pipeline.process(file);
            summary.record(&outcome);
            log::info!("{} finished ({outcome:?})", file.display());
            tracker.advance(None);
        }

        Ok(summary)
    }

    /// Access the underlying pipeline (single-file processing).
    pub fn pipeline(&self) -> &ThumbnailPipeline {
        &self.pipeline
    }
}
