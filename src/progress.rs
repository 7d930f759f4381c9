//! Progress reporting.
//!
//! [`ProgressCallback`] is the observer interface the pipeline reports
//! through: one notification per sample slot while a sheet is generated and
//! one per file during a directory scan. Diagnostics stay on the `log`
//! crate; this channel exists purely for user-facing progress display.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use thumbgrid::{ProgressCallback, ProgressInfo, SheetOptions, ThumbnailPipeline};
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         if let Some(pct) = info.percentage {
//!             println!("[{:?}] {pct:.1}% complete", info.operation);
//!         }
//!     }
//! }
//!
//! let options = SheetOptions::new().with_progress(Arc::new(PrintProgress));
//! let pipeline = ThumbnailPipeline::new(options);
//! pipeline.process("input.mp4".as_ref());
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

/// The kind of work currently reporting progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum OperationType {
    /// Sampling and annotating frames for one contact sheet.
    ThumbnailGeneration,
    /// Walking a directory of videos.
    DirectoryScan,
}

/// A snapshot of progress, delivered to [`ProgressCallback::on_progress`].
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// What kind of work is being performed.
    pub operation: OperationType,
    /// How many items (sample slots / files) have completed so far.
    pub current: u64,
    /// Total items expected, if known ahead of time.
    pub total: Option<u64>,
    /// Completion percentage (0.0 – 100.0), if `total` is known.
    pub percentage: Option<f32>,
    /// Wall-clock time elapsed since the operation started.
    pub elapsed: Duration,
    /// The frame number currently being sampled, when applicable.
    pub current_frame: Option<u64>,
}

/// Trait for receiving progress updates.
///
/// Implementations must be [`Send`] and [`Sync`] so one callback can be
/// shared across pipeline invocations. Callbacks are infallible observers;
/// they cannot halt the batch.
pub trait ProgressCallback: Send + Sync {
    /// Called once per completed unit of work.
    fn on_progress(&self, info: &ProgressInfo);
}

/// A no-op implementation that discards all progress notifications.
///
/// This is the default when no callback is configured.
pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

/// Internal helper that tracks timing and emits callbacks.
pub(crate) struct ProgressTracker {
    callback: Arc<dyn ProgressCallback>,
    operation: OperationType,
    total: Option<u64>,
    current: u64,
    start_time: Instant,
}

impl ProgressTracker {
    pub(crate) fn new(
        callback: Arc<dyn ProgressCallback>,
        operation: OperationType,
        total: Option<u64>,
    ) -> Self {
        Self {
            callback,
            operation,
            total,
            current: 0,
            start_time: Instant::now(),
        }
    }

    /// Record one completed item and fire the callback.
    pub(crate) fn advance(&mut self, frame_number: Option<u64>) {
        self.current += 1;

        let percentage = self
            .total
            .filter(|&total| total > 0)
            .map(|total| (self.current as f32 / total as f32) * 100.0);

        let info = ProgressInfo {
            operation: self.operation,
            current: self.current,
            total: self.total,
            percentage,
            elapsed: self.start_time.elapsed(),
            current_frame: frame_number,
        };

        self.callback.on_progress(&info);
    }
}
