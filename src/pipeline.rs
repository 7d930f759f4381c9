//! Per-video orchestration.
//!
//! [`ThumbnailPipeline`] takes one video from open to persisted contact
//! sheet: plan the grid, sample and annotate frames, assemble, and write
//! `<stem>_thumbnail.png`. Every invocation ends in exactly one
//! [`SheetOutcome`]; no failure escapes as an error, so a batch always moves
//! on to the next file. The source handle is dropped on every exit path.
//!
//! # Example
//!
//! ```no_run
//! use thumbgrid::{SheetOptions, SheetOutcome, ThumbnailPipeline};
//!
//! let pipeline = ThumbnailPipeline::new(SheetOptions::new());
//! match pipeline.process("movie.mkv".as_ref()) {
//!     SheetOutcome::Persisted(path) => println!("wrote {}", path.display()),
//!     outcome => println!("{outcome:?}"),
//! }
//! ```

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    annotate::{FrameAnnotator, TimestampFont},
    assemble::{assemble, placeholder_image},
    grid::GridPlan,
    progress::{NoOpProgress, OperationType, ProgressCallback, ProgressTracker},
    sampler::FrameSampler,
    source::{FrameSource, MediaSource},
};

/// Suffix appended to the video's stem to form the output file name.
const THUMBNAIL_SUFFIX: &str = "_thumbnail.png";

/// Configuration for the pipeline.
///
/// A builder in the usual style: a default-constructed value writes sheets
/// next to their videos, never overwrites, and reports no progress.
///
/// # Example
///
/// ```no_run
/// use thumbgrid::SheetOptions;
///
/// let options = SheetOptions::new()
///     .with_output_dir("/tmp/sheets")
///     .with_overwrite(true);
/// ```
#[derive(Clone)]
#[must_use]
pub struct SheetOptions {
    /// Where sheets are written. `None` means next to each video.
    pub(crate) output_dir: Option<PathBuf>,
    /// Regenerate sheets whose output file already exists.
    pub(crate) overwrite: bool,
    /// Progress observer. Defaults to a no-op.
    pub(crate) progress: Arc<dyn ProgressCallback>,
    /// Explicit font file for the timestamp overlay. `None` probes the
    /// system locations.
    pub(crate) font_path: Option<PathBuf>,
}

impl Debug for SheetOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SheetOptions")
            .field("output_dir", &self.output_dir)
            .field("overwrite", &self.overwrite)
            .field("font_path", &self.font_path)
            .finish_non_exhaustive()
    }
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl SheetOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self {
            output_dir: None,
            overwrite: false,
            progress: Arc::new(NoOpProgress),
            font_path: None,
        }
    }

    /// Write sheets into `dir` instead of next to each video.
    pub fn with_output_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Regenerate sheets even when the output file already exists.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Attach a progress observer.
    ///
    /// Fired once per sample slot during sheet generation and once per file
    /// during a directory scan.
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Use an explicit TTF/TTC file for the timestamp overlay.
    pub fn with_font_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.font_path = Some(path.into());
        self
    }
}

/// Terminal state of one pipeline invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum SheetOutcome {
    /// The assembled grid was written to the given path.
    Persisted(PathBuf),
    /// Assembly or sampling failed; a 1×1 black placeholder was written.
    Placeholder(PathBuf),
    /// The output file already existed and was left untouched.
    SkippedExisting(PathBuf),
    /// The source could not be opened or reported unusable metadata.
    /// Nothing was written.
    OpenFailed,
}

/// Generates one contact sheet per video.
///
/// Construct once with [`SheetOptions`] and call
/// [`process`](ThumbnailPipeline::process) per file; the font is probed a
/// single time up front.
pub struct ThumbnailPipeline {
    options: SheetOptions,
    font: Option<TimestampFont>,
}

impl ThumbnailPipeline {
    /// Create a pipeline.
    ///
    /// Loads the overlay font from the configured path or the system
    /// locations; when none is found a warning is logged once and sheets are
    /// produced without burned-in timestamps.
    pub fn new(options: SheetOptions) -> Self {
        let font = match &options.font_path {
            Some(path) => {
                let font = TimestampFont::from_path(path);
                if font.is_none() {
                    log::warn!(
                        "Could not load font from {}; timestamps will not be drawn",
                        path.display(),
                    );
                }
                font
            }
            None => {
                let font = TimestampFont::load_default();
                if font.is_none() {
                    log::warn!(
                        "No usable system font found; timestamps will not be drawn"
                    );
                }
                font
            }
        };

        Self { options, font }
    }

    /// Compute the output path for a video.
    ///
    /// `<stem>_thumbnail.png`, in the configured output directory or next to
    /// the video.
    pub fn thumbnail_path(&self, video_path: &Path) -> PathBuf {
        let stem = video_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "video".to_string());

        let directory = self
            .options
            .output_dir
            .clone()
            .or_else(|| video_path.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));

        directory.join(format!("{stem}{THUMBNAIL_SUFFIX}"))
    }

    /// Run one video end to end.
    ///
    /// Failures are terminal states, not errors: open problems end in
    /// [`SheetOutcome::OpenFailed`] with nothing written, while sampling or
    /// assembly problems end in [`SheetOutcome::Placeholder`].
    pub fn process(&self, video_path: &Path) -> SheetOutcome {
        let thumbnail_path = self.thumbnail_path(video_path);

        if !self.options.overwrite && thumbnail_path.exists() {
            log::info!(
                "Thumbnail already exists for {}; skipping",
                video_path.display(),
            );
            return SheetOutcome::SkippedExisting(thumbnail_path);
        }

        let mut source = match MediaSource::open(video_path) {
            Ok(source) => source,
            Err(error) => {
                log::error!("Cannot open {}: {error}", video_path.display());
                return SheetOutcome::OpenFailed;
            }
        };

        let metadata = source.metadata().clone();
        if !metadata.is_usable() {
            let error = crate::error::ThumbgridError::UnusableMetadata {
                path: video_path.to_path_buf(),
                frames_per_second: metadata.frames_per_second,
                frame_count: metadata.frame_count,
            };
            log::error!("{error}");
            return SheetOutcome::OpenFailed;
        }

        let plan = GridPlan::for_video(&metadata);
        log::debug!(
            "Planned {}x{} grid for {} (interval {} frames)",
            plan.columns,
            plan.rows,
            video_path.display(),
            plan.frame_interval,
        );

        self.generate(&mut source, &plan, video_path, &thumbnail_path)
    }

    fn generate(
        &self,
        source: &mut dyn FrameSource,
        plan: &GridPlan,
        video_path: &Path,
        thumbnail_path: &Path,
    ) -> SheetOutcome {
        let annotator = FrameAnnotator::new(plan.source_width, plan.columns, self.font.clone());
        let sampler = FrameSampler::new(plan, &annotator);
        let mut tracker = ProgressTracker::new(
            self.options.progress.clone(),
            OperationType::ThumbnailGeneration,
            Some(plan.slot_count()),
        );

        let rows = match sampler.sample_with_tracker(source, &mut tracker) {
            Ok(rows) => rows,
            Err(error) => {
                log::error!("Sampling failed for {}: {error}", video_path.display());
                return self.write_placeholder(thumbnail_path);
            }
        };

        match assemble(&rows) {
            Ok(grid) => match grid.save(thumbnail_path) {
                Ok(()) => {
                    log::info!(
                        "Wrote {}x{} sheet to {}",
                        grid.width(),
                        grid.height(),
                        thumbnail_path.display(),
                    );
                    SheetOutcome::Persisted(thumbnail_path.to_path_buf())
                }
                Err(error) => {
                    log::error!(
                        "Failed to write sheet to {}: {error}",
                        thumbnail_path.display(),
                    );
                    self.write_placeholder(thumbnail_path)
                }
            },
            Err(error) => {
                log::error!("Assembly failed for {}: {error}", video_path.display());
                self.write_placeholder(thumbnail_path)
            }
        }
    }

    fn write_placeholder(&self, thumbnail_path: &Path) -> SheetOutcome {
        if let Err(error) = placeholder_image().save(thumbnail_path) {
            log::error!(
                "Failed to write placeholder to {}: {error}",
                thumbnail_path.display(),
            );
        }
        SheetOutcome::Placeholder(thumbnail_path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use image::DynamicImage;
    use tempfile::TempDir;

    use super::{SheetOptions, SheetOutcome, ThumbnailPipeline};
    use crate::{
        error::ThumbgridError,
        grid::GridPlan,
        metadata::VideoMetadata,
        source::FrameSource,
    };

    /// Alternates between two aspect ratios so annotated frames in one row
    /// disagree on height.
    struct DriftingSource {
        metadata: VideoMetadata,
        reads: u64,
    }

    impl DriftingSource {
        fn new() -> Self {
            Self {
                metadata: VideoMetadata {
                    width: 640,
                    height: 480,
                    frames_per_second: 25.0,
                    frame_count: 10_000,
                },
                reads: 0,
            }
        }
    }

    impl FrameSource for DriftingSource {
        fn metadata(&self) -> &VideoMetadata {
            &self.metadata
        }

        fn read_frame(
            &mut self,
            _frame_number: u64,
        ) -> Result<Option<DynamicImage>, ThumbgridError> {
            self.reads += 1;
            let frame = if self.reads % 2 == 0 {
                DynamicImage::new_rgb8(640, 360)
            } else {
                DynamicImage::new_rgb8(640, 480)
            };
            Ok(Some(frame))
        }
    }

    /// Fails every read at the source level, which aborts sampling.
    struct DeadSource(VideoMetadata);

    impl FrameSource for DeadSource {
        fn metadata(&self) -> &VideoMetadata {
            &self.0
        }

        fn read_frame(
            &mut self,
            _frame_number: u64,
        ) -> Result<Option<DynamicImage>, ThumbgridError> {
            Err(ThumbgridError::Ffmpeg("demuxer gave up".to_string()))
        }
    }

    fn assert_placeholder_on_disk(path: &std::path::Path) {
        let written = image::open(path).expect("Failed to read placeholder back");
        assert_eq!((written.width(), written.height()), (1, 1));
        assert_eq!(written.to_rgb8().get_pixel(0, 0).0, [0, 0, 0]);
    }

    #[test]
    fn dimension_drift_falls_back_to_placeholder() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let video_path = dir.path().join("clip.mp4");
        let thumbnail_path = dir.path().join("clip_thumbnail.png");

        let pipeline = ThumbnailPipeline::new(SheetOptions::new());
        let mut source = DriftingSource::new();
        let plan = GridPlan {
            columns: 2,
            rows: 1,
            frame_interval: 100,
            source_width: 640,
        };

        let outcome = pipeline.generate(&mut source, &plan, &video_path, &thumbnail_path);

        assert_eq!(outcome, SheetOutcome::Placeholder(thumbnail_path.clone()));
        assert_placeholder_on_disk(&thumbnail_path);
    }

    #[test]
    fn sampling_abort_falls_back_to_placeholder() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let video_path = dir.path().join("clip.mp4");
        let thumbnail_path = dir.path().join("clip_thumbnail.png");

        let pipeline = ThumbnailPipeline::new(SheetOptions::new());
        let mut source = DeadSource(VideoMetadata {
            width: 640,
            height: 480,
            frames_per_second: 25.0,
            frame_count: 10_000,
        });
        let plan = GridPlan {
            columns: 2,
            rows: 2,
            frame_interval: 100,
            source_width: 640,
        };

        let outcome = pipeline.generate(&mut source, &plan, &video_path, &thumbnail_path);

        assert_eq!(outcome, SheetOutcome::Placeholder(thumbnail_path.clone()));
        assert_placeholder_on_disk(&thumbnail_path);
    }
}
