//! # thumbgrid
//!
//! Generate contact-sheet thumbnail grids from video files: a mosaic of
//! evenly spaced frames with burned-in timestamps, one PNG per video,
//! powered by FFmpeg via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate.
//!
//! The grid is sized from the video duration (roughly one cell per minute,
//! factored as close to a square as possible), frames are sampled at a fixed
//! interval, scaled to the cell width, stamped with their `H:MM:SS.mmm`
//! position, and concatenated into a single sheet. When a video cannot be
//! assembled cleanly the tool fails closed and writes a 1×1 black
//! placeholder instead of a malformed mosaic.
//!
//! ## Quick Start
//!
//! ### One video
//!
//! ```no_run
//! use thumbgrid::{SheetOptions, SheetOutcome, ThumbnailPipeline};
//!
//! let pipeline = ThumbnailPipeline::new(SheetOptions::new());
//! match pipeline.process("input.mp4".as_ref()) {
//!     SheetOutcome::Persisted(path) => println!("sheet at {}", path.display()),
//!     outcome => eprintln!("no sheet: {outcome:?}"),
//! }
//! ```
//!
//! ### A directory
//!
//! ```no_run
//! use thumbgrid::{DirectoryWalker, SheetOptions};
//!
//! let walker = DirectoryWalker::new(SheetOptions::new().with_overwrite(true));
//! let summary = walker.scan("videos/".as_ref())?;
//! println!("{} written, {} placeholders", summary.persisted, summary.placeholders);
//! # Ok::<(), thumbgrid::ThumbgridError>(())
//! ```
//!
//! ## Behavior
//!
//! - Videos are recognised by extension: `.mp4`, `.avi`, `.mkv`, `.mov`,
//!   `.m4v` (case-insensitive).
//! - Existing `<stem>_thumbnail.png` files are skipped unless overwriting is
//!   enabled.
//! - Unopenable files and streams reporting a zero frame rate or frame count
//!   are skipped with nothing written.
//! - Processing is strictly sequential; each video's decoder is released
//!   before the next file is touched.
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system. The
//! timestamp overlay additionally needs a TrueType font; the standard system
//! locations are probed, and sheets degrade to plain thumbnails when none is
//! found.

pub mod annotate;
pub mod assemble;
pub mod error;
pub mod ffmpeg;
pub mod grid;
pub mod metadata;
pub mod pipeline;
pub mod progress;
pub mod sampler;
pub mod source;
pub mod walker;

pub use annotate::{FrameAnnotator, TimestampFont, format_timestamp};
pub use assemble::{AssemblyError, FrameDimensions, assemble, placeholder_image};
pub use error::ThumbgridError;
pub use ffmpeg::{FfmpegLogLevel, set_ffmpeg_log_level};
pub use grid::{GridPlan, compute_grid};
pub use metadata::VideoMetadata;
pub use pipeline::{SheetOptions, SheetOutcome, ThumbnailPipeline};
pub use progress::{OperationType, ProgressCallback, ProgressInfo};
pub use sampler::FrameSampler;
pub use source::{FrameSource, MediaSource};
pub use walker::{DirectoryWalker, ScanSummary, VIDEO_EXTENSIONS, is_video_file};
