//! FFmpeg log level configuration.
//!
//! FFmpeg has its own internal logging, separate from the Rust `log` crate,
//! and by default prints warnings and errors to stderr. Corrupt inputs make
//! that very noisy during a batch scan, so this module wraps FFmpeg's
//! log-level API without forcing callers to import `ffmpeg-next` directly.
//!
//! This controls FFmpeg's console output only; Rust-side diagnostics go
//! through a standard `log` subscriber such as `env_logger`.

use ffmpeg_next::util::log::Level;

/// FFmpeg internal log verbosity level.
///
/// Maps directly to FFmpeg's `AV_LOG_*` constants. Ordering, most verbose to
/// most quiet: `Trace` > `Debug` > `Verbose` > `Info` > `Warning` > `Error`
/// > `Fatal` > `Panic` > `Quiet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FfmpegLogLevel {
    /// Print no output at all.
    Quiet,
    /// Only unrecoverable conditions that abort the process.
    Panic,
    /// Only unrecoverable errors (the context becomes invalid).
    Fatal,
    /// Recoverable errors.
    Error,
    /// Warnings (FFmpeg's default level).
    Warning,
    /// Informational messages.
    Info,
    /// Verbose informational messages.
    Verbose,
    /// Debugging messages.
    Debug,
    /// Extremely verbose tracing output.
    Trace,
}

impl FfmpegLogLevel {
    fn to_ffmpeg_level(self) -> Level {
        match self {
            FfmpegLogLevel::Quiet => Level::Quiet,
            FfmpegLogLevel::Panic => Level::Panic,
            FfmpegLogLevel::Fatal => Level::Fatal,
            FfmpegLogLevel::Error => Level::Error,
            FfmpegLogLevel::Warning => Level::Warning,
            FfmpegLogLevel::Info => Level::Info,
            FfmpegLogLevel::Verbose => Level::Verbose,
            FfmpegLogLevel::Debug => Level::Debug,
            FfmpegLogLevel::Trace => Level::Trace,
        }
    }
}

/// Set the FFmpeg internal log verbosity level.
///
/// # Example
///
/// ```no_run
/// use thumbgrid::FfmpegLogLevel;
///
/// // Only show errors and above while scanning.
/// thumbgrid::set_ffmpeg_log_level(FfmpegLogLevel::Error);
/// ```
pub fn set_ffmpeg_log_level(level: FfmpegLogLevel) {
    ffmpeg_next::util::log::set_level(level.to_ffmpeg_level());
}
