//! Error types for the `thumbgrid` crate.
//!
//! This module defines [`ThumbgridError`], the unified error type returned by
//! all fallible operations in the crate. Variants carry enough context (file
//! paths, frame numbers, upstream messages) to diagnose a failure without
//! extra logging at the call site.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use image::ImageError;
use thiserror::Error;

use crate::assemble::AssemblyError;

/// The unified error type for all `thumbgrid` operations.
///
/// Every public method that can fail returns `Result<T, ThumbgridError>`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ThumbgridError {
    /// The video file could not be opened.
    #[error("Failed to open video file at {path}: {reason}")]
    SourceOpen {
        /// Path that was passed to [`crate::MediaSource::open`].
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The file does not contain a video stream.
    #[error("No video stream found in file")]
    NoVideoStream,

    /// The source reported a zero frame rate or zero frame count.
    ///
    /// Such a file cannot be planned into a grid and is skipped entirely.
    #[error("Unusable video metadata for {path}: {frames_per_second} fps, {frame_count} frames")]
    UnusableMetadata {
        /// Path of the rejected video.
        path: PathBuf,
        /// Reported frame rate.
        frames_per_second: f64,
        /// Reported total frame count.
        frame_count: u64,
    },

    /// A single frame could not be decoded mid-stream.
    ///
    /// The sampler treats this as local: the sample slot is dropped and
    /// scanning continues at the next interval position.
    #[error("Failed to decode frame {frame_number}: {reason}")]
    FrameDecode {
        /// The frame number that was requested.
        frame_number: u64,
        /// Underlying decode failure.
        reason: String,
    },

    /// Row or grid concatenation failed a dimension-consistency check.
    #[error("Grid assembly failed: {0}")]
    Assembly(#[from] AssemblyError),

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    Ffmpeg(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// An error from the `image` crate while encoding or compositing.
    #[error("Image processing error: {0}")]
    Image(#[from] ImageError),
}

impl From<FfmpegError> for ThumbgridError {
    fn from(error: FfmpegError) -> Self {
        ThumbgridError::Ffmpeg(error.to_string())
    }
}
