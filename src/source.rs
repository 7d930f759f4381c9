//! Video frame sources.
//!
//! [`FrameSource`] is the seam between the sampling pipeline and the actual
//! decoder: it exposes cached [`VideoMetadata`] and random-access frame
//! reads. [`MediaSource`] is the FFmpeg-backed implementation; tests drive
//! the sampler with synthetic sources instead.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    time::Duration,
};

use ffmpeg_next::{
    Rational,
    codec::context::Context as CodecContext,
    format::{Pixel, context::Input},
    frame::Video as VideoFrame,
    media::Type,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::{DynamicImage, RgbImage};

use crate::{error::ThumbgridError, metadata::VideoMetadata};

/// An opaque source of decoded video frames.
///
/// `read_frame` seeks to the requested frame number and decodes it. A return
/// of `Ok(None)` means the stream is exhausted at that position (the sample
/// slot stays empty); `Err(ThumbgridError::FrameDecode)` is a local,
/// recoverable failure for that one frame. Any other error is a source-level
/// fault that aborts the whole video.
pub trait FrameSource {
    /// Cached metadata for the video stream.
    fn metadata(&self) -> &VideoMetadata;

    /// Seek to `frame_number` and decode the frame at (or nearest after) it.
    fn read_frame(&mut self, frame_number: u64)
    -> Result<Option<DynamicImage>, ThumbgridError>;
}

/// FFmpeg-backed [`FrameSource`] for a video file on disk.
///
/// Created via [`MediaSource::open`], this holds the demuxer context and the
/// metadata extracted at open time. The demuxer and any per-read decoder are
/// released when the value is dropped, on every exit path.
///
/// # Example
///
/// ```no_run
/// use thumbgrid::{FrameSource, MediaSource};
///
/// let mut source = MediaSource::open("input.mp4")?;
/// println!(
///     "{}x{} @ {:.2} fps",
///     source.metadata().width,
///     source.metadata().height,
///     source.metadata().frames_per_second,
/// );
/// let frame = source.read_frame(0)?;
/// # Ok::<(), thumbgrid::ThumbgridError>(())
/// ```
pub struct MediaSource {
    input_context: Input,
    metadata: VideoMetadata,
    video_stream_index: usize,
    time_base: Rational,
    file_path: PathBuf,
}

impl Debug for MediaSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("MediaSource")
            .field("metadata", &self.metadata)
            .field("video_stream_index", &self.video_stream_index)
            .field("file_path", &self.file_path)
            .finish_non_exhaustive()
    }
}

impl MediaSource {
    /// Open a video file for frame reads.
    ///
    /// Initializes FFmpeg (idempotent), opens the file, locates the best
    /// video stream, and caches dimensions, frame rate, and the frame count
    /// estimated from the container duration.
    ///
    /// # Errors
    ///
    /// Returns [`ThumbgridError::SourceOpen`] if the file cannot be opened or
    /// its video stream cannot be inspected, and
    /// [`ThumbgridError::NoVideoStream`] if the file has no video stream.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ThumbgridError> {
        let path = path.as_ref();
        let file_path = path.to_path_buf();

        log::debug!("Opening video file: {}", file_path.display());

        // Initialise ffmpeg (safe to call multiple times).
        ffmpeg_next::init().map_err(|error| ThumbgridError::SourceOpen {
            path: file_path.clone(),
            reason: format!("FFmpeg initialisation failed: {error}"),
        })?;

        let input_context =
            ffmpeg_next::format::input(&path).map_err(|error| ThumbgridError::SourceOpen {
                path: file_path.clone(),
                reason: error.to_string(),
            })?;

        let stream = input_context
            .streams()
            .best(Type::Video)
            .ok_or(ThumbgridError::NoVideoStream)?;
        let video_stream_index = stream.index();
        let time_base = stream.time_base();

        let decoder_context = CodecContext::from_parameters(stream.parameters()).map_err(
            |error| ThumbgridError::SourceOpen {
                path: file_path.clone(),
                reason: format!("Failed to read video codec parameters: {error}"),
            },
        )?;
        let decoder =
            decoder_context
                .decoder()
                .video()
                .map_err(|error| ThumbgridError::SourceOpen {
                    path: file_path.clone(),
                    reason: format!("Failed to create video decoder: {error}"),
                })?;

        let width = decoder.width();
        let height = decoder.height();

        // Frames per second from the stream's average frame rate, falling
        // back to the raw rate field.
        let frame_rate = stream.avg_frame_rate();
        let frames_per_second = if frame_rate.denominator() != 0 {
            frame_rate.numerator() as f64 / frame_rate.denominator() as f64
        } else {
            let rate = stream.rate();
            if rate.denominator() != 0 {
                rate.numerator() as f64 / rate.denominator() as f64
            } else {
                0.0
            }
        };

        let duration_microseconds = input_context.duration();
        let duration = if duration_microseconds > 0 {
            Duration::from_micros(duration_microseconds as u64)
        } else {
            Duration::ZERO
        };

        let frame_count = if frames_per_second > 0.0 {
            (duration.as_secs_f64() * frames_per_second) as u64
        } else {
            0
        };

        let metadata = VideoMetadata {
            width,
            height,
            frames_per_second,
            frame_count,
        };

        log::debug!(
            "Opened {}: {}x{}, {:.2} fps, ~{} frames",
            file_path.display(),
            metadata.width,
            metadata.height,
            metadata.frames_per_second,
            metadata.frame_count,
        );

        Ok(Self {
            input_context,
            metadata,
            video_stream_index,
            time_base,
            file_path,
        })
    }

    /// Path this source was opened from.
    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

impl FrameSource for MediaSource {
    fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    /// Seek to the nearest keyframe before `frame_number` and decode forward
    /// until the target (or the first frame past it) is reached.
    fn read_frame(
        &mut self,
        frame_number: u64,
    ) -> Result<Option<DynamicImage>, ThumbgridError> {
        if self.metadata.frame_count > 0 && frame_number >= self.metadata.frame_count {
            return Ok(None);
        }

        let frames_per_second = self.metadata.frames_per_second;
        let target_width = self.metadata.width;
        let target_height = self.metadata.height;
        let time_base = self.time_base;

        let decode_error = |error: ffmpeg_next::Error| ThumbgridError::FrameDecode {
            frame_number,
            reason: error.to_string(),
        };

        // Build a fresh decoder from the stream parameters for this read.
        let stream = self
            .input_context
            .stream(self.video_stream_index)
            .ok_or(ThumbgridError::NoVideoStream)?;
        let codec_parameters = stream.parameters();
        let decoder_context = CodecContext::from_parameters(codec_parameters)
            .map_err(decode_error)?;
        let mut decoder = decoder_context.decoder().video().map_err(decode_error)?;

        // Pixel-format converter: source format -> RGB24 at native size.
        let mut scaler = ScalingContext::get(
            decoder.format(),
            decoder.width(),
            decoder.height(),
            Pixel::RGB24,
            target_width,
            target_height,
            ScalingFlags::BILINEAR,
        )
        .map_err(decode_error)?;

        let target_timestamp =
            frame_number_to_stream_timestamp(frame_number, frames_per_second, time_base);
        self.input_context
            .seek(target_timestamp, ..target_timestamp)
            .map_err(decode_error)?;

        let mut decoded_frame = VideoFrame::empty();
        let mut rgb_frame = VideoFrame::empty();

        for (stream, packet) in self.input_context.packets() {
            if stream.index() != self.video_stream_index {
                continue;
            }

            decoder.send_packet(&packet).map_err(decode_error)?;

            while decoder.receive_frame(&mut decoded_frame).is_ok() {
                let pts = decoded_frame.pts().unwrap_or(0);
                let current = pts_to_frame_number(pts, time_base, frames_per_second);

                // A seek can land past the exact index; the first frame at
                // or after the target is the sample for this slot.
                if current >= frame_number {
                    scaler.run(&decoded_frame, &mut rgb_frame).map_err(decode_error)?;
                    return convert_frame_to_image(&rgb_frame, target_width, target_height)
                        .map(Some);
                }
            }
        }

        // Flush the decoder.
        decoder.send_eof().map_err(decode_error)?;
        while decoder.receive_frame(&mut decoded_frame).is_ok() {
            let pts = decoded_frame.pts().unwrap_or(0);
            let current = pts_to_frame_number(pts, time_base, frames_per_second);

            if current >= frame_number {
                scaler.run(&decoded_frame, &mut rgb_frame).map_err(decode_error)?;
                return convert_frame_to_image(&rgb_frame, target_width, target_height)
                    .map(Some);
            }
        }

        // Stream exhausted before the target; the slot stays empty.
        Ok(None)
    }
}

/// Convert a scaled RGB24 video frame to an [`image::DynamicImage`].
fn convert_frame_to_image(
    rgb_frame: &VideoFrame,
    width: u32,
    height: u32,
) -> Result<DynamicImage, ThumbgridError> {
    let buffer = frame_to_rgb_buffer(rgb_frame, width, height);
    let rgb_image = RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
        ThumbgridError::Ffmpeg(
            "Failed to construct RGB image from decoded frame data".to_string(),
        )
    })?;
    Ok(DynamicImage::ImageRgb8(rgb_image))
}

/// Copy pixel data from an FFmpeg video frame into a tightly-packed RGB
/// buffer, stripping any per-row stride padding.
fn frame_to_rgb_buffer(video_frame: &VideoFrame, width: u32, height: u32) -> Vec<u8> {
    let stride = video_frame.stride(0);
    let expected_stride = (width as usize) * 3;
    let data = video_frame.data(0);

    if stride == expected_stride {
        data[..expected_stride * (height as usize)].to_vec()
    } else {
        let mut buffer = Vec::with_capacity(expected_stride * (height as usize));
        for row in 0..(height as usize) {
            let row_start = row * stride;
            buffer.extend_from_slice(&data[row_start..row_start + expected_stride]);
        }
        buffer
    }
}

/// Convert a frame number to a timestamp in the stream's time base.
fn frame_number_to_stream_timestamp(
    frame_number: u64,
    frames_per_second: f64,
    time_base: Rational,
) -> i64 {
    let seconds = frame_number as f64 / frames_per_second;
    let numerator = time_base.numerator() as f64;
    let denominator = time_base.denominator() as f64;
    (seconds * denominator / numerator) as i64
}

/// Rescale a PTS value to a frame number.
fn pts_to_frame_number(pts: i64, time_base: Rational, frames_per_second: f64) -> u64 {
    let seconds = pts as f64 * time_base.numerator() as f64 / time_base.denominator() as f64;
    (seconds * frames_per_second) as u64
}
