//! Video metadata types.
//!
//! [`VideoMetadata`] is extracted once when a source is opened and cached for
//! the lifetime of the handle. The pipeline rejects sources whose metadata
//! fails [`VideoMetadata::is_usable`] before any decoding happens.

/// Metadata for the video stream of an opened source.
///
/// Includes dimensions, frame rate, and the estimated frame count computed
/// from the container duration.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct VideoMetadata {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Frames per second (may be approximate for variable-frame-rate content).
    pub frames_per_second: f64,
    /// Estimated total number of frames, computed from duration and frame rate.
    pub frame_count: u64,
}

impl VideoMetadata {
    /// Whether this stream can be planned into a thumbnail grid.
    ///
    /// Both the frame rate and the frame count must be nonzero; a grid plan
    /// divides by both.
    pub fn is_usable(&self) -> bool {
        self.frames_per_second > 0.0 && self.frame_count > 0
    }

    /// Video duration in minutes, derived from frame count and frame rate.
    pub fn duration_minutes(&self) -> f64 {
        self.frame_count as f64 / (self.frames_per_second * 60.0)
    }
}
