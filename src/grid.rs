//! Grid sizing.
//!
//! Picks a near-square `columns × rows` layout from the video duration and
//! derives the fixed frame-sampling interval from it. One grid cell roughly
//! corresponds to one minute of video.

use crate::metadata::VideoMetadata;

/// The sampling plan for one video: grid geometry plus the frame step.
///
/// Built via [`GridPlan::for_video`]. Invariants: `columns >= rows >= 1` and
/// `frame_interval >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct GridPlan {
    /// Number of columns in the grid.
    pub columns: u32,
    /// Number of rows in the grid.
    pub rows: u32,
    /// Distance between consecutive sample positions, in frames.
    pub frame_interval: u64,
    /// Source frame width, used by the annotator to size thumbnails.
    pub source_width: u32,
}

impl GridPlan {
    /// Build a plan from the source metadata.
    ///
    /// The grid is sized from the duration in minutes (clamped to at least
    /// one) and the interval spreads `columns × rows` samples evenly across
    /// the stream: `frame_interval = max(1, frame_count / (columns × rows))`.
    pub fn for_video(metadata: &VideoMetadata) -> Self {
        let (columns, rows) = compute_grid(metadata.duration_minutes());
        let cells = u64::from(columns) * u64::from(rows);
        let frame_interval = (metadata.frame_count / cells).max(1);

        Self {
            columns,
            rows,
            frame_interval,
            source_width: metadata.width,
        }
    }

    /// Total number of sample slots in the grid.
    pub fn slot_count(&self) -> u64 {
        u64::from(self.columns) * u64::from(self.rows)
    }
}

/// Pick the most-square factorization of the (rounded) duration.
///
/// Clamps `duration_minutes` to at least 1, then searches divisors `i` from 1
/// to `floor(sqrt(d)) + 1`, pairing each with `j = round(d / i)` and keeping
/// the pair with the smallest `|i - j|`. Later candidates must strictly
/// improve, so ties keep the first (smallest `i`) pair. Returns
/// `(columns, rows)` with `columns >= rows >= 1`.
pub fn compute_grid(duration_minutes: f64) -> (u32, u32) {
    let duration = duration_minutes.max(1.0);

    let mut best_pair = (1_u32, 1_u32);
    let mut best_difference = u32::MAX;

    let search_bound = duration.sqrt().floor() as u32 + 1;
    for i in 1..=search_bound {
        let j = (duration / f64::from(i)).round() as u32;
        let difference = i.abs_diff(j);

        if difference < best_difference {
            best_pair = (i.max(j), i.min(j).max(1));
            best_difference = difference;
        }
    }

    best_pair
}
