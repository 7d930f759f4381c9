//! Frame sampling.
//!
//! Walks the grid plan's sample slots in row-major order, reading one frame
//! per slot at a fixed interval. The position counter advances by
//! `frame_interval` after every attempt, successful or not, so a failed read
//! leaves a gap in its row instead of shifting later samples. Each retrieved
//! frame is annotated immediately and grouped into its row for assembly.

use image::DynamicImage;

use crate::{
    annotate::FrameAnnotator,
    error::ThumbgridError,
    grid::GridPlan,
    progress::{NoOpProgress, OperationType, ProgressTracker},
    source::FrameSource,
};

/// Samples and annotates frames for one contact sheet.
pub struct FrameSampler<'a> {
    plan: &'a GridPlan,
    annotator: &'a FrameAnnotator,
}

impl<'a> FrameSampler<'a> {
    /// Create a sampler for the given plan and annotator.
    pub fn new(plan: &'a GridPlan, annotator: &'a FrameAnnotator) -> Self {
        Self { plan, annotator }
    }

    /// Sample `rows × columns` slots from the source.
    ///
    /// Returns the annotated frames grouped into rows. Rows can be shorter
    /// than `columns` when reads fail; the assembler's consistency checks
    /// deal with the fallout.
    ///
    /// # Errors
    ///
    /// Per-frame decode failures are recovered locally (the slot is dropped
    /// and logged). Any other source error aborts sampling.
    pub fn sample(
        &self,
        source: &mut dyn FrameSource,
    ) -> Result<Vec<Vec<DynamicImage>>, ThumbgridError> {
        let mut tracker = ProgressTracker::new(
            std::sync::Arc::new(NoOpProgress),
            OperationType::ThumbnailGeneration,
            Some(self.plan.slot_count()),
        );
        self.sample_with_tracker(source, &mut tracker)
    }

    pub(crate) fn sample_with_tracker(
        &self,
        source: &mut dyn FrameSource,
        tracker: &mut ProgressTracker,
    ) -> Result<Vec<Vec<DynamicImage>>, ThumbgridError> {
        let frames_per_second = source.metadata().frames_per_second;
        let mut rows = Vec::with_capacity(self.plan.rows as usize);
        let mut current_frame = 0_u64;

        for _ in 0..self.plan.rows {
            let mut row = Vec::with_capacity(self.plan.columns as usize);

            for _ in 0..self.plan.columns {
                match source.read_frame(current_frame) {
                    Ok(Some(frame)) => {
                        let timestamp_seconds = current_frame as f64 / frames_per_second;
                        row.push(self.annotator.annotate(&frame, timestamp_seconds));
                    }
                    Ok(None) => {
                        log::debug!("No frame at position {current_frame}; slot left empty");
                    }
                    Err(ThumbgridError::FrameDecode {
                        frame_number,
                        reason,
                    }) => {
                        log::warn!(
                            "Decode failure at frame {frame_number}: {reason}; slot left empty"
                        );
                    }
                    Err(error) => return Err(error),
                }

                tracker.advance(Some(current_frame));
                // Fixed-step scan: the interval applies even when the read
                // produced nothing.
                current_frame += self.plan.frame_interval;
            }

            rows.push(row);
        }

        Ok(rows)
    }
}
