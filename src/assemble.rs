//! Contact-sheet assembly.
//!
//! Concatenates annotated frames into row images and rows into the final
//! grid. Decoded frames can drift in dimensions near stream boundaries or on
//! corrupt input, so every concatenation step checks [`FrameDimensions`] for
//! strict equality and fails closed: the pipeline substitutes a clearly
//! invalid 1×1 placeholder instead of silently writing a malformed mosaic.

use image::{DynamicImage, GenericImage, RgbImage};
use thiserror::Error;

/// Structural dimensions of a frame buffer, compared for equality before
/// concatenation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameDimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Color channel count (3 for RGB, 4 for RGBA).
    pub channels: u8,
}

impl FrameDimensions {
    /// Read the dimensions of an image buffer.
    pub fn of(image: &DynamicImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            channels: image.color().channel_count(),
        }
    }
}

impl std::fmt::Display for FrameDimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}x{}", self.width, self.height, self.channels)
    }
}

/// A concatenation failure. Any variant makes the whole video fall back to
/// the placeholder image.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum AssemblyError {
    /// No rows were produced at all.
    #[error("no rows to assemble")]
    EmptyGrid,

    /// A row ended up with no frames (every read in it failed).
    #[error("row {row} contains no frames")]
    EmptyRow {
        /// Zero-based row index.
        row: usize,
    },

    /// Frames within a row disagree on dimensions.
    #[error("row {row} mixes frame dimensions: expected {expected}, found {found}")]
    RowMismatch {
        /// Zero-based row index.
        row: usize,
        /// Dimensions of the row's first frame.
        expected: FrameDimensions,
        /// The first deviating dimensions.
        found: FrameDimensions,
    },

    /// Row images disagree on dimensions (typically a short row).
    #[error("grid mixes row dimensions: expected {expected}, found {found} at row {row}")]
    GridMismatch {
        /// Zero-based index of the deviating row image.
        row: usize,
        /// Dimensions of the first row image.
        expected: FrameDimensions,
        /// The deviating row image's dimensions.
        found: FrameDimensions,
    },
}

/// Concatenate sampled rows into the final contact sheet.
///
/// Step one joins each row's frames left-to-right; step two stacks the row
/// images top-to-bottom. Both steps require strict dimension equality.
/// Assembly is pure: identical inputs produce byte-identical output.
///
/// # Errors
///
/// Returns an [`AssemblyError`] describing the first inconsistency found.
pub fn assemble(rows: &[Vec<DynamicImage>]) -> Result<DynamicImage, AssemblyError> {
    if rows.is_empty() {
        return Err(AssemblyError::EmptyGrid);
    }

    let mut row_images = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        row_images.push(concat_row(index, row)?);
    }

    concat_rows(&row_images).map(DynamicImage::ImageRgb8)
}

/// Join one row's frames left-to-right into a single image.
fn concat_row(row_index: usize, frames: &[DynamicImage]) -> Result<RgbImage, AssemblyError> {
    let Some(first) = frames.first() else {
        return Err(AssemblyError::EmptyRow { row: row_index });
    };

    let expected = FrameDimensions::of(first);
    for frame in &frames[1..] {
        let found = FrameDimensions::of(frame);
        if found != expected {
            return Err(AssemblyError::RowMismatch {
                row: row_index,
                expected,
                found,
            });
        }
    }

    let row_width = expected.width * frames.len() as u32;
    let mut row_image = RgbImage::new(row_width, expected.height);
    for (column, frame) in frames.iter().enumerate() {
        let x = column as u32 * expected.width;
        // copy_from can only fail on a dimension mismatch, which the check
        // above already rules out.
        let _ = row_image.copy_from(&frame.to_rgb8(), x, 0);
    }

    Ok(row_image)
}

/// Stack row images top-to-bottom into the grid.
fn concat_rows(row_images: &[RgbImage]) -> Result<RgbImage, AssemblyError> {
    let expected = row_dimensions(&row_images[0]);
    for (index, row_image) in row_images.iter().enumerate().skip(1) {
        let found = row_dimensions(row_image);
        if found != expected {
            return Err(AssemblyError::GridMismatch {
                row: index,
                expected,
                found,
            });
        }
    }

    let grid_height = expected.height * row_images.len() as u32;
    let mut grid = RgbImage::new(expected.width, grid_height);
    for (index, row_image) in row_images.iter().enumerate() {
        let y = index as u32 * expected.height;
        let _ = grid.copy_from(row_image, 0, y);
    }

    Ok(grid)
}

fn row_dimensions(row_image: &RgbImage) -> FrameDimensions {
    FrameDimensions {
        width: row_image.width(),
        height: row_image.height(),
        channels: 3,
    }
}

/// The 1×1 black image written when assembly fails.
///
/// Deliberately unusable as a thumbnail: it marks the source as processed
/// while signalling that no valid sheet could be produced.
pub fn placeholder_image() -> DynamicImage {
    DynamicImage::new_rgb8(1, 1)
}

#[cfg(test)]
mod tests {
    use image::DynamicImage;

    use super::{AssemblyError, FrameDimensions, assemble, placeholder_image};

    fn frame(width: u32, height: u32) -> DynamicImage {
        DynamicImage::new_rgb8(width, height)
    }

    #[test]
    fn uniform_row_concatenates() {
        let rows = vec![vec![frame(400, 100), frame(400, 100), frame(400, 100)]];
        let grid = assemble(&rows).expect("uniform row should assemble");
        assert_eq!((grid.width(), grid.height()), (1200, 100));
    }

    #[test]
    fn mismatched_heights_fail_the_row() {
        let rows = vec![vec![frame(400, 100), frame(400, 101), frame(400, 100)]];
        let error = assemble(&rows).unwrap_err();
        assert!(matches!(error, AssemblyError::RowMismatch { row: 0, .. }));
    }

    #[test]
    fn mismatched_channels_fail_the_row() {
        let rows = vec![vec![frame(400, 100), DynamicImage::new_rgba8(400, 100)]];
        let error = assemble(&rows).unwrap_err();
        assert!(matches!(error, AssemblyError::RowMismatch { .. }));
    }

    #[test]
    fn short_row_fails_the_grid() {
        // Second row lost a frame to a failed read: narrower row image.
        let rows = vec![
            vec![frame(400, 100), frame(400, 100)],
            vec![frame(400, 100)],
        ];
        let error = assemble(&rows).unwrap_err();
        assert!(matches!(error, AssemblyError::GridMismatch { row: 1, .. }));
    }

    #[test]
    fn empty_inputs_are_rejected() {
        assert_eq!(assemble(&[]).unwrap_err(), AssemblyError::EmptyGrid);

        let rows = vec![vec![frame(400, 100)], vec![]];
        assert_eq!(
            assemble(&rows).unwrap_err(),
            AssemblyError::EmptyRow { row: 1 }
        );
    }

    #[test]
    fn assembly_is_deterministic() {
        let rows = vec![
            vec![frame(400, 100), frame(400, 100)],
            vec![frame(400, 100), frame(400, 100)],
        ];
        let first = assemble(&rows).unwrap();
        let second = assemble(&rows).unwrap();
        assert_eq!(first.as_bytes(), second.as_bytes());
        assert_eq!((first.width(), first.height()), (800, 200));
    }

    #[test]
    fn placeholder_is_single_black_pixel() {
        let image = placeholder_image();
        assert_eq!(
            FrameDimensions::of(&image),
            FrameDimensions {
                width: 1,
                height: 1,
                channels: 3
            }
        );
        assert_eq!(image.to_rgb8().get_pixel(0, 0).0, [0, 0, 0]);
    }
}
