//! Frame annotation: thumbnail resizing and timestamp overlay.
//!
//! Each sampled frame is scaled to the grid's cell width (aspect ratio
//! preserved, never below 400 pixels wide) and stamped with its position in
//! the video as `H:MM:SS.mmm`, white, anti-aliased, near the top-left
//! corner. The overlay draws in place on the resized buffer.

use std::path::Path;

use image::{DynamicImage, Rgb, imageops::FilterType};
use rusttype::{Font, Scale, point};

/// Minimum thumbnail width in pixels.
const MIN_THUMBNAIL_WIDTH: u32 = 400;

/// Timestamp anchor, in pixels from the frame's top-left corner. The
/// vertical component is the text baseline.
const OVERLAY_POSITION: (f32, f32) = (10.0, 20.0);

/// Glyph height of the overlay text, in pixels.
const OVERLAY_SCALE: f32 = 16.0;

const OVERLAY_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// Common system font locations, tried in order.
///
/// Any proportional TrueType face works for the timestamp; these cover the
/// stock installs on Linux, macOS, and Windows.
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
    "/Library/Fonts/Arial.ttf",
    "C:/Windows/Fonts/arial.ttf",
    "C:/Windows/Fonts/segoeui.ttf",
];

/// A loaded timestamp font.
#[derive(Clone)]
pub struct TimestampFont {
    font: Font<'static>,
}

impl TimestampFont {
    /// Load a font from an explicit TTF/TTC path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let bytes = std::fs::read(path.as_ref()).ok()?;
        let font = Font::try_from_vec(bytes)?;
        Some(Self { font })
    }

    /// Probe the standard system font locations.
    ///
    /// Returns `None` when no candidate exists; the caller decides how to
    /// degrade (the pipeline skips the overlay with a warning).
    pub fn load_default() -> Option<Self> {
        FONT_CANDIDATES.iter().find_map(Self::from_path)
    }
}

/// Resizes sampled frames and burns in their timestamps.
///
/// Constructed once per video by the pipeline; `columns` and `source_width`
/// come from the grid plan and fix the thumbnail width for every cell.
pub struct FrameAnnotator {
    target_width: u32,
    font: Option<TimestampFont>,
}

impl FrameAnnotator {
    /// Create an annotator for a grid of `columns` cells across a video of
    /// `source_width` pixels.
    ///
    /// The cell width is `source_width / columns`, floored at 400 pixels.
    /// With `font = None` annotation degrades to a plain resize.
    pub fn new(source_width: u32, columns: u32, font: Option<TimestampFont>) -> Self {
        let target_width = (source_width / columns.max(1)).max(MIN_THUMBNAIL_WIDTH);
        Self { target_width, font }
    }

    /// Thumbnail width every cell of this grid will be scaled to.
    pub fn target_width(&self) -> u32 {
        self.target_width
    }

    /// Resize `frame` to the cell width (preserving its own aspect ratio)
    /// and draw `timestamp_seconds` over it.
    pub fn annotate(&self, frame: &DynamicImage, timestamp_seconds: f64) -> DynamicImage {
        let aspect_ratio = frame.width() as f64 / frame.height().max(1) as f64;
        let target_height = ((self.target_width as f64 / aspect_ratio).round() as u32).max(1);

        let resized = frame.resize_exact(self.target_width, target_height, FilterType::Triangle);
        let mut buffer = resized.into_rgb8();

        if let Some(timestamp_font) = &self.font {
            draw_text(
                &mut buffer,
                &timestamp_font.font,
                &format_timestamp(timestamp_seconds),
                OVERLAY_POSITION,
            );
        }

        DynamicImage::ImageRgb8(buffer)
    }
}

/// Render `text` onto the buffer with anti-aliased alpha blending.
///
/// `position` is the (x, baseline-y) anchor of the first glyph.
fn draw_text(buffer: &mut image::RgbImage, font: &Font<'_>, text: &str, position: (f32, f32)) {
    let scale = Scale::uniform(OVERLAY_SCALE);
    let glyphs = font.layout(text, scale, point(position.0, position.1));

    let (width, height) = (buffer.width() as i32, buffer.height() as i32);

    for glyph in glyphs {
        let Some(bounding_box) = glyph.pixel_bounding_box() else {
            continue;
        };
        glyph.draw(|gx, gy, coverage| {
            let px = bounding_box.min.x + gx as i32;
            let py = bounding_box.min.y + gy as i32;
            if px < 0 || py < 0 || px >= width || py >= height {
                return;
            }

            let pixel = buffer.get_pixel_mut(px as u32, py as u32);
            let alpha = (coverage * 255.0) as u32;
            let inverse = 255 - alpha;
            for channel in 0..3 {
                pixel.0[channel] = ((u32::from(OVERLAY_COLOR.0[channel]) * alpha
                    + u32::from(pixel.0[channel]) * inverse)
                    / 255) as u8;
            }
        });
    }
}

/// Format a timestamp as `H:MM:SS.mmm` with exactly three decimals.
pub fn format_timestamp(timestamp_seconds: f64) -> String {
    let clamped = timestamp_seconds.max(0.0);
    let total_milliseconds = (clamped * 1000.0).round() as u64;

    let milliseconds = total_milliseconds % 1000;
    let total_seconds = total_milliseconds / 1000;
    let seconds = total_seconds % 60;
    let minutes = (total_seconds / 60) % 60;
    let hours = total_seconds / 3600;

    format!("{hours}:{minutes:02}:{seconds:02}.{milliseconds:03}")
}

#[cfg(test)]
mod tests {
    use image::DynamicImage;

    use super::{FrameAnnotator, format_timestamp};

    #[test]
    fn formats_with_three_decimals() {
        assert_eq!(format_timestamp(0.0), "0:00:00.000");
        assert_eq!(format_timestamp(1.5), "0:00:01.500");
        assert_eq!(format_timestamp(59.9994), "0:00:59.999");
        assert_eq!(format_timestamp(61.25), "0:01:01.250");
        assert_eq!(format_timestamp(3_600.0), "1:00:00.000");
        assert_eq!(format_timestamp(7_325.125), "2:02:05.125");
    }

    #[test]
    fn negative_timestamps_clamp_to_zero() {
        assert_eq!(format_timestamp(-0.5), "0:00:00.000");
    }

    #[test]
    fn cell_width_floors_at_minimum() {
        // 1920 wide over 6 columns would be 320; the floor wins.
        let annotator = FrameAnnotator::new(1920, 6, None);
        assert_eq!(annotator.target_width(), 400);

        // 3840 over 4 columns stays above the floor.
        let annotator = FrameAnnotator::new(3840, 4, None);
        assert_eq!(annotator.target_width(), 960);
    }

    #[test]
    fn resize_preserves_frame_aspect_ratio() {
        let annotator = FrameAnnotator::new(1920, 4, None);
        assert_eq!(annotator.target_width(), 480);

        // A 16:9 frame becomes 480x270.
        let frame = DynamicImage::new_rgb8(1920, 1080);
        let annotated = annotator.annotate(&frame, 0.0);
        assert_eq!((annotated.width(), annotated.height()), (480, 270));

        // A 4:3 frame in the same grid becomes 480x360.
        let frame = DynamicImage::new_rgb8(640, 480);
        let annotated = annotator.annotate(&frame, 0.0);
        assert_eq!((annotated.width(), annotated.height()), (480, 360));
    }
}
