//! Grid layout and sheet assembly tests against the public API.

use image::DynamicImage;
use thumbgrid::{
    AssemblyError, FrameDimensions, GridPlan, VideoMetadata, assemble, compute_grid,
    format_timestamp, placeholder_image,
};

fn solid_frame(width: u32, height: u32) -> DynamicImage {
    DynamicImage::new_rgb8(width, height)
}

// ── Grid selection ─────────────────────────────────────────────────

#[test]
fn grid_is_near_square_and_wide() {
    for minutes in [0.2, 1.0, 5.0, 9.0, 30.0, 120.0, 600.0] {
        let (columns, rows) = compute_grid(minutes);
        assert!(columns >= rows, "{minutes} min gave {columns}x{rows}");
        assert!(rows >= 1);
    }
}

#[test]
fn grid_grows_with_duration() {
    let (short_cols, short_rows) = compute_grid(1.0);
    let (long_cols, long_rows) = compute_grid(400.0);
    assert!(long_cols * long_rows > short_cols * short_rows);
    assert_eq!((short_cols, short_rows), (1, 1));
}

#[test]
fn plan_interval_covers_whole_video() {
    let metadata = VideoMetadata {
        width: 1920,
        height: 1080,
        frames_per_second: 30.0,
        frame_count: 54_000, // 30 minutes
    };
    let plan = GridPlan::for_video(&metadata);

    // Stepping by the interval from frame 0 must fill every cell
    // without running past the end of the video.
    let last_sampled = (plan.slot_count() - 1) * plan.frame_interval;
    assert!(last_sampled < metadata.frame_count);
    assert!(plan.frame_interval >= 1);
}

// ── Assembly ───────────────────────────────────────────────────────

#[test]
fn assembles_uniform_rows_into_one_image() {
    let rows = vec![
        vec![solid_frame(400, 225), solid_frame(400, 225)],
        vec![solid_frame(400, 225), solid_frame(400, 225)],
    ];
    let sheet = assemble(&rows).expect("Failed to assemble");
    assert_eq!(sheet.width(), 800);
    assert_eq!(sheet.height(), 450);
}

#[test]
fn mismatched_frame_heights_are_rejected() {
    let rows = vec![vec![solid_frame(400, 225), solid_frame(400, 226)]];
    match assemble(&rows) {
        Err(AssemblyError::RowMismatch { row, .. }) => assert_eq!(row, 0),
        other => panic!("Expected RowMismatch, got: {other:?}"),
    }
}

#[test]
fn short_final_row_is_rejected() {
    let rows = vec![
        vec![solid_frame(400, 225), solid_frame(400, 225)],
        vec![solid_frame(400, 225)],
    ];
    match assemble(&rows) {
        Err(AssemblyError::GridMismatch { row, .. }) => assert_eq!(row, 1),
        other => panic!("Expected GridMismatch, got: {other:?}"),
    }
}

#[test]
fn placeholder_is_single_black_pixel() {
    let placeholder = placeholder_image();
    assert_eq!(FrameDimensions::of(&placeholder).to_string(), "1x1x3");
    assert_eq!(placeholder.to_rgb8().get_pixel(0, 0).0, [0, 0, 0]);
}

// ── Timestamps ─────────────────────────────────────────────────────

#[test]
fn timestamps_render_with_millisecond_precision() {
    assert_eq!(format_timestamp(0.0), "0:00:00.000");
    assert_eq!(format_timestamp(61.5), "0:01:01.500");
    assert_eq!(format_timestamp(3_725.25), "1:02:05.250");
    assert_eq!(format_timestamp(36_000.0), "10:00:00.000");
}
