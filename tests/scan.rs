//! Directory scan integration tests.

use std::fs;
use std::sync::{Arc, Mutex};

use tempfile::TempDir;
use thumbgrid::{
    DirectoryWalker, OperationType, ProgressCallback, ProgressInfo, SheetOptions, is_video_file,
};

struct RecordingProgress {
    infos: Mutex<Vec<ProgressInfo>>,
}

impl ProgressCallback for RecordingProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        self.infos.lock().unwrap().push(info.clone());
    }
}

// ── File discovery ─────────────────────────────────────────────────

#[test]
fn video_files_are_filtered_and_sorted() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    for name in ["b.mkv", "a.mp4", "notes.txt", "c.MOV", "archive.zip"] {
        fs::write(dir.path().join(name), b"x").expect("Failed to write file");
    }
    fs::create_dir(dir.path().join("nested.mp4")).expect("Failed to create dir");

    let walker = DirectoryWalker::new(SheetOptions::new());
    let files = walker
        .video_files(dir.path())
        .expect("Failed to list videos");

    let names: Vec<_> = files
        .iter()
        .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["a.mp4", "b.mkv", "c.MOV"]);
}

#[test]
fn is_video_file_requires_a_real_extension() {
    assert!(is_video_file(std::path::Path::new("clip.m4v")));
    assert!(!is_video_file(std::path::Path::new("clipm4v")));
    assert!(!is_video_file(std::path::Path::new("m4v")));
}

// ── Scan summaries ─────────────────────────────────────────────────

#[test]
fn empty_directory_yields_empty_summary() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let walker = DirectoryWalker::new(SheetOptions::new());
    let summary = walker.scan(dir.path()).expect("Scan failed");
    assert_eq!(summary.total(), 0);
}

#[test]
fn unreadable_videos_are_tallied_as_open_failures() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    for name in ["one.mp4", "two.avi", "three.mkv"] {
        fs::write(dir.path().join(name), b"not a container").expect("Failed to write file");
    }

    let walker = DirectoryWalker::new(SheetOptions::new());
    let summary = walker.scan(dir.path()).expect("Scan failed");

    assert_eq!(summary.total(), 3);
    assert_eq!(summary.open_failed, 3);
    assert_eq!(summary.persisted, 0);
    assert_eq!(summary.placeholders, 0);
}

#[test]
fn existing_sheets_are_tallied_as_skipped() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(dir.path().join("clip.mp4"), b"x").expect("Failed to write file");
    fs::write(dir.path().join("clip_thumbnail.png"), b"sheet").expect("Failed to write sheet");

    let walker = DirectoryWalker::new(SheetOptions::new());
    let summary = walker.scan(dir.path()).expect("Scan failed");

    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.total(), 1);
}

#[test]
fn missing_directory_is_an_error() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let walker = DirectoryWalker::new(SheetOptions::new());
    assert!(walker.scan(&dir.path().join("gone")).is_err());
}

// ── Progress reporting ─────────────────────────────────────────────

#[test]
fn scan_reports_directory_progress_per_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    for name in ["one.mp4", "two.mkv"] {
        fs::write(dir.path().join(name), b"x").expect("Failed to write file");
    }

    let recorder = Arc::new(RecordingProgress {
        infos: Mutex::new(Vec::new()),
    });
    let walker = DirectoryWalker::new(SheetOptions::new().with_progress(recorder.clone()));
    walker.scan(dir.path()).expect("Scan failed");

    let infos = recorder.infos.lock().unwrap();
    let scan_infos: Vec<_> = infos
        .iter()
        .filter(|info| info.operation == OperationType::DirectoryScan)
        .collect();

    assert_eq!(scan_infos.len(), 2);
    assert_eq!(scan_infos[0].current, 1);
    assert_eq!(scan_infos[1].current, 2);
    for info in &scan_infos {
        assert_eq!(info.total, Some(2));
    }
}
