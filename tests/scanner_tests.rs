//! Integration tests for the scanner module.

use media_renamer::core::scanner::scan_library;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[test]
fn test_scan_empty_directory() {
    let temp_dir = TempDir::new().unwrap();
    let result = scan_library(temp_dir.path()).unwrap();

    assert!(result.media.is_empty());
    assert!(result.subtitles.is_empty());
}

#[test]
fn test_scan_classifies_media_and_subtitles() {
    let temp_dir = TempDir::new().unwrap();

    let season = temp_dir.path().join("show1").join("season 02");
    fs::create_dir_all(season.join("subs")).unwrap();
    fs::write(season.join("show1 - S02E01-02.mkv"), "fake video").unwrap();
    fs::write(season.join("subs").join("S02E01.en.srt"), "fake sub").unwrap();
    fs::write(season.join("notes.txt"), "not media").unwrap();

    let result = scan_library(temp_dir.path()).unwrap();

    assert_eq!(
        result.media,
        vec![PathBuf::from("show1/season 02/show1 - S02E01-02.mkv")]
    );
    assert_eq!(
        result.subtitles,
        vec![PathBuf::from("show1/season 02/subs/S02E01.en.srt")]
    );
    assert_eq!(result.total_files, 3);
}

#[test]
fn test_scan_returns_sorted_relative_paths() {
    let temp_dir = TempDir::new().unwrap();

    fs::create_dir_all(temp_dir.path().join("b")).unwrap();
    fs::create_dir_all(temp_dir.path().join("a")).unwrap();
    fs::write(temp_dir.path().join("b").join("b.mkv"), "fake").unwrap();
    fs::write(temp_dir.path().join("a").join("a.mkv"), "fake").unwrap();

    let result = scan_library(temp_dir.path()).unwrap();

    assert_eq!(
        result.media,
        vec![PathBuf::from("a/a.mkv"), PathBuf::from("b/b.mkv")]
    );
}

#[test]
fn test_scan_nonexistent_path() {
    assert!(scan_library(Path::new("/nonexistent/path")).is_err());
}

#[test]
fn test_scan_file_instead_of_directory() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("movie.mkv");
    fs::write(&file, "fake").unwrap();

    assert!(scan_library(&file).is_err());
}
