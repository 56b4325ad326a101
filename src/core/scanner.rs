//! Directory scanner module.
//!
//! Walks a library root and snapshots it into media and subtitle file
//! lists, with paths kept relative to the root. All later pipeline
//! stages operate on this snapshot only.

use crate::utils::fs::{ensure_directory, is_subtitle_file, is_video_file};
use crate::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Result of scanning a library root.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Media files, relative to the root, sorted.
    pub media: Vec<PathBuf>,
    /// Subtitle files, relative to the root, sorted.
    pub subtitles: Vec<PathBuf>,
    /// Total files seen, including skipped ones.
    pub total_files: usize,
}

/// Scan a library root for media and subtitle files.
///
/// Files with other extensions (nfo, jpg, txt, ...) are counted but
/// otherwise ignored.
pub fn scan_library(root: &Path) -> Result<ScanResult> {
    ensure_directory(root)?;

    let mut result = ScanResult::default();

    for entry in WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        result.total_files += 1;

        let relative = match entry.path().strip_prefix(root) {
            Ok(rel) => rel.to_path_buf(),
            Err(_) => continue,
        };

        if is_video_file(&relative) {
            result.media.push(relative);
        } else if is_subtitle_file(&relative) {
            result.subtitles.push(relative);
        }
    }

    // Sort for a deterministic discovery order
    result.media.sort();
    result.subtitles.sort();

    tracing::info!(
        "Scanned {} files: {} media, {} subtitles",
        result.total_files,
        result.media.len(),
        result.subtitles.len()
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_scan_nonexistent_path() {
        assert!(scan_library(Path::new("/nonexistent/path")).is_err());
    }
}
