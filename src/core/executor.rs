//! Plan executor module.
//!
//! Applies a fully-computed plan. Real mode moves files; simulation
//! mode builds the destination tree out of marker text files carrying
//! each entry's metadata, so a dry run can be inspected before any
//! media file is touched.

use crate::models::plan::{RenamePlan, RenamePlanEntry};
use crate::utils::fs::move_file;
use crate::Result;
use std::path::{Path, PathBuf};

/// How a plan is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecuteMode {
    /// Move source files to their destinations.
    Move,
    /// Write `<destination>.txt` marker files instead.
    Simulate,
}

/// Execution counters for the summary line.
#[derive(Debug, Default)]
pub struct ExecuteSummary {
    pub moved: usize,
    pub markers: usize,
}

/// Apply a plan's entries.
///
/// The plan is complete before this is called, so a failure here never
/// leaves the engine with a half-computed state; it aborts mid-apply
/// with the filesystem reflecting exactly the entries already done.
pub fn execute_plan(plan: &RenamePlan, mode: ExecuteMode) -> Result<ExecuteSummary> {
    let mut summary = ExecuteSummary::default();

    for entry in &plan.entries {
        let destination = plan.output_root.join(&entry.destination);
        if let Some(parent) = destination.parent() {
            std::fs::create_dir_all(parent)?;
        }

        match mode {
            ExecuteMode::Move => {
                let source = plan.source_root.join(&entry.source);
                tracing::debug!("{} -> {}", source.display(), destination.display());
                move_file(&source, &destination)?;
                summary.moved += 1;
            }
            ExecuteMode::Simulate => {
                write_marker(plan, entry, &destination)?;
                summary.markers += 1;
            }
        }
    }

    Ok(summary)
}

fn write_marker(plan: &RenamePlan, entry: &RenamePlanEntry, destination: &Path) -> Result<()> {
    let marker_path = append_txt(destination);
    let mut content = format!(
        "source: {}\ndestination: {}\n",
        plan.source_root.join(&entry.source).display(),
        destination.display()
    );
    content.push_str(&serde_json::to_string_pretty(&entry.metadata)?);
    content.push('\n');
    std::fs::write(marker_path, content)?;
    Ok(())
}

fn append_txt(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.push_str(".txt");
    path.with_file_name(name)
}
