//! Rename plan data model.

use super::media::{EpisodeRange, MediaKind};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Plan file structure. Fully computed in memory before any filesystem
/// mutation happens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenamePlan {
    /// Plan format version.
    pub version: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Media kind of the run.
    pub kind: MediaKind,
    /// Library root the source paths are relative to.
    pub source_root: PathBuf,
    /// Output root the destination paths are relative to.
    pub output_root: PathBuf,
    /// Executable entries. Destinations are unique across the plan.
    pub entries: Vec<RenamePlanEntry>,
    /// Destination collisions, excluded from the executable entries.
    pub collisions: Vec<CollisionReport>,
    /// Subtitles that matched no unit.
    pub orphan_subtitles: Vec<OrphanSubtitle>,
    /// Files whose path could not be parsed into a unit.
    pub unparseable: Vec<UnparseableFile>,
    /// Units kept untagged because resolution found no match.
    pub unresolved: Vec<UnresolvedUnit>,
    /// Per-unit search collaborator failures.
    pub search_failures: Vec<SearchFailure>,
}

/// One source file mapped to its destination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenamePlanEntry {
    /// Source path, relative to the library root.
    pub source: PathBuf,
    /// Destination path, relative to the output root.
    pub destination: PathBuf,
    /// Metadata of the originating unit, written into marker files in
    /// simulation mode.
    pub metadata: EntryMetadata,
}

/// Unit metadata carried by each plan entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryMetadata {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode: Option<EpisodeRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_id: Option<String>,
    /// Language hint, set on subtitle entries only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub match_confidence: f32,
}

/// Two or more distinct source files mapping to one destination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollisionReport {
    pub destination: PathBuf,
    pub sources: Vec<PathBuf>,
}

/// A subtitle file that could not be associated to any unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrphanSubtitle {
    pub path: PathBuf,
    pub reason: String,
}

/// A file whose path yielded no usable media descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnparseableFile {
    pub path: PathBuf,
    pub reason: String,
}

/// A unit that stayed untagged after resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnresolvedUnit {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode: Option<EpisodeRange>,
    pub reason: String,
}

/// A search call that failed for one unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchFailure {
    pub title: String,
    pub error: String,
}

/// Save a plan to a JSON file.
pub fn save_plan(plan: &RenamePlan, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(plan)?;
    std::fs::write(path, json)?;
    tracing::info!("Plan saved to {}", path.display());
    Ok(())
}

/// Load a plan from a JSON file.
pub fn load_plan(path: &Path) -> Result<RenamePlan> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| crate::Error::InvalidPlanFile(format!("{}: {}", path.display(), e)))?;
    let plan = serde_json::from_str(&content)
        .map_err(|e| crate::Error::InvalidPlanFile(format!("{}: {}", path.display(), e)))?;
    Ok(plan)
}
