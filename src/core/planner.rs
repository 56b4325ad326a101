//! Plan builder module.
//!
//! Derives deterministic destination paths for resolved units and
//! detects destination collisions. The resolved catalog identifier is
//! embedded as a bracketed tag on the title component, so missing tags
//! stay visually auditable after a run.

use crate::models::media::{MediaKind, ResolvedUnit};
use crate::models::plan::{CollisionReport, EntryMetadata, RenamePlanEntry};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Entries plus the collisions excluded from them.
#[derive(Debug, Default)]
pub struct PlanOutcome {
    pub entries: Vec<RenamePlanEntry>,
    pub collisions: Vec<CollisionReport>,
}

/// Build the rename plan for a batch of resolved units.
///
/// Destinations are relative to the output root. Two distinct sources
/// mapping to one destination are both withheld and reported; the
/// plan never overwrites.
pub fn build_plan(resolved: &[ResolvedUnit]) -> PlanOutcome {
    let mut entries = Vec::new();

    for unit in resolved {
        entries.extend(unit_entries(unit));
    }

    detect_collisions(entries)
}

/// Entries for one unit: its media files plus associated subtitles.
fn unit_entries(resolved: &ResolvedUnit) -> Vec<RenamePlanEntry> {
    let unit = &resolved.unit;
    let mut entries = Vec::new();

    let dir = destination_dir(resolved);
    let stem = destination_stem(resolved);
    let multi_part = unit.source_paths.len() > 1;

    for (index, source) in unit.source_paths.iter().enumerate() {
        // Files legitimately split across parts must not self-collide
        let part = if multi_part {
            format!(" - part{}", index + 1)
        } else {
            String::new()
        };
        let filename = match extension_of(source) {
            Some(ext) => format!("{}{}.{}", stem, part, ext),
            None => format!("{}{}", stem, part),
        };
        entries.push(RenamePlanEntry {
            source: source.clone(),
            destination: dir.join(filename),
            metadata: metadata_for(resolved, None),
        });
    }

    for sub in &unit.subtitles {
        let lang = sub
            .language
            .as_deref()
            .map(|l| format!(".{}", l))
            .unwrap_or_default();
        let filename = match extension_of(&sub.path) {
            Some(ext) => format!("{}{}.{}", stem, lang, ext),
            None => format!("{}{}", stem, lang),
        };
        entries.push(RenamePlanEntry {
            source: sub.path.clone(),
            destination: dir.join(filename),
            metadata: metadata_for(resolved, sub.language.clone()),
        });
    }

    entries
}

/// Directory a unit's files land in:
/// `{title} ({year}) [identifier=<id>]` for movies, with a
/// `season NN` level below it for episodes.
fn destination_dir(resolved: &ResolvedUnit) -> PathBuf {
    let unit = &resolved.unit;

    let mut component = sanitize_component(&unit.title);
    if let Some(year) = unit.year {
        component.push_str(&format!(" ({})", year));
    }
    if let Some(id) = resolved.catalog_id.as_deref() {
        component.push_str(&format!(" [identifier={}]", id));
    }

    match unit.kind {
        MediaKind::Movie => PathBuf::from(component),
        MediaKind::Show => {
            let season = unit.season.unwrap_or(1);
            PathBuf::from(component).join(format!("season {:02}", season))
        }
    }
}

/// Filename stem shared by a unit's files and subtitles.
fn destination_stem(resolved: &ResolvedUnit) -> String {
    let unit = &resolved.unit;
    let title = sanitize_component(&unit.title);

    match (unit.kind, unit.episode) {
        (MediaKind::Show, Some(range)) => {
            format!(
                "{} - S{:02}{}",
                title,
                unit.season.unwrap_or(1),
                range
            )
        }
        _ => title,
    }
}

fn metadata_for(resolved: &ResolvedUnit, language: Option<String>) -> EntryMetadata {
    let unit = &resolved.unit;
    EntryMetadata {
        title: unit.title.clone(),
        year: unit.year,
        season: unit.season,
        episode: unit.episode,
        catalog_id: resolved.catalog_id.clone(),
        language,
        match_confidence: resolved.match_confidence,
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension().map(|e| e.to_string_lossy().into_owned())
}

/// Strip characters that are hostile to common filesystems.
fn sanitize_component(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ':' | '*' | '?' | '"' | '<' | '>' | '|' | '/' | '\\'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Split entries into an executable set and collision reports.
///
/// Identical (source, destination) pairs are deduplicated first; what
/// remains colliding comes from genuinely distinct sources.
fn detect_collisions(entries: Vec<RenamePlanEntry>) -> PlanOutcome {
    let mut seen = std::collections::HashSet::new();
    let deduped: Vec<RenamePlanEntry> = entries
        .into_iter()
        .filter(|e| seen.insert((e.source.clone(), e.destination.clone())))
        .collect();

    let mut by_destination: BTreeMap<PathBuf, Vec<usize>> = BTreeMap::new();
    for (i, entry) in deduped.iter().enumerate() {
        by_destination
            .entry(entry.destination.clone())
            .or_default()
            .push(i);
    }

    let mut excluded = vec![false; deduped.len()];
    let mut collisions = Vec::new();

    for (destination, indices) in &by_destination {
        if indices.len() > 1 {
            for &i in indices {
                excluded[i] = true;
            }
            collisions.push(CollisionReport {
                destination: destination.clone(),
                sources: indices.iter().map(|&i| deduped[i].source.clone()).collect(),
            });
        }
    }

    let entries = deduped
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !excluded[*i])
        .map(|(_, e)| e)
        .collect();

    PlanOutcome {
        entries,
        collisions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_component() {
        assert_eq!(sanitize_component("show: two?"), "show two");
        assert_eq!(sanitize_component("a/b\\c"), "abc");
        assert_eq!(sanitize_component("plain name"), "plain name");
    }
}
