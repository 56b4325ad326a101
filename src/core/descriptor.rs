//! Media descriptor builder module.
//!
//! Aggregates per-segment tokens into one descriptor per file, then
//! groups matching descriptors into media units. The title comes from
//! the first titled segment under the library root; deeper title-like
//! text is treated as noise once a title is fixed.

use crate::core::tokenizer::tokenize_path;
use crate::models::media::{EpisodeRange, MediaKind, MediaUnit, PathToken, SubtitleRef};
use crate::models::plan::UnparseableFile;
use std::path::{Path, PathBuf};

/// Transient per-file descriptor, before unit grouping.
#[derive(Debug, Clone)]
pub struct MediaDescriptor {
    pub path: PathBuf,
    pub kind: MediaKind,
    pub title: String,
    pub year: Option<u16>,
    pub season: Option<u16>,
    pub episode: Option<EpisodeRange>,
    /// Language hint, subtitle files only.
    pub language: Option<String>,
    pub is_subtitle: bool,
    pub embedded_id: Option<String>,
}

/// Tokenize a path and build its descriptor in one step.
pub fn describe(path: &Path, kind: MediaKind) -> Result<MediaDescriptor, UnparseableFile> {
    let tokens = tokenize_path(path);
    build(path, &tokens, kind)
}

/// Build a descriptor from per-segment tokens.
///
/// Season comes from the deepest segment carrying a season token; the
/// episode range only from the filename segment. An episode without
/// any season defaults to season 1, a documented heuristic for
/// single-season shows laid out flat.
pub fn build(
    path: &Path,
    tokens_per_segment: &[Vec<PathToken>],
    kind: MediaKind,
) -> Result<MediaDescriptor, UnparseableFile> {
    let mut title = None;
    let mut year = None;
    let mut season = None;
    let mut episode = None;
    let mut language = None;
    let mut is_subtitle = false;
    let mut embedded_id = None;

    let leaf = tokens_per_segment.len().saturating_sub(1);

    for (depth, tokens) in tokens_per_segment.iter().enumerate() {
        for token in tokens {
            match token {
                PathToken::Title(text) => {
                    if title.is_none() {
                        title = Some(text.clone());
                    }
                }
                PathToken::Year(y) => {
                    if year.is_none() {
                        year = Some(*y);
                    }
                }
                PathToken::Season(s) => {
                    // later (deeper) segments overwrite
                    season = Some(*s);
                }
                PathToken::Episode { start, end } => {
                    if depth == leaf {
                        episode = Some(EpisodeRange::new(*start, *end));
                    }
                }
                PathToken::LanguageHint(code) => {
                    if depth == leaf {
                        language = Some(code.clone());
                    }
                }
                PathToken::SubtitleMarker => {
                    if depth == leaf {
                        is_subtitle = true;
                    }
                }
                PathToken::CatalogId(id) => {
                    if embedded_id.is_none() {
                        embedded_id = Some(id.clone());
                    }
                }
            }
        }
    }

    let Some(title) = title else {
        return Err(UnparseableFile {
            path: path.to_path_buf(),
            reason: "no title found in any path segment".to_string(),
        });
    };

    match kind {
        MediaKind::Movie => {
            // Season/episode markers are meaningless for movies
            season = None;
            episode = None;
        }
        MediaKind::Show => {
            if episode.is_some() && season.is_none() {
                season = Some(1);
            }
            if episode.is_none() && !is_subtitle {
                return Err(UnparseableFile {
                    path: path.to_path_buf(),
                    reason: "no episode number found in path".to_string(),
                });
            }
        }
    }

    Ok(MediaDescriptor {
        path: path.to_path_buf(),
        kind,
        title,
        year,
        season,
        episode,
        language,
        is_subtitle,
        embedded_id,
    })
}

/// Group media descriptors into units.
///
/// Two files share a unit iff title, season and episode range match
/// exactly and their years are compatible (equal, or known on only one
/// side). When a year-less descriptor could join several units, the
/// one that already has a year wins.
pub fn group_units(descriptors: Vec<MediaDescriptor>) -> Vec<MediaUnit> {
    let mut units: Vec<MediaUnit> = Vec::new();

    for desc in descriptors {
        let matching = units
            .iter_mut()
            .enumerate()
            .filter(|(_, unit)| {
                unit.title.to_lowercase() == desc.title.to_lowercase()
                    && unit.season == desc.season
                    && unit.episode == desc.episode
                    && years_compatible(unit.year, desc.year)
            })
            .map(|(i, _)| i)
            .collect::<Vec<_>>();

        let chosen = matching
            .iter()
            .copied()
            .find(|&i| units[i].year == desc.year && desc.year.is_some())
            .or_else(|| matching.iter().copied().find(|&i| units[i].year.is_some()))
            .or_else(|| matching.first().copied());

        match chosen {
            Some(i) => {
                let unit = &mut units[i];
                unit.source_paths.push(desc.path);
                if unit.year.is_none() {
                    unit.year = desc.year;
                }
                if unit.embedded_id.is_none() {
                    unit.embedded_id = desc.embedded_id;
                }
            }
            None => {
                units.push(MediaUnit {
                    kind: desc.kind,
                    title: desc.title,
                    year: desc.year,
                    season: desc.season,
                    episode: desc.episode,
                    source_paths: vec![desc.path],
                    subtitles: Vec::<SubtitleRef>::new(),
                    embedded_id: desc.embedded_id,
                });
            }
        }
    }

    units
}

fn years_compatible(a: Option<u16>, b: Option<u16>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a == b,
        _ => true,
    }
}
