//! Media-related data models.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Media kind enum. Selects which token and grouping rules apply and
/// which TMDB search endpoint is queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Show,
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Movie => write!(f, "movie"),
            MediaKind::Show => write!(f, "show"),
        }
    }
}

/// One token extracted from a path segment.
///
/// A single segment may yield several tokens, e.g. `show1 - S02E01-02`
/// yields a title, a season and an episode range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathToken {
    /// Residual free text of a segment after all other rules consumed
    /// their matches.
    Title(String),
    /// A parenthesized 4-digit year.
    Year(u16),
    /// A season number from `season NN`, `SNN` or `SxxEyy` markers.
    Season(u16),
    /// An episode number, with an inclusive end for `SxxEyy-zz` ranges.
    Episode { start: u16, end: Option<u16> },
    /// Trailing language code or name on a subtitle filename.
    LanguageHint(String),
    /// The segment is a subtitle filename.
    SubtitleMarker,
    /// An embedded `[identifier=...]` tag left by a previous run.
    CatalogId(String),
}

/// Inclusive episode range. Single episodes have `start == end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeRange {
    pub start: u16,
    pub end: u16,
}

impl EpisodeRange {
    /// Build a range from a start and an optional end, keeping the
    /// `end >= start` invariant.
    pub fn new(start: u16, end: Option<u16>) -> Self {
        let end = end.unwrap_or(start).max(start);
        Self { start, end }
    }

    /// Whether `episode` falls inside this range.
    pub fn contains(&self, episode: u16) -> bool {
        self.start <= episode && episode <= self.end
    }
}

impl std::fmt::Display for EpisodeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.end > self.start {
            write!(f, "E{:02}-{:02}", self.start, self.end)
        } else {
            write!(f, "E{:02}", self.start)
        }
    }
}

/// A subtitle file attached to a media unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleRef {
    /// Path relative to the library root.
    pub path: PathBuf,
    /// Language hint parsed from the filename, as an ISO 639-1 code.
    pub language: Option<String>,
}

/// One logical movie or episode-group inferred from the source tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaUnit {
    /// Movie or episode-group.
    pub kind: MediaKind,
    /// Display title inferred from the first titled path segment.
    pub title: String,
    /// Release year, when any path segment carried one.
    pub year: Option<u16>,
    /// Season number. Always present for episode units.
    pub season: Option<u16>,
    /// Episode range. Always present for episode units.
    pub episode: Option<EpisodeRange>,
    /// Media files belonging to this unit, in discovery order.
    pub source_paths: Vec<PathBuf>,
    /// Associated subtitle files.
    pub subtitles: Vec<SubtitleRef>,
    /// Catalog identifier found embedded in the source path, if the
    /// tree was renamed by a previous run.
    pub embedded_id: Option<String>,
}

/// One candidate returned by the title-search collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Catalog identifier.
    pub id: String,
    /// Display name in the collaborator's response language.
    pub display_name: String,
    /// First release / air year.
    pub year: Option<u16>,
    /// Alternate titles (original title etc.).
    pub alternate_titles: Vec<String>,
}

/// A candidate together with its similarity score against the query.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    /// Normalized edit-distance similarity in `[0, 1]`.
    pub score: f32,
}

/// A media unit after title resolution. The original descriptor is
/// kept intact so unresolved units can still be reported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedUnit {
    pub unit: MediaUnit,
    /// Selected catalog identifier, absent on a miss or operator skip.
    pub catalog_id: Option<String>,
    /// Similarity score of the selected candidate, 0.0 when unresolved.
    pub match_confidence: f32,
    /// Whether the search returned more than one candidate.
    pub ambiguous: bool,
}

impl ResolvedUnit {
    /// A resolved unit with no catalog match.
    pub fn unresolved(unit: MediaUnit) -> Self {
        Self {
            unit,
            catalog_id: None,
            match_confidence: 0.0,
            ambiguous: false,
        }
    }
}
