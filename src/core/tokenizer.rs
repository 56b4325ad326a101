//! Path tokenizer module.
//!
//! Splits a library-relative path into segments and extracts
//! season/episode/year/language tokens from each segment with pattern
//! rules applied in a fixed priority order. Pure functions over
//! segment strings; matched text is consumed so the residue can become
//! the title token.

use crate::models::media::PathToken;
use crate::utils::fs::is_subtitle_file;
use crate::utils::lang::detect_language;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

// An identifier tag left behind by a previous run, e.g. [identifier=42]
static RE_CATALOG_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[identifier=([^\]\s]+)\]").unwrap());

// S02E01-02 and S02E01-E02: contiguous multi-episode files
static RE_SE_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bS(\d{1,2})\s*E(\d{1,3})\s*-\s*E?(\d{1,3})\b").unwrap());

// S02E01
static RE_SE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bS(\d{1,2})\s*E(\d{1,3})\b").unwrap());

// "season 02" directories
static RE_SEASON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bseason\s*(\d{1,2})\b").unwrap());

// Bare S02 marker. The word boundary keeps it from matching inside
// S02E01, which the combined patterns above already consumed.
static RE_SEASON_SHORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bS(\d{1,2})\b").unwrap());

// E03 or E03-04 without a season prefix
static RE_EPISODE_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bE(\d{1,3})(?:\s*-\s*E?(\d{1,3}))?\b").unwrap());

// A parenthesized 4-digit number is always a year; an unparenthesized
// one stays part of the title.
static RE_YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[(\[](\d{4})[)\]]").unwrap());

/// Tokenize a library-relative path into per-segment token lists.
///
/// The leaf segment is tokenized on its extension-stripped stem;
/// subtitle leaves additionally yield a marker and a language hint.
pub fn tokenize_path(path: &Path) -> Vec<Vec<PathToken>> {
    let segments: Vec<String> = path
        .iter()
        .map(|s| s.to_string_lossy().into_owned())
        .collect();
    let last = segments.len().saturating_sub(1);
    let is_subtitle = is_subtitle_file(path);

    segments
        .iter()
        .enumerate()
        .map(|(i, segment)| {
            if i == last {
                let stem = Path::new(segment)
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| segment.clone());
                tokenize_segment(&stem, is_subtitle)
            } else {
                tokenize_segment(segment, false)
            }
        })
        .collect()
}

/// Tokenize one path segment.
///
/// Rules run in priority order; each match is consumed from the
/// working text. Whatever survives becomes the title token, or no
/// token at all when nothing survives.
pub fn tokenize_segment(segment: &str, subtitle_leaf: bool) -> Vec<PathToken> {
    let mut tokens = Vec::new();
    let mut text = segment.to_string();

    let mut language = None;
    if subtitle_leaf {
        language = take_language_hint(&mut text);
    }

    let catalog_id = take_first(&RE_CATALOG_TAG, &mut text)
        .and_then(|groups| groups.into_iter().next().flatten());

    // Separators normalized before pattern matching, as the patterns
    // assume space-delimited words.
    text = text.replace(['.', '_'], " ");

    let mut season = None;
    let mut episode = None;

    if let Some(groups) = take_first(&RE_SE_RANGE, &mut text) {
        let s = parse_group(&groups, 0);
        let start = parse_group(&groups, 1);
        let end = parse_group(&groups, 2);
        if let (Some(s), Some(start)) = (s, start) {
            season = Some(s);
            episode = Some((start, end));
        }
    }

    if season.is_none() {
        if let Some(groups) = take_first(&RE_SE, &mut text) {
            let s = parse_group(&groups, 0);
            let start = parse_group(&groups, 1);
            if let (Some(s), Some(start)) = (s, start) {
                season = Some(s);
                episode = Some((start, None));
            }
        }
    }

    if season.is_none() {
        if let Some(groups) = take_first(&RE_SEASON_WORD, &mut text) {
            season = parse_group(&groups, 0);
        }
    }

    if season.is_none() {
        if let Some(groups) = take_first(&RE_SEASON_SHORT, &mut text) {
            season = parse_group(&groups, 0);
        }
    }

    if episode.is_none() {
        if let Some(groups) = take_first(&RE_EPISODE_ONLY, &mut text) {
            if let Some(start) = parse_group(&groups, 0) {
                episode = Some((start, parse_group(&groups, 1)));
            }
        }
    }

    let mut year = None;
    if let Some(groups) = take_first(&RE_YEAR, &mut text) {
        year = parse_group(&groups, 0);
    }

    let title = clean_residue(&text);
    if !title.is_empty() {
        tokens.push(PathToken::Title(title));
    }
    if let Some(y) = year {
        tokens.push(PathToken::Year(y));
    }
    if let Some(s) = season {
        tokens.push(PathToken::Season(s));
    }
    if let Some((start, end)) = episode {
        tokens.push(PathToken::Episode { start, end });
    }
    if let Some(id) = catalog_id {
        tokens.push(PathToken::CatalogId(id));
    }
    if let Some(code) = language {
        tokens.push(PathToken::LanguageHint(code));
    }
    if subtitle_leaf {
        tokens.push(PathToken::SubtitleMarker);
    }

    tokens
}

/// Remove the first match of `re` from `text`, returning its capture
/// groups as owned strings.
fn take_first(re: &Regex, text: &mut String) -> Option<Vec<Option<String>>> {
    let caps = re.captures(text)?;
    let whole = caps.get(0)?;
    let range = whole.range();
    let groups = (1..caps.len())
        .map(|i| caps.get(i).map(|g| g.as_str().to_string()))
        .collect();
    text.replace_range(range, " ");
    Some(groups)
}

fn parse_group(groups: &[Option<String>], index: usize) -> Option<u16> {
    groups.get(index)?.as_deref()?.parse().ok()
}

/// Pull a trailing language marker out of a dot-separated subtitle
/// stem, e.g. `S02E01.en` or `show - S02E02.spanish`. Only the last
/// two parts are considered; anything deeper is title territory.
fn take_language_hint(stem: &mut String) -> Option<String> {
    let parts: Vec<&str> = stem.split('.').collect();
    if parts.len() < 2 {
        return None;
    }

    let start = parts.len().saturating_sub(2);
    for idx in (start..parts.len()).rev() {
        if let Some(code) = detect_language(parts[idx]) {
            let mut remaining = parts;
            remaining.remove(idx);
            let rebuilt = remaining.join(".");
            *stem = rebuilt;
            return Some(code);
        }
    }

    None
}

/// Clean the unconsumed residue of a segment into title text:
/// leftover empty bracket pairs dropped, whitespace collapsed,
/// dangling separators trimmed.
fn clean_residue(text: &str) -> String {
    let without_empty_brackets = text.replace("()", " ").replace("[]", " ");
    let collapsed = without_empty_brackets
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    collapsed
        .trim_matches(|c: char| c == '-' || c == ',' || c.is_whitespace())
        .to_string()
}
