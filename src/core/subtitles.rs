//! Subtitle associator module.
//!
//! Links subtitle descriptors to the media units whose season and
//! episode range cover them, including subtitles pooled in a sibling
//! `subs/` tree. A subtitle matching several overlapping units is
//! attached to all of them; duplicating a subtitle is better than
//! silently dropping it.

use crate::core::descriptor::MediaDescriptor;
use crate::models::media::{MediaKind, MediaUnit, SubtitleRef};
use crate::models::plan::OrphanSubtitle;
use crate::utils::text::normalize_title;

/// Attach subtitle descriptors to matching units, reporting the ones
/// that match nothing.
pub fn associate(
    units: &mut [MediaUnit],
    subtitles: Vec<MediaDescriptor>,
) -> Vec<OrphanSubtitle> {
    let mut orphans = Vec::new();

    for sub in subtitles {
        let sub_title = normalize_title(&sub.title);
        let mut matched = false;

        for unit in units.iter_mut() {
            if normalize_title(&unit.title) != sub_title {
                continue;
            }
            if !matches_unit(unit, &sub) {
                continue;
            }
            unit.subtitles.push(SubtitleRef {
                path: sub.path.clone(),
                language: sub.language.clone(),
            });
            matched = true;
        }

        if !matched {
            let reason = orphan_reason(&sub);
            orphans.push(OrphanSubtitle {
                path: sub.path,
                reason,
            });
        }
    }

    orphans
}

fn matches_unit(unit: &MediaUnit, sub: &MediaDescriptor) -> bool {
    match unit.kind {
        MediaKind::Movie => years_compatible(unit.year, sub.year),
        MediaKind::Show => {
            let (Some(episode), Some(range)) = (sub.episode, unit.episode) else {
                return false;
            };
            unit.season == sub.season && range.contains(episode.start)
        }
    }
}

fn years_compatible(a: Option<u16>, b: Option<u16>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a == b,
        _ => true,
    }
}

fn orphan_reason(sub: &MediaDescriptor) -> String {
    match (sub.kind, sub.episode) {
        (MediaKind::Show, None) => "no episode number in subtitle path".to_string(),
        (MediaKind::Show, Some(episode)) => format!(
            "episode {} of '{}' matches no unit's range",
            episode.start, sub.title
        ),
        (MediaKind::Movie, _) => format!("no movie unit titled '{}'", sub.title),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::descriptor::{describe, group_units};
    use std::path::Path;

    fn units_from(paths: &[&str], kind: MediaKind) -> Vec<MediaUnit> {
        let descriptors = paths
            .iter()
            .map(|p| describe(Path::new(p), kind).unwrap())
            .collect();
        group_units(descriptors)
    }

    #[test]
    fn test_subtitle_inherits_ancestor_season() {
        let mut units = units_from(
            &["show1/season 02/show1 - S02E01-02.mkv"],
            MediaKind::Show,
        );
        let sub = describe(
            Path::new("show1/season 02/subs/S02E01.en.srt"),
            MediaKind::Show,
        )
        .unwrap();
        // The subtitle filename has its own season marker here; the
        // pooled-layout inheritance is covered in the E-only test below.
        let orphans = associate(&mut units, vec![sub]);
        assert!(orphans.is_empty());
        assert_eq!(units[0].subtitles.len(), 1);
        assert_eq!(units[0].subtitles[0].language.as_deref(), Some("en"));
    }

    #[test]
    fn test_pooled_subtitle_without_own_season() {
        let mut units = units_from(&["show1/season 02/show1 - S02E03.mkv"], MediaKind::Show);
        let sub = describe(
            Path::new("show1/season 02/subs/E03.en.srt"),
            MediaKind::Show,
        )
        .unwrap();
        assert_eq!(sub.season, Some(2));
        let orphans = associate(&mut units, vec![sub]);
        assert!(orphans.is_empty());
        assert_eq!(units[0].subtitles.len(), 1);
    }

    #[test]
    fn test_orphan_outside_all_ranges() {
        let mut units = units_from(
            &["show1/season 02/show1 - S02E01-02.mkv"],
            MediaKind::Show,
        );
        let sub = describe(
            Path::new("show1/season 02/subs/S02E09.en.srt"),
            MediaKind::Show,
        )
        .unwrap();
        let orphans = associate(&mut units, vec![sub]);
        assert_eq!(orphans.len(), 1);
        assert!(orphans[0].reason.contains("matches no unit"));
        assert!(units[0].subtitles.is_empty());
    }

    #[test]
    fn test_overlapping_ranges_duplicate_subtitle() {
        let mut units = units_from(
            &[
                "show1/season 01/show1 - S01E01-02.mkv",
                "show1/season 01/show1 - S01E02-03.mkv",
            ],
            MediaKind::Show,
        );
        assert_eq!(units.len(), 2);
        let sub = describe(
            Path::new("show1/season 01/subs/S01E02.en.srt"),
            MediaKind::Show,
        )
        .unwrap();
        let orphans = associate(&mut units, vec![sub]);
        assert!(orphans.is_empty());
        assert_eq!(units[0].subtitles.len(), 1);
        assert_eq!(units[1].subtitles.len(), 1);
    }

    #[test]
    fn test_movie_subtitle_by_title() {
        let mut units = units_from(&["movie2/movie2.mkv"], MediaKind::Movie);
        let sub = describe(Path::new("movie2/movie2.srt"), MediaKind::Movie).unwrap();
        let orphans = associate(&mut units, vec![sub]);
        assert!(orphans.is_empty());
        assert_eq!(units[0].subtitles.len(), 1);
        assert_eq!(units[0].subtitles[0].language, None);
    }
}
