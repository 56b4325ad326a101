//! Integration tests for descriptor grouping, subtitle association and
//! plan building, driven through the public pipeline API.

use media_renamer::core::descriptor::{describe, group_units};
use media_renamer::core::planner::build_plan;
use media_renamer::core::subtitles::associate;
use media_renamer::models::media::{EpisodeRange, MediaKind, MediaUnit, ResolvedUnit};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

fn units_from(paths: &[&str], kind: MediaKind) -> Vec<MediaUnit> {
    let descriptors = paths
        .iter()
        .map(|p| describe(Path::new(p), kind).expect(p))
        .collect();
    group_units(descriptors)
}

#[test]
fn test_episode_range_groups_into_one_unit() {
    let units = units_from(&["show1/season 02/show1 - S02E01-02.mkv"], MediaKind::Show);

    assert_eq!(units.len(), 1);
    let unit = &units[0];
    assert_eq!(unit.title, "show1");
    assert_eq!(unit.season, Some(2));
    assert_eq!(unit.episode, Some(EpisodeRange { start: 1, end: 2 }));
}

#[test]
fn test_distinct_episodes_stay_distinct_units() {
    let units = units_from(
        &[
            "show2/show2 - S01E01.mkv",
            "show2/show2 - S01E02.mkv",
            "show2/show2 - S02E01-02.mkv",
        ],
        MediaKind::Show,
    );

    assert_eq!(units.len(), 3);
    assert!(units.iter().all(|u| u.title == "show2"));
}

#[test]
fn test_split_episode_files_share_a_unit() {
    let units = units_from(
        &[
            "show1/season 01/show1 - S01E01.mkv",
            "show1/season 01/cd2/show1 - S01E01.mkv",
        ],
        MediaKind::Show,
    );

    assert_eq!(units.len(), 1);
    assert_eq!(units[0].source_paths.len(), 2);
}

#[test]
fn test_yearless_file_merges_into_unit_with_year() {
    let units = units_from(
        &["movie1 (2014)/movie1.mkv", "movie1/movie1-extra.mkv"],
        MediaKind::Movie,
    );

    // Both directories title the unit "movie1"; the yearless file
    // joins the unit that already knows its year.
    assert_eq!(units.len(), 1);
    assert_eq!(units[0].year, Some(2014));
    assert_eq!(units[0].source_paths.len(), 2);
}

#[test]
fn test_subtitle_association_spec_example() {
    let mut units = units_from(&["show1/season 02/show1 - S02E01-02.mkv"], MediaKind::Show);
    let sub = describe(
        Path::new("show1/season 02/subs/S02E01.en.srt"),
        MediaKind::Show,
    )
    .unwrap();

    let orphans = associate(&mut units, vec![sub]);

    assert!(orphans.is_empty());
    assert_eq!(units[0].subtitles.len(), 1);
    assert_eq!(units[0].subtitles[0].language.as_deref(), Some("en"));
}

#[test]
fn test_plan_for_episode_unit_with_subtitle() {
    let mut units = units_from(&["show1/season 02/show1 - S02E01-02.mkv"], MediaKind::Show);
    let sub = describe(
        Path::new("show1/season 02/subs/S02E01.en.srt"),
        MediaKind::Show,
    )
    .unwrap();
    associate(&mut units, vec![sub]);

    let resolved: Vec<ResolvedUnit> = units.into_iter().map(ResolvedUnit::unresolved).collect();
    let outcome = build_plan(&resolved);

    assert!(outcome.collisions.is_empty());
    let destinations: Vec<&PathBuf> = outcome.entries.iter().map(|e| &e.destination).collect();
    assert!(destinations.contains(&&PathBuf::from(
        "show1/season 02/show1 - S02E01-02.mkv"
    )));
    assert!(destinations.contains(&&PathBuf::from(
        "show1/season 02/show1 - S02E01-02.en.srt"
    )));
}

#[test]
fn test_plan_embeds_identifier_tag() {
    let units = units_from(&["movie1 (2014)/movie1.mkv"], MediaKind::Movie);
    let mut resolved = ResolvedUnit::unresolved(units.into_iter().next().unwrap());
    resolved.catalog_id = Some("42".to_string());
    resolved.match_confidence = 1.0;

    let outcome = build_plan(&[resolved]);

    assert_eq!(outcome.entries.len(), 1);
    assert_eq!(
        outcome.entries[0].destination,
        PathBuf::from("movie1 (2014) [identifier=42]/movie1.mkv")
    );
}

#[test]
fn test_unresolved_unit_keeps_untagged_shape() {
    let units = units_from(&["movie1 (2014)/movie1.mkv"], MediaKind::Movie);
    let resolved = ResolvedUnit::unresolved(units.into_iter().next().unwrap());

    let outcome = build_plan(&[resolved]);

    assert_eq!(
        outcome.entries[0].destination,
        PathBuf::from("movie1 (2014)/movie1.mkv")
    );
}

#[test]
fn test_destination_collision_is_reported_not_overwritten() {
    // Distinct titles that sanitize to the same destination component
    let units = units_from(
        &[
            "show2? (2010)/show2? - S01E01.mkv",
            "show2 (2010)/show2 - S01E01.mkv",
        ],
        MediaKind::Show,
    );
    assert_eq!(units.len(), 2);

    let resolved: Vec<ResolvedUnit> = units.into_iter().map(ResolvedUnit::unresolved).collect();
    let outcome = build_plan(&resolved);

    assert_eq!(outcome.collisions.len(), 1);
    assert_eq!(outcome.collisions[0].sources.len(), 2);
    assert_eq!(
        outcome.collisions[0].destination,
        PathBuf::from("show2 (2010)/season 01/show2 - S01E01.mkv")
    );
    // both entries are withheld from the executable plan
    assert!(outcome.entries.is_empty());
}

#[test]
fn test_multi_part_unit_does_not_self_collide() {
    let units = units_from(
        &[
            "show1/season 01/show1 - S01E01.mkv",
            "show1/season 01/cd2/show1 - S01E01.mkv",
        ],
        MediaKind::Show,
    );
    let resolved: Vec<ResolvedUnit> = units.into_iter().map(ResolvedUnit::unresolved).collect();
    let outcome = build_plan(&resolved);

    assert!(outcome.collisions.is_empty());
    let names: Vec<String> = outcome
        .entries
        .iter()
        .map(|e| e.destination.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert!(names.contains(&"show1 - S01E01 - part1.mkv".to_string()));
    assert!(names.contains(&"show1 - S01E01 - part2.mkv".to_string()));
}

#[test]
fn test_collision_freedom_invariant() {
    let units = units_from(
        &[
            "show1/season 01/show1 - S01E01.mkv",
            "show1/season 01/show1 - S01E02.mkv",
            "show1/season 02/show1 - S02E01-02.mkv",
            "other show/season 01/other show - S01E01.mkv",
        ],
        MediaKind::Show,
    );
    let resolved: Vec<ResolvedUnit> = units.into_iter().map(ResolvedUnit::unresolved).collect();
    let outcome = build_plan(&resolved);

    let mut seen = HashSet::new();
    for entry in &outcome.entries {
        assert!(
            seen.insert(entry.destination.clone()),
            "duplicate destination {:?}",
            entry.destination
        );
    }
}

#[test]
fn test_subtitle_duplicated_into_overlapping_units() {
    let mut units = units_from(
        &[
            "show1/season 01/show1 - S01E01-02.mkv",
            "show1/season 01/show1 - S01E02-03.mkv",
        ],
        MediaKind::Show,
    );
    let sub = describe(
        Path::new("show1/season 01/subs/S01E02.en.srt"),
        MediaKind::Show,
    )
    .unwrap();
    let orphans = associate(&mut units, vec![sub]);
    assert!(orphans.is_empty());

    let resolved: Vec<ResolvedUnit> = units.into_iter().map(ResolvedUnit::unresolved).collect();
    let outcome = build_plan(&resolved);

    // The one subtitle source appears twice, once per unit destination
    let sub_entries: Vec<_> = outcome
        .entries
        .iter()
        .filter(|e| e.source == PathBuf::from("show1/season 01/subs/S01E02.en.srt"))
        .collect();
    assert_eq!(sub_entries.len(), 2);
    assert!(outcome.collisions.is_empty());
}
