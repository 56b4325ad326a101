//! Rename command implementation.
//!
//! Drives the full pipeline: scan -> tokenize/build -> associate
//! subtitles -> resolve titles -> build plan -> execute (or simulate).

use crate::cli::args::Cli;
use crate::core::descriptor::{describe, group_units};
use crate::core::executor::{execute_plan, ExecuteMode};
use crate::core::planner::build_plan;
use crate::core::resolver::{resolve_units, Disambiguate, Selection};
use crate::core::scanner::scan_library;
use crate::core::subtitles::associate;
use crate::models::media::{MediaKind, MediaUnit, ScoredCandidate};
use crate::models::plan::{save_plan, OrphanSubtitle, RenamePlan, UnresolvedUnit};
use crate::services::tmdb::TmdbClient;
use crate::Result;
use chrono::Utc;
use colored::Colorize;
use std::collections::HashSet;
use std::io::Write;

/// Execute the rename command.
pub async fn run(args: &Cli) -> Result<()> {
    let kind = MediaKind::from(args.media);

    let source = std::fs::canonicalize(&args.path)
        .map_err(|_| crate::Error::PathNotFound(args.path.display().to_string()))?;
    crate::utils::fs::ensure_directory(&source)?;

    // Output lands next to the library, per the original layout
    let output_root = source
        .parent()
        .map(|p| p.join(&args.output))
        .unwrap_or_else(|| source.join(&args.output));

    println!("{}", "Planning library rename...".bold().cyan());
    println!();
    println!("  {} {}", "Source:".bold(), source.display());
    println!("  {} {}", "Output:".bold(), output_root.display());
    println!("  {} {}", "Type:".bold(), kind);
    println!();

    let client = TmdbClient::from_env()?;
    if !client.verify_api_key().await? {
        return Err(crate::Error::TmdbApiKeyInvalid);
    }

    // Step 1: Scan the library
    println!("{}", "Scanning library...".bold());
    let scan = scan_library(&source)?;
    println!(
        "   Found {} media files, {} subtitle files",
        scan.media.len(),
        scan.subtitles.len()
    );

    // Step 2: Build descriptors and group them into units
    let mut unparseable = Vec::new();
    let mut descriptors = Vec::new();
    for path in &scan.media {
        match describe(path, kind) {
            Ok(desc) => descriptors.push(desc),
            Err(report) => unparseable.push(report),
        }
    }
    let mut units = group_units(descriptors);
    println!("   Grouped into {} units", units.len());

    // Step 3: Associate subtitles
    let mut orphans = Vec::new();
    let mut subtitle_descriptors = Vec::new();
    for path in &scan.subtitles {
        match describe(path, kind) {
            Ok(desc) => subtitle_descriptors.push(desc),
            Err(report) => orphans.push(OrphanSubtitle {
                path: report.path,
                reason: report.reason,
            }),
        }
    }
    orphans.extend(associate(&mut units, subtitle_descriptors));

    // Step 4: Resolve against TMDB
    println!("{}", "Resolving titles against TMDB...".bold());
    let mut prompt = PromptDisambiguator;
    let disambiguator: Option<&mut dyn Disambiguate> = if args.no_interact {
        None
    } else {
        Some(&mut prompt)
    };
    let outcome = resolve_units(units, &client, disambiguator).await?;

    let failed_titles: HashSet<&str> = outcome
        .failures
        .iter()
        .map(|f| f.title.as_str())
        .collect();
    let unresolved: Vec<UnresolvedUnit> = outcome
        .units
        .iter()
        .filter(|r| r.catalog_id.is_none())
        .map(|r| UnresolvedUnit {
            title: r.unit.title.clone(),
            year: r.unit.year,
            season: r.unit.season,
            episode: r.unit.episode,
            reason: if failed_titles.contains(r.unit.title.as_str()) {
                "title search failed".to_string()
            } else if r.ambiguous {
                "no candidate selected".to_string()
            } else {
                "no match found".to_string()
            },
        })
        .collect();

    // Step 5: Build the plan
    let plan_outcome = build_plan(&outcome.units);
    let plan = RenamePlan {
        version: "1.0".to_string(),
        created_at: Utc::now().to_rfc3339(),
        kind,
        source_root: source.clone(),
        output_root: output_root.clone(),
        entries: plan_outcome.entries,
        collisions: plan_outcome.collisions,
        orphan_subtitles: orphans,
        unparseable,
        unresolved,
        search_failures: outcome.failures,
    };

    if let Some(path) = &args.plan {
        save_plan(&plan, path)?;
        println!("{} {}", "Plan saved to:".bold().green(), path.display());
    }

    // Step 6: Execute
    let mode = if args.dry_run {
        ExecuteMode::Simulate
    } else {
        ExecuteMode::Move
    };
    let summary = execute_plan(&plan, mode)?;

    print_summary(&plan, args.dry_run, summary.moved.max(summary.markers));

    Ok(())
}

fn print_summary(plan: &RenamePlan, dry_run: bool, applied: usize) {
    println!();
    println!("{}", "Summary".bold().green());
    let verb = if dry_run { "Markers written:" } else { "Files moved:" };
    println!("  {} {}", verb.bold(), applied);
    println!("  {} {}", "Unresolved units:".bold(), plan.unresolved.len());
    println!(
        "  {} {}",
        "Orphan subtitles:".bold(),
        plan.orphan_subtitles.len()
    );
    println!("  {} {}", "Unparseable files:".bold(), plan.unparseable.len());
    println!("  {} {}", "Collisions:".bold(), plan.collisions.len());

    for unit in &plan.unresolved {
        println!(
            "  {} {} ({}): {}",
            "untagged".yellow(),
            unit.title,
            unit.year.map(|y| y.to_string()).unwrap_or_else(|| "?".to_string()),
            unit.reason
        );
    }
    for orphan in &plan.orphan_subtitles {
        println!(
            "  {} {}: {}",
            "orphan".yellow(),
            orphan.path.display(),
            orphan.reason
        );
    }
    for report in &plan.unparseable {
        println!(
            "  {} {}: {}",
            "skipped".yellow(),
            report.path.display(),
            report.reason
        );
    }
    for collision in &plan.collisions {
        println!(
            "  {} {} <- {} sources",
            "collision".red(),
            collision.destination.display(),
            collision.sources.len()
        );
    }
}

/// Stdin-backed candidate selection.
struct PromptDisambiguator;

impl Disambiguate for PromptDisambiguator {
    fn choose(&mut self, unit: &MediaUnit, candidates: &[ScoredCandidate]) -> Selection {
        println!();
        match unit.year {
            Some(year) => println!("Multiple matches found for {} ({})", unit.title, year),
            None => println!("Multiple matches found for {}", unit.title),
        }
        println!("Please select one of the following:");
        for (i, scored) in candidates.iter().enumerate() {
            let year = scored
                .candidate
                .year
                .map(|y| y.to_string())
                .unwrap_or_else(|| "????".to_string());
            println!(
                "{}: {} ({}) id={} [similarity {:.2}]",
                i + 1,
                scored.candidate.display_name,
                year,
                scored.candidate.id,
                scored.score
            );
        }

        loop {
            print!("Selection (number, or s to skip): ");
            let _ = std::io::stdout().flush();

            let mut line = String::new();
            if std::io::stdin().read_line(&mut line).is_err() {
                return Selection::Skip;
            }
            let line = line.trim();

            if line.eq_ignore_ascii_case("s") {
                return Selection::Skip;
            }
            match line.parse::<usize>() {
                Ok(n) if n >= 1 && n <= candidates.len() => return Selection::Pick(n - 1),
                _ => println!("Invalid selection"),
            }
        }
    }
}
