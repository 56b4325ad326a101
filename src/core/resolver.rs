//! Title resolver module.
//!
//! Resolves each media unit's inferred title against the external
//! title-search collaborator, scoring candidates with a normalized
//! edit-distance similarity and applying the selection policy. Units
//! are resolved strictly one at a time, in discovery order; a failed
//! search only marks that unit unresolved.

use crate::models::media::{Candidate, MediaKind, MediaUnit, ResolvedUnit, ScoredCandidate};
use crate::models::plan::SearchFailure;
use crate::utils::text::similarity;
use crate::Result;
use indicatif::{ProgressBar, ProgressStyle};

/// The title-search collaborator.
///
/// The returned ordering is the collaborator's relevance ordering; it
/// breaks ties but is not otherwise trusted.
#[allow(async_fn_in_trait)]
pub trait SearchProvider {
    async fn search(
        &self,
        title: &str,
        year: Option<u16>,
        kind: MediaKind,
    ) -> Result<Vec<Candidate>>;
}

/// Operator decision for an ambiguous unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Index into the scored candidate list.
    Pick(usize),
    /// Leave the unit untagged.
    Skip,
}

/// The interactive disambiguation seam.
///
/// Kept as a trait so the pipeline stays headless-testable; the CLI
/// plugs in a stdin prompt, tests plug in a script.
pub trait Disambiguate {
    fn choose(&mut self, unit: &MediaUnit, candidates: &[ScoredCandidate]) -> Selection;
}

/// Outcome of resolving a batch of units.
#[derive(Debug)]
pub struct ResolveOutcome {
    /// One entry per input unit, in input order.
    pub units: Vec<ResolvedUnit>,
    /// Units whose search call failed.
    pub failures: Vec<SearchFailure>,
}

/// Resolve all units against the search collaborator.
///
/// Individual failures are captured per unit; the run only aborts when
/// every single search call failed, since a full search outage makes
/// the remaining resolution meaningless.
pub async fn resolve_units<P: SearchProvider>(
    units: Vec<MediaUnit>,
    provider: &P,
    mut disambiguator: Option<&mut (dyn Disambiguate + '_)>,
) -> Result<ResolveOutcome> {
    let mut resolved = Vec::with_capacity(units.len());
    let mut failures = Vec::new();
    let mut attempts = 0usize;

    let pb = ProgressBar::new(units.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=>-"),
    );

    for unit in units {
        pb.set_message(unit.title.clone());
        attempts += 1;

        match provider.search(&unit.title, unit.year, unit.kind).await {
            Ok(candidates) => {
                let unit = resolve_with_candidates(unit, candidates, disambiguator.as_deref_mut(), &pb);
                resolved.push(unit);
            }
            Err(e) => {
                tracing::warn!("Search failed for '{}': {}", unit.title, e);
                failures.push(SearchFailure {
                    title: unit.title.clone(),
                    error: e.to_string(),
                });
                resolved.push(ResolvedUnit::unresolved(unit));
            }
        }

        pb.inc(1);
    }

    pb.finish_and_clear();

    if attempts > 0 && failures.len() == attempts {
        return Err(crate::Error::SearchUnavailable);
    }

    Ok(ResolveOutcome {
        units: resolved,
        failures,
    })
}

/// Apply the selection policy to one unit's candidate list.
fn resolve_with_candidates(
    unit: MediaUnit,
    candidates: Vec<Candidate>,
    disambiguator: Option<&mut (dyn Disambiguate + '_)>,
    pb: &ProgressBar,
) -> ResolvedUnit {
    if candidates.is_empty() {
        tracing::debug!("No candidates for '{}'", unit.title);
        return ResolvedUnit::unresolved(unit);
    }

    let scored: Vec<ScoredCandidate> = candidates
        .into_iter()
        .map(|candidate| ScoredCandidate {
            score: score_candidate(&unit.title, &candidate),
            candidate,
        })
        .collect();

    let ambiguous = scored.len() > 1;

    // A tag embedded by a previous run wins whenever the search still
    // returns that candidate, which keeps re-runs from re-tagging an
    // already-correct tree.
    if let Some(embedded) = unit.embedded_id.as_deref() {
        if let Some(hit) = scored.iter().find(|s| s.candidate.id == embedded) {
            let (id, confidence) = (hit.candidate.id.clone(), hit.score);
            return ResolvedUnit {
                unit,
                catalog_id: Some(id),
                match_confidence: confidence,
                ambiguous: false,
            };
        }
    }

    if !ambiguous {
        let only = &scored[0];
        let (id, confidence) = (only.candidate.id.clone(), only.score);
        return ResolvedUnit {
            unit,
            catalog_id: Some(id),
            match_confidence: confidence,
            ambiguous: false,
        };
    }

    match disambiguator {
        None => {
            // strict > keeps the collaborator's ordering on ties
            let mut best = 0;
            for (i, s) in scored.iter().enumerate() {
                if s.score > scored[best].score {
                    best = i;
                }
            }
            let (id, confidence) = (scored[best].candidate.id.clone(), scored[best].score);
            ResolvedUnit {
                unit,
                catalog_id: Some(id),
                match_confidence: confidence,
                ambiguous,
            }
        }
        Some(d) => {
            let selection = pb.suspend(|| d.choose(&unit, &scored));
            match selection {
                Selection::Pick(i) if i < scored.len() => {
                    let (id, confidence) = (scored[i].candidate.id.clone(), scored[i].score);
                    ResolvedUnit {
                        unit,
                        catalog_id: Some(id),
                        match_confidence: confidence,
                        ambiguous,
                    }
                }
                _ => ResolvedUnit {
                    unit,
                    catalog_id: None,
                    match_confidence: 0.0,
                    ambiguous,
                },
            }
        }
    }
}

/// Similarity of a candidate against the query title: the best of its
/// display name and every alternate title.
pub fn score_candidate(query: &str, candidate: &Candidate) -> f32 {
    let mut best = similarity(query, &candidate.display_name);
    for alt in &candidate.alternate_titles {
        let s = similarity(query, alt);
        if s > best {
            best = s;
        }
    }
    best
}
