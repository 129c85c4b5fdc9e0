//! Elimination controller: repeated batches over a shrinking roster,
//! evicting the weakest agent each generation until one survivor remains.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use dilemma_core::{Agent, RoundSnapshot};

use crate::{BatchRunner, TournamentError};

/// What one generation decided.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GenerationOutcome {
    /// Exactly one agent held the minimum mean score and was evicted.
    Eliminated { identity: String },
    /// Two or more agents tied exactly at the minimum; nobody was evicted
    /// and the generation is re-run on the unchanged roster.
    Tied { identities: Vec<String> },
    /// The tie-retry cap was exhausted; the tie was broken
    /// deterministically (lexicographically smallest identity evicted).
    TieBroken {
        identity: String,
        tied: Vec<String>,
    },
}

/// Record of one generation: mean scores before any eviction, plus the
/// decision taken.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub generation: u32,
    /// Mean score per surviving agent, sorted best first.
    pub mean_scores: Vec<(String, f64)>,
    pub runs_completed: u32,
    pub outcome: GenerationOutcome,
}

/// Result of a full elimination tournament.
#[derive(Debug)]
pub struct TournamentOutcome {
    /// Eviction order: worst out first, with the generation it fell in.
    pub eliminated: Vec<(String, u32)>,
    /// Identities still standing (exactly one when run to full depth).
    pub survivors: Vec<String>,
    /// The sole survivor, when the tournament ran down to one.
    pub champion: Option<String>,
    pub generations: Vec<GenerationRecord>,
    /// Per-run round snapshots of the last generation's batch, kept for
    /// downstream time-series export.
    pub final_snapshots: Vec<RoundSnapshot>,
}

impl TournamentOutcome {
    /// Final ranking, best to worst: survivors (by their last mean score,
    /// descending), then the elimination record reversed.
    pub fn ranking(&self) -> Vec<String> {
        let mut ranked = self.survivors.clone();
        ranked.extend(self.eliminated.iter().rev().map(|(id, _)| id.clone()));
        ranked
    }
}

/// Decision over one generation's mean scores.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum MinimumDecision {
    Unique(String),
    Tied(Vec<String>),
}

/// Find the agent(s) at the global minimum mean score. Ties are exact
/// floating-point equality: two agents tie only when their aggregates are
/// identical.
pub(crate) fn lowest_scorer(mean_scores: &HashMap<String, f64>) -> Option<MinimumDecision> {
    let min = mean_scores
        .values()
        .copied()
        .fold(f64::INFINITY, f64::min);
    if !min.is_finite() {
        return None;
    }
    let mut tied: Vec<String> = mean_scores
        .iter()
        .filter(|(_, &score)| score == min)
        .map(|(identity, _)| identity.clone())
        .collect();
    tied.sort();
    match tied.len() {
        0 => None,
        1 => Some(MinimumDecision::Unique(tied.remove(0))),
        _ => Some(MinimumDecision::Tied(tied)),
    }
}

/// Runs the generation loop. Single-threaded itself; all concurrency lives
/// inside the batch runner it drives.
pub struct EliminationController {
    runner: BatchRunner,
    /// Consecutive exact ties tolerated on one roster before the
    /// deterministic tie-break kicks in.
    tie_retry_cap: u32,
}

impl EliminationController {
    pub fn new(runner: BatchRunner, tie_retry_cap: u32) -> Self {
        Self {
            runner,
            tie_retry_cap,
        }
    }

    /// Run elimination until one agent remains, or until `depth` evictions
    /// have happened if a depth is given.
    pub fn run(
        &self,
        mut roster: Vec<Agent>,
        depth: Option<u32>,
    ) -> Result<TournamentOutcome, TournamentError> {
        let max_evictions = roster.len().saturating_sub(1);
        let target = depth
            .map(|d| (d as usize).min(max_evictions))
            .unwrap_or(max_evictions);

        let mut eliminated: Vec<(String, u32)> = Vec::new();
        let mut generations: Vec<GenerationRecord> = Vec::new();
        let mut final_snapshots: Vec<RoundSnapshot> = Vec::new();
        let mut generation = 0u32;
        let mut tie_streak = 0u32;

        while roster.len() > 1 && eliminated.len() < target {
            generation += 1;
            let aggregate = self.runner.run_batch(&roster)?;
            let mean_scores = aggregate.mean_scores();
            let outcome = self.decide(&mean_scores, &mut roster, generation, &mut tie_streak);

            if let GenerationOutcome::Eliminated { identity }
            | GenerationOutcome::TieBroken { identity, .. } = &outcome
            {
                eliminated.push((identity.clone(), generation));
            }
            generations.push(GenerationRecord {
                generation,
                mean_scores: sorted_desc(&mean_scores),
                runs_completed: aggregate.runs_completed,
                outcome,
            });
            final_snapshots = aggregate.snapshots;
        }

        let survivors: Vec<String> = {
            let mut ids: Vec<String> =
                roster.iter().map(|a| a.identity().to_string()).collect();
            // Best first, judged by the last generation's mean scores.
            if let Some(last) = generations.last() {
                let order: HashMap<&str, usize> = last
                    .mean_scores
                    .iter()
                    .enumerate()
                    .map(|(i, (id, _))| (id.as_str(), i))
                    .collect();
                ids.sort_by_key(|id| order.get(id.as_str()).copied().unwrap_or(usize::MAX));
            }
            ids
        };
        let champion = (survivors.len() == 1).then(|| survivors[0].clone());
        if let Some(winner) = &champion {
            info!(winner = %winner, generations = generation, "tournament complete");
        }

        Ok(TournamentOutcome {
            eliminated,
            survivors,
            champion,
            generations,
            final_snapshots,
        })
    }

    fn decide(
        &self,
        mean_scores: &HashMap<String, f64>,
        roster: &mut Vec<Agent>,
        generation: u32,
        tie_streak: &mut u32,
    ) -> GenerationOutcome {
        match lowest_scorer(mean_scores) {
            Some(MinimumDecision::Unique(identity)) => {
                *tie_streak = 0;
                info!(generation, evicted = %identity, "generation decided");
                roster.retain(|a| a.identity() != identity);
                GenerationOutcome::Eliminated { identity }
            }
            Some(MinimumDecision::Tied(tied)) => {
                *tie_streak += 1;
                if *tie_streak > self.tie_retry_cap {
                    // Deterministic tie-break so a fully symmetric roster
                    // cannot loop forever. `tied` is sorted.
                    let identity = tied[0].clone();
                    warn!(
                        generation,
                        evicted = %identity,
                        retries = *tie_streak - 1,
                        "tie retry cap exhausted, breaking tie lexicographically"
                    );
                    *tie_streak = 0;
                    roster.retain(|a| a.identity() != identity);
                    GenerationOutcome::TieBroken { identity, tied }
                } else {
                    info!(generation, tied = ?tied, "exact tie at the minimum, re-running");
                    GenerationOutcome::Tied { identities: tied }
                }
            }
            None => {
                // Unreachable with a non-empty roster; treat as a tie of
                // nobody and re-run.
                warn!(generation, "no minimum found, re-running generation");
                GenerationOutcome::Tied {
                    identities: Vec::new(),
                }
            }
        }
    }
}

fn sorted_desc(mean_scores: &HashMap<String, f64>) -> Vec<(String, f64)> {
    let mut scores: Vec<(String, f64)> = mean_scores
        .iter()
        .map(|(id, &score)| (id.clone(), score))
        .collect();
    scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scores
}
