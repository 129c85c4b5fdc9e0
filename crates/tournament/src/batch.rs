//! Batch runner: many independent match-engine runs on a bounded worker
//! pool, merged into one aggregate after a fan-out/fan-in barrier.

use std::collections::{BTreeMap, HashMap};
use std::num::NonZeroUsize;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, warn};

use dilemma_core::{Agent, EngineError, MatchEngine, PairwiseRecord, RoundSnapshot, RunOutcome};

use crate::BatchError;

/// Hard ceiling on the worker pool, matching the historical executor bound.
const MAX_WORKERS: usize = 100;

/// Worker-pool size: an explicit override, or min(2 × available cores, 100).
pub fn worker_bound(explicit: Option<usize>) -> usize {
    match explicit {
        Some(n) => n.clamp(1, MAX_WORKERS),
        None => {
            let cores = std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1);
            (cores * 2).min(MAX_WORKERS)
        }
    }
}

/// Configuration for one batch of runs.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Independent runs per batch.
    pub runs_per_batch: u32,
    /// Round-robin rounds inside each run.
    pub rounds_per_run: u32,
    /// Worker-pool override; `None` derives from available parallelism.
    pub max_workers: Option<usize>,
    /// Grace period for the whole batch after submission. Runs still going
    /// when it elapses are abandoned and their results discarded.
    pub grace: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            runs_per_batch: 50,
            rounds_per_run: 100,
            max_workers: None,
            grace: Duration::from_secs(60),
        }
    }
}

/// Merged view of all completed runs of one batch.
///
/// Per-run accumulation happens inside each task; this struct is only ever
/// touched by the single thread draining the fan-in channel, so no locking
/// exists anywhere in the batch path.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AggregateResult {
    /// Identity-pair payoff totals summed over completed runs.
    pub pairwise: PairwiseRecord,
    /// One retained round snapshot per completed run, run-indexed.
    pub snapshots: Vec<RoundSnapshot>,
    /// Roster size the batch was played with.
    pub roster_size: usize,
    pub runs_completed: u32,
    pub runs_failed: u32,
    pub runs_timed_out: u32,
}

impl AggregateResult {
    fn new(roster_size: usize) -> Self {
        Self {
            roster_size,
            ..Self::default()
        }
    }

    fn merge_run(&mut self, outcome: RunOutcome) {
        self.pairwise.merge(&outcome.pairwise);
        self.snapshots.push(outcome.rounds);
        self.runs_completed += 1;
    }

    /// Mean score per agent: pairwise totals over all opponents, divided by
    /// completed runs × (roster − 1). Lost runs are excluded from the
    /// divisor, never counted as zero.
    pub fn mean_scores(&self) -> HashMap<String, f64> {
        if self.runs_completed == 0 || self.roster_size < 2 {
            return HashMap::new();
        }
        let divisor = (self.runs_completed as f64) * ((self.roster_size - 1) as f64);
        self.pairwise
            .totals
            .keys()
            .map(|identity| {
                let total = self.pairwise.total_for(identity) as f64;
                (identity.clone(), total / divisor)
            })
            .collect()
    }

    /// Per-round payoff averaged over completed runs, for score time series.
    pub fn average_round_scores(&self) -> BTreeMap<u32, HashMap<String, f64>> {
        let runs = self.runs_completed as f64;
        let mut averaged: BTreeMap<u32, HashMap<String, f64>> = BTreeMap::new();
        for snapshot in &self.snapshots {
            for (&round, per_agent) in &snapshot.rounds {
                let into = averaged.entry(round).or_default();
                for (identity, &points) in per_agent {
                    *into.entry(identity.clone()).or_default() += points as f64 / runs;
                }
            }
        }
        averaged
    }
}

/// Executes batches of independent runs on a shared bounded pool.
///
/// Every run owns an exclusively forked roster, so no agent or policy state
/// is shared while runs are in flight. The only blocking point is the
/// fan-in: all runs are submitted, then the caller's thread waits for all
/// of them (or the grace deadline) before any merge.
pub struct BatchRunner {
    pool: rayon::ThreadPool,
    config: BatchConfig,
}

impl BatchRunner {
    pub fn new(config: BatchConfig) -> Result<Self, BatchError> {
        let workers = worker_bound(config.max_workers);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("dilemma-run-{i}"))
            .build()?;
        debug!(workers, "batch worker pool ready");
        Ok(Self { pool, config })
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Run one batch over `roster` and merge everything that finished.
    ///
    /// Per-run policy faults are logged and dropped; the aggregate reflects
    /// the surviving runs. Only an unusable batch (tiny roster, zero
    /// completed runs) is an error.
    pub fn run_batch(&self, roster: &[Agent]) -> Result<AggregateResult, BatchError> {
        if roster.len() < 2 {
            return Err(BatchError::RosterTooSmall(roster.len()));
        }

        let runs = self.config.runs_per_batch;
        let rounds = self.config.rounds_per_run;
        let (tx, rx) = mpsc::channel::<(u32, Result<RunOutcome, EngineError>)>();

        for run in 0..runs {
            // Fork the full roster per run: fresh policy state, zeroed
            // scores and ledgers.
            let forked: Vec<Agent> = roster.iter().map(Agent::fork).collect();
            let tx = tx.clone();
            self.pool.spawn(move || {
                let outcome = MatchEngine::new(forked, rounds).play();
                // The receiver may already have given up on this batch.
                let _ = tx.send((run, outcome));
            });
        }
        drop(tx);

        let deadline = Instant::now() + self.config.grace;
        let mut aggregate = AggregateResult::new(roster.len());
        let mut received = 0u32;

        while received < runs {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match rx.recv_timeout(remaining) {
                Ok((_, Ok(outcome))) => {
                    aggregate.merge_run(outcome);
                    received += 1;
                }
                Ok((run, Err(err))) => {
                    warn!(run, error = %err, "run failed, dropping its contribution");
                    aggregate.runs_failed += 1;
                    received += 1;
                }
                Err(RecvTimeoutError::Timeout) => {
                    aggregate.runs_timed_out = runs - received;
                    warn!(
                        abandoned = aggregate.runs_timed_out,
                        "grace period elapsed, discarding unfinished runs"
                    );
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        if aggregate.runs_completed == 0 {
            return Err(BatchError::NoCompletedRuns {
                failed: aggregate.runs_failed,
                timed_out: aggregate.runs_timed_out,
            });
        }
        debug!(
            completed = aggregate.runs_completed,
            failed = aggregate.runs_failed,
            timed_out = aggregate.runs_timed_out,
            "batch merged"
        );
        Ok(aggregate)
    }
}
