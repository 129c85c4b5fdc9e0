//! Additive result records produced by one match-engine run.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Cumulative payoff each agent earned against each opponent.
///
/// Keyed by identity on both levels so that forked copies of the same
/// logical agent across concurrent runs merge into one entry. Merging is
/// commutative and associative: entry-by-entry addition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PairwiseRecord {
    pub totals: HashMap<String, HashMap<String, i64>>,
}

impl PairwiseRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `points` to what `agent` earned against `opponent`.
    pub fn add(&mut self, agent: &str, opponent: &str, points: i64) {
        *self
            .totals
            .entry(agent.to_string())
            .or_default()
            .entry(opponent.to_string())
            .or_default() += points;
    }

    /// Fold another record into this one, entry by entry.
    pub fn merge(&mut self, other: &PairwiseRecord) {
        for (agent, per_opponent) in &other.totals {
            let into = self.totals.entry(agent.clone()).or_default();
            for (opponent, points) in per_opponent {
                *into.entry(opponent.clone()).or_default() += points;
            }
        }
    }

    /// Sum of everything `agent` earned, over all opponents.
    pub fn total_for(&self, agent: &str) -> i64 {
        self.totals
            .get(agent)
            .map(|per| per.values().sum())
            .unwrap_or(0)
    }

    /// Sum over all pairs. Equals the matching [`RoundSnapshot::grand_total`]
    /// for the same run.
    pub fn grand_total(&self) -> i64 {
        self.totals
            .values()
            .map(|per| per.values().sum::<i64>())
            .sum()
    }
}

/// Per-round payoff each agent earned summed over all its opponents.
///
/// One snapshot per run, retained whole so downstream statistics can average
/// time series across runs. Round numbers start at 1.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub rounds: BTreeMap<u32, HashMap<String, i64>>,
}

impl RoundSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, round: u32, agent: &str, points: i64) {
        *self
            .rounds
            .entry(round)
            .or_default()
            .entry(agent.to_string())
            .or_default() += points;
    }

    /// Payoff `agent` earned in `round`, summed over all opponents.
    pub fn payoff_in(&self, round: u32, agent: &str) -> i64 {
        self.rounds
            .get(&round)
            .and_then(|per| per.get(agent))
            .copied()
            .unwrap_or(0)
    }

    /// Sum over all rounds and agents.
    pub fn grand_total(&self) -> i64 {
        self.rounds
            .values()
            .map(|per| per.values().sum::<i64>())
            .sum()
    }
}
