//! TOML-backed tournament configuration and roster construction.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use dilemma_core::Agent;

use crate::{BatchConfig, TournamentError};

/// One roster line: an agent identity and the policy id backing it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    pub name: String,
    pub policy: String,
}

/// Tournament configuration, consumed from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentConfig {
    #[serde(default = "default_name")]
    pub name: String,
    /// Identity + policy pairs. Order fixes the engine's pair order.
    pub roster: Vec<RosterEntry>,
    #[serde(default = "default_rounds")]
    pub rounds_per_run: u32,
    #[serde(default = "default_runs")]
    pub runs_per_batch: u32,
    /// Worker-pool bound; absent means min(2 × cores, 100).
    #[serde(default)]
    pub max_workers: Option<usize>,
    /// Grace period in seconds for each batch.
    #[serde(default = "default_grace_secs")]
    pub grace_secs: u64,
    /// How many evictions to run; absent means down to one survivor.
    #[serde(default)]
    pub elimination_depth: Option<u32>,
    /// Consecutive exact ties tolerated before the deterministic break.
    #[serde(default = "default_tie_retries")]
    pub tie_retry_cap: u32,
    /// Admit policies that condition on opponents' declared tags. Off by
    /// default: such policies break fairness-sensitive comparisons.
    #[serde(default)]
    pub allow_tag_aware: bool,
}

fn default_name() -> String {
    "dilemma tournament".to_string()
}

fn default_rounds() -> u32 {
    100
}

fn default_runs() -> u32 {
    50
}

fn default_grace_secs() -> u64 {
    60
}

fn default_tie_retries() -> u32 {
    5
}

impl TournamentConfig {
    pub fn load(path: &Path) -> Result<Self, TournamentError> {
        let contents =
            std::fs::read_to_string(path).map_err(|source| TournamentError::ConfigRead {
                path: path.display().to_string(),
                source,
            })?;
        toml::from_str(&contents).map_err(|source| TournamentError::ConfigParse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn batch_config(&self) -> BatchConfig {
        BatchConfig {
            runs_per_batch: self.runs_per_batch,
            rounds_per_run: self.rounds_per_run,
            max_workers: self.max_workers,
            grace: Duration::from_secs(self.grace_secs),
        }
    }

    /// Build the generation-zero roster from the configured entries.
    ///
    /// Unknown policy ids and duplicate identities are errors. Tag-aware
    /// policies are dropped with a warning unless explicitly admitted.
    pub fn build_roster(&self) -> Result<Vec<Agent>, TournamentError> {
        let mut roster: Vec<Agent> = Vec::with_capacity(self.roster.len());
        for entry in &self.roster {
            let policy = policies::create_policy(&entry.policy)
                .ok_or_else(|| TournamentError::UnknownPolicy(entry.policy.clone()))?;
            if roster.iter().any(|a| a.identity() == entry.name) {
                return Err(TournamentError::DuplicateIdentity(entry.name.clone()));
            }
            let agent = Agent::new(entry.name.clone(), policy);
            if agent.tag_aware() && !self.allow_tag_aware {
                warn!(
                    agent = %entry.name,
                    policy = %entry.policy,
                    "excluding tag-aware policy from fairness-sensitive roster"
                );
                continue;
            }
            roster.push(agent);
        }
        if roster.is_empty() {
            return Err(TournamentError::EmptyRoster);
        }
        Ok(roster)
    }
}
