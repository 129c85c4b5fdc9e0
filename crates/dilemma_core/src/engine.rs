//! Match engine: one strictly sequential round-robin run.

use crate::{payoff, Agent, EngineError, PairwiseRecord, RoundSnapshot};

/// Everything one run produces. Both records key on agent identity so runs
/// over forked rosters merge cleanly.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub pairwise: PairwiseRecord,
    pub rounds: RoundSnapshot,
}

/// Plays a full round-robin among a roster for a fixed number of rounds.
///
/// Execution is single-threaded and exactly reproducible: rounds run
/// `1..=R`, and within each round every unordered pair `{i, j}`, `i < j`,
/// plays exactly once in fixed index order. Policies may key behavior off
/// the absolute round index or interaction count, so this ordering is part
/// of the engine contract.
pub struct MatchEngine {
    roster: Vec<Agent>,
    rounds: u32,
    pairwise: PairwiseRecord,
    snapshot: RoundSnapshot,
}

impl MatchEngine {
    pub fn new(roster: Vec<Agent>, rounds: u32) -> Self {
        Self {
            roster,
            rounds,
            pairwise: PairwiseRecord::new(),
            snapshot: RoundSnapshot::new(),
        }
    }

    /// Run to completion, consuming the engine.
    ///
    /// A policy fault anywhere is fatal to the whole run; there is no
    /// fallback move.
    pub fn play(mut self) -> Result<RunOutcome, EngineError> {
        let n = self.roster.len();
        for round in 1..=self.rounds {
            for i in 0..n {
                for j in (i + 1)..n {
                    self.play_pair(i, j, round)?;
                }
            }
        }
        Ok(RunOutcome {
            pairwise: self.pairwise,
            rounds: self.snapshot,
        })
    }

    /// One round between roster indices `i < j`.
    ///
    /// Both sides decide before either sees the other's move, then score,
    /// interaction count and each side's ledger entry for the other are
    /// updated.
    fn play_pair(&mut self, i: usize, j: usize, round: u32) -> Result<(), EngineError> {
        let (head, tail) = self.roster.split_at_mut(j);
        let a = &mut head[i];
        let b = &mut tail[0];

        let move_a = a
            .decide_against(&b.view())
            .map_err(|source| EngineError::PolicyFault {
                agent: a.identity().to_string(),
                opponent: b.identity().to_string(),
                round,
                source,
            })?;
        let move_b = b
            .decide_against(&a.view())
            .map_err(|source| EngineError::PolicyFault {
                agent: b.identity().to_string(),
                opponent: a.identity().to_string(),
                round,
                source,
            })?;

        let (points_a, points_b) = payoff(move_a, move_b);
        a.record_score(points_a);
        b.record_score(points_b);

        let id_a = a.identity().to_string();
        let id_b = b.identity().to_string();
        a.record_observed_move(&id_b, move_b);
        b.record_observed_move(&id_a, move_a);

        self.pairwise.add(&id_a, &id_b, points_a);
        self.pairwise.add(&id_b, &id_a, points_b);
        self.snapshot.add(round, &id_a, points_a);
        self.snapshot.add(round, &id_b, points_b);
        Ok(())
    }
}
