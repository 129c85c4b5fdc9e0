//! Tit-for-tat and its close relatives: policies that echo the opponent's
//! observed moves with varying amounts of suspicion and forgiveness.

use std::collections::HashMap;

use dilemma_core::{AgentView, Policy, PolicyError, PolicyTag};

/// Classic tit-for-tat: cooperate first, then repeat the opponent's last
/// observed move.
#[derive(Debug, Clone, Default)]
pub struct TitForTat;

impl Policy for TitForTat {
    fn decide(
        &mut self,
        _me: &AgentView<'_>,
        _opponent: &AgentView<'_>,
        opponent_history: &[bool],
    ) -> Result<bool, PolicyError> {
        Ok(opponent_history.last().copied().unwrap_or(true))
    }

    fn fork(&self) -> Box<dyn Policy> {
        Box::new(TitForTat)
    }

    fn name(&self) -> &str {
        "tit-for-tat"
    }

    fn tag(&self) -> PolicyTag {
        PolicyTag::Retaliator
    }
}

/// Tit-for-tat that opens with defection instead of cooperation.
#[derive(Debug, Clone, Default)]
pub struct SuspiciousTitForTat;

impl Policy for SuspiciousTitForTat {
    fn decide(
        &mut self,
        _me: &AgentView<'_>,
        _opponent: &AgentView<'_>,
        opponent_history: &[bool],
    ) -> Result<bool, PolicyError> {
        Ok(opponent_history.last().copied().unwrap_or(false))
    }

    fn fork(&self) -> Box<dyn Policy> {
        Box::new(SuspiciousTitForTat)
    }

    fn name(&self) -> &str {
        "suspicious-tit-for-tat"
    }

    fn tag(&self) -> PolicyTag {
        PolicyTag::Retaliator
    }
}

/// Forgives an isolated defection; retaliates only after two consecutive
/// observed defections.
#[derive(Debug, Clone, Default)]
pub struct ForgivingTitForTat;

impl Policy for ForgivingTitForTat {
    fn decide(
        &mut self,
        _me: &AgentView<'_>,
        _opponent: &AgentView<'_>,
        opponent_history: &[bool],
    ) -> Result<bool, PolicyError> {
        if opponent_history.len() < 2 {
            return Ok(true);
        }
        let last_two = &opponent_history[opponent_history.len() - 2..];
        Ok(last_two != [false, false])
    }

    fn fork(&self) -> Box<dyn Policy> {
        Box::new(ForgivingTitForTat)
    }

    fn name(&self) -> &str {
        "forgiving-tit-for-tat"
    }

    fn tag(&self) -> PolicyTag {
        PolicyTag::Forgiving
    }
}

/// Answers a single observed defection with two rounds of defection.
///
/// The pending-punishment counter lives in a policy-local store keyed by
/// opponent identity, reset on fork.
#[derive(Debug, Clone, Default)]
pub struct TwoTitsForTat {
    pending: HashMap<String, u32>,
}

impl TwoTitsForTat {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Policy for TwoTitsForTat {
    fn decide(
        &mut self,
        _me: &AgentView<'_>,
        opponent: &AgentView<'_>,
        opponent_history: &[bool],
    ) -> Result<bool, PolicyError> {
        if opponent_history.last() == Some(&false) {
            self.pending.insert(opponent.identity.to_string(), 2);
        }
        let pending = self.pending.entry(opponent.identity.to_string()).or_insert(0);
        if *pending > 0 {
            *pending -= 1;
            Ok(false)
        } else {
            Ok(true)
        }
    }

    fn fork(&self) -> Box<dyn Policy> {
        Box::new(TwoTitsForTat::new())
    }

    fn name(&self) -> &str {
        "two-tits-for-tat"
    }

    fn tag(&self) -> PolicyTag {
        PolicyTag::Retaliator
    }
}

/// Tit-for-tat that defects unconditionally once the exchange reaches its
/// final stretch.
///
/// The horizon is the number of rounds the policy assumes a run lasts; it
/// keys off the observed-history length, matching round index within one
/// run.
#[derive(Debug, Clone)]
pub struct FinalRoundDefector {
    horizon: usize,
}

impl FinalRoundDefector {
    pub fn new(horizon: usize) -> Self {
        Self { horizon }
    }
}

impl Default for FinalRoundDefector {
    fn default() -> Self {
        // Matches the default rounds-per-run of the tournament.
        Self::new(100)
    }
}

impl Policy for FinalRoundDefector {
    fn decide(
        &mut self,
        _me: &AgentView<'_>,
        _opponent: &AgentView<'_>,
        opponent_history: &[bool],
    ) -> Result<bool, PolicyError> {
        if opponent_history.len() + 1 >= self.horizon {
            return Ok(false);
        }
        Ok(opponent_history.last().copied().unwrap_or(true))
    }

    fn fork(&self) -> Box<dyn Policy> {
        Box::new(self.clone())
    }

    fn name(&self) -> &str {
        "final-round-defector"
    }

    fn tag(&self) -> PolicyTag {
        PolicyTag::Retaliator
    }
}
