//! Policies that ignore the opponent entirely: fixed, alternating or random.

use dilemma_core::{AgentView, Policy, PolicyError, PolicyTag};
use rand::Rng;

/// Cooperates every round, unconditionally.
#[derive(Debug, Clone, Default)]
pub struct AlwaysCooperate;

impl Policy for AlwaysCooperate {
    fn decide(
        &mut self,
        _me: &AgentView<'_>,
        _opponent: &AgentView<'_>,
        _opponent_history: &[bool],
    ) -> Result<bool, PolicyError> {
        Ok(true)
    }

    fn fork(&self) -> Box<dyn Policy> {
        Box::new(AlwaysCooperate)
    }

    fn name(&self) -> &str {
        "always-cooperate"
    }

    fn tag(&self) -> PolicyTag {
        PolicyTag::Cooperator
    }
}

/// Defects every round, unconditionally.
#[derive(Debug, Clone, Default)]
pub struct AlwaysDefect;

impl Policy for AlwaysDefect {
    fn decide(
        &mut self,
        _me: &AgentView<'_>,
        _opponent: &AgentView<'_>,
        _opponent_history: &[bool],
    ) -> Result<bool, PolicyError> {
        Ok(false)
    }

    fn fork(&self) -> Box<dyn Policy> {
        Box::new(AlwaysDefect)
    }

    fn name(&self) -> &str {
        "always-defect"
    }

    fn tag(&self) -> PolicyTag {
        PolicyTag::Defector
    }
}

/// Opens with cooperation and alternates from there: C, D, C, D, ...
///
/// The phase is derived from the length of the observed ledger, so the
/// pattern is per opponent.
#[derive(Debug, Clone, Default)]
pub struct AlternateCooperate;

impl Policy for AlternateCooperate {
    fn decide(
        &mut self,
        _me: &AgentView<'_>,
        _opponent: &AgentView<'_>,
        opponent_history: &[bool],
    ) -> Result<bool, PolicyError> {
        Ok(opponent_history.len() % 2 == 0)
    }

    fn fork(&self) -> Box<dyn Policy> {
        Box::new(AlternateCooperate)
    }

    fn name(&self) -> &str {
        "alternate-cooperate"
    }

    fn tag(&self) -> PolicyTag {
        PolicyTag::Erratic
    }
}

/// Opens with defection and alternates from there: D, C, D, C, ...
#[derive(Debug, Clone, Default)]
pub struct AlternateDefect;

impl Policy for AlternateDefect {
    fn decide(
        &mut self,
        _me: &AgentView<'_>,
        _opponent: &AgentView<'_>,
        opponent_history: &[bool],
    ) -> Result<bool, PolicyError> {
        Ok(opponent_history.len() % 2 != 0)
    }

    fn fork(&self) -> Box<dyn Policy> {
        Box::new(AlternateDefect)
    }

    fn name(&self) -> &str {
        "alternate-defect"
    }

    fn tag(&self) -> PolicyTag {
        PolicyTag::Erratic
    }
}

/// Flips a fair coin every round.
#[derive(Debug, Clone, Default)]
pub struct Random;

impl Policy for Random {
    fn decide(
        &mut self,
        _me: &AgentView<'_>,
        _opponent: &AgentView<'_>,
        _opponent_history: &[bool],
    ) -> Result<bool, PolicyError> {
        Ok(rand::thread_rng().gen_bool(0.5))
    }

    fn fork(&self) -> Box<dyn Policy> {
        Box::new(Random)
    }

    fn name(&self) -> &str {
        "random"
    }

    fn tag(&self) -> PolicyTag {
        PolicyTag::Erratic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::decide_sequence;

    #[test]
    fn fixed_policies_never_waver() {
        assert_eq!(
            decide_sequence(&mut AlwaysCooperate, &[false, false, false]),
            vec![true, true, true, true]
        );
        assert_eq!(
            decide_sequence(&mut AlwaysDefect, &[true, true, true]),
            vec![false, false, false, false]
        );
    }

    #[test]
    fn alternators_are_phase_locked_to_history_length() {
        assert_eq!(
            decide_sequence(&mut AlternateCooperate, &[true, true, true]),
            vec![true, false, true, false]
        );
        assert_eq!(
            decide_sequence(&mut AlternateDefect, &[true, true, true]),
            vec![false, true, false, true]
        );
    }
}
