//! Grudge-holding policies: permanent triggers and escalating paybacks.

use std::collections::{HashMap, HashSet};

use dilemma_core::{AgentView, Policy, PolicyError, PolicyTag};

/// Cooperates until the opponent defects once, then defects forever.
#[derive(Debug, Clone, Default)]
pub struct GrimTrigger;

impl Policy for GrimTrigger {
    fn decide(
        &mut self,
        _me: &AgentView<'_>,
        _opponent: &AgentView<'_>,
        opponent_history: &[bool],
    ) -> Result<bool, PolicyError> {
        Ok(!opponent_history.contains(&false))
    }

    fn fork(&self) -> Box<dyn Policy> {
        Box::new(GrimTrigger)
    }

    fn name(&self) -> &str {
        "grim-trigger"
    }

    fn tag(&self) -> PolicyTag {
        PolicyTag::Retaliator
    }
}

/// The inverse trigger: defects until the opponent cooperates once, then
/// locks into cooperation with that opponent for the rest of the run.
#[derive(Debug, Clone, Default)]
pub struct ReverseGrimTrigger {
    converted: HashSet<String>,
}

impl ReverseGrimTrigger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Policy for ReverseGrimTrigger {
    fn decide(
        &mut self,
        _me: &AgentView<'_>,
        opponent: &AgentView<'_>,
        opponent_history: &[bool],
    ) -> Result<bool, PolicyError> {
        if self.converted.contains(opponent.identity) {
            return Ok(true);
        }
        if opponent_history.contains(&true) {
            self.converted.insert(opponent.identity.to_string());
            return Ok(true);
        }
        Ok(false)
    }

    fn fork(&self) -> Box<dyn Policy> {
        Box::new(ReverseGrimTrigger::new())
    }

    fn name(&self) -> &str {
        "reverse-grim-trigger"
    }

    fn tag(&self) -> PolicyTag {
        PolicyTag::Forgiving
    }
}

/// Escalating payback: each observed defection schedules as many defections
/// as the current round number with that opponent.
///
/// Pending paybacks are policy-local, keyed by opponent identity.
#[derive(Debug, Clone, Default)]
pub struct Gradual {
    pending: HashMap<String, u64>,
}

impl Gradual {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Policy for Gradual {
    fn decide(
        &mut self,
        _me: &AgentView<'_>,
        opponent: &AgentView<'_>,
        opponent_history: &[bool],
    ) -> Result<bool, PolicyError> {
        if opponent_history.is_empty() {
            return Ok(true);
        }
        let round = opponent_history.len() as u64 + 1;
        if opponent_history.last() == Some(&false) {
            *self.pending.entry(opponent.identity.to_string()).or_default() += round;
        }
        if let Some(pending) = self.pending.get_mut(opponent.identity) {
            if *pending > 0 {
                *pending -= 1;
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn fork(&self) -> Box<dyn Policy> {
        Box::new(Gradual::new())
    }

    fn name(&self) -> &str {
        "gradual"
    }

    fn tag(&self) -> PolicyTag {
        PolicyTag::Retaliator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::decide_sequence;

    #[test]
    fn grim_trigger_never_forgives() {
        assert_eq!(
            decide_sequence(&mut GrimTrigger, &[true, false, true, true]),
            vec![true, true, false, false, false]
        );
    }

    #[test]
    fn reverse_grim_trigger_converts_on_first_cooperation() {
        assert_eq!(
            decide_sequence(&mut ReverseGrimTrigger::new(), &[false, true, false]),
            vec![false, false, true, true]
        );
    }

    #[test]
    fn gradual_escalates_with_the_round_index() {
        // Defection observed entering round 2 schedules two paybacks.
        assert_eq!(
            decide_sequence(&mut Gradual::new(), &[false, true, true, true]),
            vec![true, false, false, true, true]
        );
    }
}
