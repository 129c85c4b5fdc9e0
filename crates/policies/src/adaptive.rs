//! Outcome-driven policies that remember their own past moves.

use std::collections::HashMap;

use dilemma_core::{AgentView, Policy, PolicyError, PolicyTag};

/// Win-stay, lose-shift.
///
/// Keeps the previous move when it matched the opponent's (mutual
/// cooperation or mutual defection), flips it otherwise. The engine only
/// reveals the opponent's moves, so Pavlov records its own per opponent in
/// a policy-local store.
#[derive(Debug, Clone, Default)]
pub struct Pavlov {
    own_moves: HashMap<String, Vec<bool>>,
}

impl Pavlov {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Policy for Pavlov {
    fn decide(
        &mut self,
        _me: &AgentView<'_>,
        opponent: &AgentView<'_>,
        opponent_history: &[bool],
    ) -> Result<bool, PolicyError> {
        let own = self
            .own_moves
            .entry(opponent.identity.to_string())
            .or_default();

        let next = match (own.last(), opponent_history.last()) {
            (Some(&mine), Some(&theirs)) => {
                if mine == theirs {
                    mine
                } else {
                    !mine
                }
            }
            _ => true,
        };
        own.push(next);
        Ok(next)
    }

    fn fork(&self) -> Box<dyn Policy> {
        Box::new(Pavlov::new())
    }

    fn name(&self) -> &str {
        "pavlov"
    }

    fn tag(&self) -> PolicyTag {
        PolicyTag::Adaptive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::decide_sequence;

    #[test]
    fn pavlov_stays_on_success_and_shifts_on_failure() {
        // vs. an unconditional defector: C (opening), then C vs D failed ->
        // shift to D, then D vs D succeeded -> stay on D.
        assert_eq!(
            decide_sequence(&mut Pavlov::new(), &[false, false, false]),
            vec![true, false, false, false]
        );
    }

    #[test]
    fn pavlov_keeps_mutual_cooperation() {
        assert_eq!(
            decide_sequence(&mut Pavlov::new(), &[true, true, true]),
            vec![true, true, true, true]
        );
    }
}
