//! Tag-aware counter-play.
//!
//! Special-casing a counter-move per opponent implementation would break
//! the "policy is an opaque decision function" contract the engine
//! assumes, so this policy dispatches on the opponent's *declared*
//! [`PolicyTag`] instead of any runtime type introspection. It reports
//! [`Policy::tag_aware`] and is excluded from rosters unless a tournament
//! explicitly admits tag-aware policies.

use std::collections::HashMap;

use dilemma_core::{AgentView, Policy, PolicyError, PolicyTag};

/// Plays a per-archetype counter-move against whatever tag the opponent
/// declares.
#[derive(Debug, Clone, Default)]
pub struct Exploiter {
    rounds_seen: HashMap<String, u64>,
}

impl Exploiter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Policy for Exploiter {
    fn decide(
        &mut self,
        _me: &AgentView<'_>,
        opponent: &AgentView<'_>,
        opponent_history: &[bool],
    ) -> Result<bool, PolicyError> {
        let round = self
            .rounds_seen
            .entry(opponent.identity.to_string())
            .or_default();
        *round += 1;

        let choice = match opponent.tag {
            // Unconditional players cannot punish: take the temptation
            // payoff every round.
            PolicyTag::Cooperator | PolicyTag::Defector | PolicyTag::Erratic => false,
            // Mirrors punish immediately: play an honest mirror back.
            PolicyTag::Retaliator => opponent_history.last().copied().unwrap_or(true),
            // Forgiving players tolerate every other round of defection.
            PolicyTag::Forgiving => *round % 2 == 1,
            // Win-stay-lose-shift settles into a C/D milking cycle.
            PolicyTag::Adaptive => *round % 2 == 1,
            PolicyTag::Unknown => false,
        };
        Ok(choice)
    }

    fn fork(&self) -> Box<dyn Policy> {
        Box::new(Exploiter::new())
    }

    fn name(&self) -> &str {
        "exploiter"
    }

    fn tag(&self) -> PolicyTag {
        PolicyTag::Adaptive
    }

    fn tag_aware(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view<'a>(identity: &'a str, tag: PolicyTag) -> AgentView<'a> {
        AgentView {
            identity,
            score: 0,
            interactions: 0,
            tag,
        }
    }

    #[test]
    fn defects_against_unconditional_cooperators() {
        let mut policy = Exploiter::new();
        let me = view("me", PolicyTag::Adaptive);
        for _ in 0..3 {
            assert!(!policy
                .decide(&me, &view("coop", PolicyTag::Cooperator), &[true, true])
                .unwrap());
        }
    }

    #[test]
    fn mirrors_retaliators() {
        let mut policy = Exploiter::new();
        let me = view("me", PolicyTag::Adaptive);
        let opp = view("tft", PolicyTag::Retaliator);
        assert!(policy.decide(&me, &opp, &[]).unwrap());
        assert!(!policy.decide(&me, &opp, &[false]).unwrap());
        assert!(policy.decide(&me, &opp, &[false, true]).unwrap());
    }

    #[test]
    fn alternates_against_forgiving_opponents() {
        let mut policy = Exploiter::new();
        let me = view("me", PolicyTag::Adaptive);
        let opp = view("fgv", PolicyTag::Forgiving);
        let moves: Vec<bool> = (0..4).map(|_| policy.decide(&me, &opp, &[]).unwrap()).collect();
        assert_eq!(moves, vec![true, false, true, false]);
    }

    #[test]
    fn declares_itself_tag_aware() {
        assert!(Exploiter::new().tag_aware());
    }
}
