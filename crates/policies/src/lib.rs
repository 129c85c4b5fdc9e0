//! Policy library for the dilemma tournament.
//!
//! Every policy implements [`dilemma_core::Policy`]: a pluggable
//! cooperate/defect decision function with per-opponent memory held inside
//! the policy instance and reset by `fork()`. Policies are looked up by a
//! stable string id via [`create_policy`], the same way the tournament's
//! engines have always been selected by name.
//!
//! `true` is cooperate, `false` is defect, everywhere.

mod adaptive;
mod exploiter;
mod grudge;
mod mirror;
mod naive;

pub use adaptive::*;
pub use exploiter::*;
pub use grudge::*;
pub use mirror::*;
pub use naive::*;

use dilemma_core::Policy;

/// Stable ids of every policy in the library, in registry order.
pub fn policy_ids() -> Vec<&'static str> {
    vec![
        "always-cooperate",
        "always-defect",
        "alternate-cooperate",
        "alternate-defect",
        "random",
        "tit-for-tat",
        "suspicious-tit-for-tat",
        "forgiving-tit-for-tat",
        "two-tits-for-tat",
        "final-round-defector",
        "grim-trigger",
        "reverse-grim-trigger",
        "gradual",
        "pavlov",
        "exploiter",
    ]
}

/// Instantiate a policy by its registry id.
pub fn create_policy(id: &str) -> Option<Box<dyn Policy>> {
    let policy: Box<dyn Policy> = match id {
        "always-cooperate" => Box::new(AlwaysCooperate),
        "always-defect" => Box::new(AlwaysDefect),
        "alternate-cooperate" => Box::new(AlternateCooperate),
        "alternate-defect" => Box::new(AlternateDefect),
        "random" => Box::new(Random),
        "tit-for-tat" => Box::new(TitForTat),
        "suspicious-tit-for-tat" => Box::new(SuspiciousTitForTat),
        "forgiving-tit-for-tat" => Box::new(ForgivingTitForTat),
        "two-tits-for-tat" => Box::new(TwoTitsForTat::new()),
        "final-round-defector" => Box::new(FinalRoundDefector::default()),
        "grim-trigger" => Box::new(GrimTrigger),
        "reverse-grim-trigger" => Box::new(ReverseGrimTrigger::new()),
        "gradual" => Box::new(Gradual::new()),
        "pavlov" => Box::new(Pavlov::new()),
        "exploiter" => Box::new(Exploiter::new()),
        _ => return None,
    };
    Some(policy)
}

#[cfg(test)]
pub(crate) mod test_util {
    use dilemma_core::{AgentView, Policy, PolicyTag};

    /// Replay `opponent_moves` one by one, collecting the policy's decision
    /// before each reveal (and one opening decision before any).
    pub fn decide_sequence(policy: &mut dyn Policy, opponent_moves: &[bool]) -> Vec<bool> {
        let me = AgentView {
            identity: "me",
            score: 0,
            interactions: 0,
            tag: PolicyTag::Unknown,
        };
        let opponent = AgentView {
            identity: "opponent",
            score: 0,
            interactions: 0,
            tag: PolicyTag::Unknown,
        };
        (0..=opponent_moves.len())
            .map(|seen| {
                policy
                    .decide(&me, &opponent, &opponent_moves[..seen])
                    .unwrap()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::decide_sequence;

    #[test]
    fn registry_resolves_every_listed_id() {
        for id in policy_ids() {
            let policy = create_policy(id).unwrap_or_else(|| panic!("unresolvable id `{id}`"));
            assert_eq!(policy.name(), id);
        }
        assert!(create_policy("no-such-policy").is_none());
    }

    #[test]
    fn only_the_exploiter_is_tag_aware() {
        for id in policy_ids() {
            let policy = create_policy(id).unwrap();
            assert_eq!(policy.tag_aware(), id == "exploiter", "{id}");
        }
    }

    #[test]
    fn forked_stateful_policy_treats_everyone_as_a_first_encounter() {
        // Poison a Gradual against one opponent, then fork: the copy must
        // behave exactly like a freshly built policy.
        let mut poisoned = Gradual::new();
        let seen = decide_sequence(&mut poisoned, &[false, false, false]);
        assert!(seen.contains(&false));

        let mut forked = poisoned.fork();
        let mut fresh = Gradual::new();
        assert_eq!(
            decide_sequence(forked.as_mut(), &[true, true]),
            decide_sequence(&mut fresh, &[true, true])
        );
    }
}
