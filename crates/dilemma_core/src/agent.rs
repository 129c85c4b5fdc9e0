//! Agent entity: identity, pluggable policy, running score and the
//! per-opponent ledger of observed moves.

use std::collections::HashMap;

use crate::{AgentView, Policy, PolicyError};

/// A named tournament participant.
///
/// Equality of agents across concurrent runs is by identity, never by
/// instance: every run plays against freshly forked copies, and all result
/// records key on the identity string so those copies aggregate as one
/// logical entity.
pub struct Agent {
    identity: String,
    policy: Box<dyn Policy>,
    score: i64,
    interactions: u64,
    ledger: HashMap<String, Vec<bool>>,
}

impl Agent {
    pub fn new(identity: impl Into<String>, policy: Box<dyn Policy>) -> Self {
        Self {
            identity: identity.into(),
            policy,
            score: 0,
            interactions: 0,
            ledger: HashMap::new(),
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn interactions(&self) -> u64 {
        self.interactions
    }

    pub fn policy_name(&self) -> &str {
        self.policy.name()
    }

    pub fn tag_aware(&self) -> bool {
        self.policy.tag_aware()
    }

    /// The moves this agent has observed from `opponent` so far.
    pub fn observed_moves(&self, opponent: &str) -> &[bool] {
        self.ledger
            .get(opponent)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Read-only view handed to opposing policies.
    pub fn view(&self) -> AgentView<'_> {
        AgentView {
            identity: &self.identity,
            score: self.score,
            interactions: self.interactions,
            tag: self.policy.tag(),
        }
    }

    /// Same identity, forked policy, zeroed score/interactions/ledger.
    ///
    /// Mandatory before every run: stateful policies remember betrayal
    /// counts and trust levels per opponent, and none of that may leak
    /// between independent runs.
    pub fn fork(&self) -> Agent {
        Agent {
            identity: self.identity.clone(),
            policy: self.policy.fork(),
            score: 0,
            interactions: 0,
            ledger: HashMap::new(),
        }
    }

    /// Delegate to the policy with the ledger slice observed so far.
    pub fn decide_against(&mut self, opponent: &AgentView<'_>) -> Result<bool, PolicyError> {
        let history: &[bool] = self
            .ledger
            .get(opponent.identity)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let me = AgentView {
            identity: &self.identity,
            score: self.score,
            interactions: self.interactions,
            tag: self.policy.tag(),
        };
        self.policy.decide(&me, opponent, history)
    }

    /// Credit one round's payoff. Match-engine use only.
    pub fn record_score(&mut self, points: i64) {
        self.score += points;
        self.interactions += 1;
    }

    /// Append the move `opponent` just revealed. Match-engine use only.
    pub fn record_observed_move(&mut self, opponent: &str, cooperated: bool) {
        self.ledger
            .entry(opponent.to_string())
            .or_default()
            .push(cooperated);
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("identity", &self.identity)
            .field("policy", &self.policy.name())
            .field("score", &self.score)
            .field("interactions", &self.interactions)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PolicyTag;

    /// Cooperates until it has ever observed a defection, then defects.
    /// Carries per-opponent state so fork isolation is observable.
    struct Grudge {
        soured: std::collections::HashSet<String>,
    }

    impl Grudge {
        fn new() -> Self {
            Self {
                soured: Default::default(),
            }
        }
    }

    impl Policy for Grudge {
        fn decide(
            &mut self,
            _me: &AgentView<'_>,
            opponent: &AgentView<'_>,
            opponent_history: &[bool],
        ) -> Result<bool, PolicyError> {
            if opponent_history.contains(&false) {
                self.soured.insert(opponent.identity.to_string());
            }
            Ok(!self.soured.contains(opponent.identity))
        }

        fn fork(&self) -> Box<dyn Policy> {
            Box::new(Grudge::new())
        }

        fn name(&self) -> &str {
            "grudge"
        }

        fn tag(&self) -> PolicyTag {
            PolicyTag::Retaliator
        }
    }

    fn view(identity: &str) -> AgentView<'_> {
        AgentView {
            identity,
            score: 0,
            interactions: 0,
            tag: PolicyTag::Unknown,
        }
    }

    #[test]
    fn fork_resets_score_ledger_and_policy_state() {
        let mut agent = Agent::new("a", Box::new(Grudge::new()));
        agent.record_score(5);
        agent.record_observed_move("b", false);
        assert_eq!(agent.score(), 5);
        assert_eq!(agent.interactions(), 1);
        assert!(!agent.decide_against(&view("b")).unwrap());

        let mut fresh = agent.fork();
        assert_eq!(fresh.identity(), "a");
        assert_eq!(fresh.score(), 0);
        assert_eq!(fresh.interactions(), 0);
        assert!(fresh.observed_moves("b").is_empty());
        // First encounter again: the forked policy holds no grudge.
        assert!(fresh.decide_against(&view("b")).unwrap());
    }

    #[test]
    fn ledger_is_per_opponent() {
        let mut agent = Agent::new("a", Box::new(Grudge::new()));
        agent.record_observed_move("b", false);
        agent.record_observed_move("c", true);

        assert_eq!(agent.observed_moves("b"), &[false]);
        assert_eq!(agent.observed_moves("c"), &[true]);
        assert!(!agent.decide_against(&view("b")).unwrap());
        assert!(agent.decide_against(&view("c")).unwrap());
    }
}
