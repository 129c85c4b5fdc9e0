pub mod agent;
pub mod engine;
pub mod error;
pub mod payoff;
pub mod record;

// Re-export core game logic (not orchestration-specific)
pub use agent::*;
pub use engine::*;
pub use error::*;
pub use payoff::*;
pub use record::*;

// =============================================================================
// Policy trait — implemented by all decision policies (naive, retaliating,
// adaptive, etc.)
// =============================================================================

/// Declared behavioral archetype of a policy.
///
/// Tags are self-reported, coarse labels. They exist so that a policy may
/// condition on *what kind* of opponent it faces without inspecting the
/// opponent's concrete implementation. A policy that reads the opponent's tag
/// must report it through [`Policy::tag_aware`] so fairness-sensitive
/// tournaments can exclude it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PolicyTag {
    /// Cooperates essentially unconditionally.
    Cooperator,
    /// Defects essentially unconditionally.
    Defector,
    /// Mirrors or punishes observed defection.
    Retaliator,
    /// Retaliates but returns to cooperation.
    Forgiving,
    /// Pattern- or chance-driven, not opponent-driven.
    Erratic,
    /// Adjusts behavior from observed outcomes.
    Adaptive,
    /// No declared archetype.
    Unknown,
}

/// Read-only view of an agent handed to a policy during a decision.
///
/// Policies never see the opposing agent directly, only this view plus the
/// ledger of moves the deciding agent has observed from that opponent.
#[derive(Clone, Copy, Debug)]
pub struct AgentView<'a> {
    /// Unique agent identity.
    pub identity: &'a str,
    /// Running score accumulated so far in the current run.
    pub score: i64,
    /// Pairwise interactions played so far in the current run.
    pub interactions: u64,
    /// The agent's declared policy tag.
    pub tag: PolicyTag,
}

/// Trait that all decision policies must implement.
///
/// A policy is a pluggable cooperate/defect decision function. Per-opponent
/// memory (betrayal counts, trust levels, own past moves) must live inside
/// the policy instance, keyed by opponent identity; [`Policy::fork`] returns
/// an independent copy with all of that memory reset.
pub trait Policy: Send {
    /// Decide the next move against `opponent`.
    ///
    /// `true` is cooperate, `false` is defect. `opponent_history` is the
    /// ordered sequence of moves the deciding agent has observed from this
    /// opponent so far — an agent never sees its own moves through this
    /// channel.
    ///
    /// An `Err` is a policy fault: fatal to the run it occurs in, with no
    /// fallback move.
    fn decide(
        &mut self,
        me: &AgentView<'_>,
        opponent: &AgentView<'_>,
        opponent_history: &[bool],
    ) -> Result<bool, PolicyError>;

    /// Independent, state-reset copy of this policy.
    fn fork(&self) -> Box<dyn Policy>;

    /// Stable policy name for registries and reports.
    fn name(&self) -> &str;

    /// Declared behavioral archetype, exposed to opponents via [`AgentView`].
    fn tag(&self) -> PolicyTag {
        PolicyTag::Unknown
    }

    /// Whether this policy conditions on opponents' declared tags.
    ///
    /// Tag-aware policies break the "policy is an opaque decision function"
    /// assumption and should be excluded from fairness-sensitive tournaments.
    fn tag_aware(&self) -> bool {
        false
    }
}
