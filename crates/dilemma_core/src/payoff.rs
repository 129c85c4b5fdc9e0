//! Fixed payoff matrix for the iterated dilemma.
//!
//! Moves are booleans throughout the engine: `true` = cooperate,
//! `false` = defect.

/// Both sides cooperated.
pub const REWARD: i64 = 3;
/// Cooperated against a defector.
pub const SUCKER: i64 = 0;
/// Defected against a cooperator.
pub const TEMPTATION: i64 = 5;
/// Both sides defected.
pub const PUNISHMENT: i64 = 1;

/// Resolve one round between two moves, returning `(payoff_a, payoff_b)`.
pub fn payoff(a: bool, b: bool) -> (i64, i64) {
    match (a, b) {
        (true, true) => (REWARD, REWARD),
        (true, false) => (SUCKER, TEMPTATION),
        (false, true) => (TEMPTATION, SUCKER),
        (false, false) => (PUNISHMENT, PUNISHMENT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_is_exact() {
        assert_eq!(payoff(true, true), (3, 3));
        assert_eq!(payoff(true, false), (0, 5));
        assert_eq!(payoff(false, true), (5, 0));
        assert_eq!(payoff(false, false), (1, 1));
    }

    #[test]
    fn matrix_is_symmetric() {
        for a in [true, false] {
            for b in [true, false] {
                let (pa, pb) = payoff(a, b);
                assert_eq!(payoff(b, a), (pb, pa));
            }
        }
    }
}
