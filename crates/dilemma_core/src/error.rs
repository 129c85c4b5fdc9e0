use thiserror::Error;

/// Failure raised inside a policy's decision call.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct PolicyError {
    pub message: String,
}

impl PolicyError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Fatal failure of a single match-engine run.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A decision call failed. There is no fallback move; the run is dead.
    #[error("policy fault: `{agent}` deciding against `{opponent}` in round {round}: {source}")]
    PolicyFault {
        agent: String,
        opponent: String,
        round: u32,
        #[source]
        source: PolicyError,
    },
}
