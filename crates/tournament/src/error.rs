use thiserror::Error;

/// Failures at batch granularity. Per-run faults never surface here — they
/// are logged and their contribution dropped.
#[derive(Debug, Error)]
pub enum BatchError {
    /// Rejected before any scheduling happens.
    #[error("a batch needs at least 2 agents, got {0}")]
    RosterTooSmall(usize),

    /// The worker pool could not be brought up at all.
    #[error("failed to build worker pool")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    /// Every run of the batch failed or timed out; there is nothing to
    /// aggregate.
    #[error("no runs of the batch completed (failed: {failed}, timed out: {timed_out})")]
    NoCompletedRuns { failed: u32, timed_out: u32 },
}

/// Failures of the tournament as a whole.
#[derive(Debug, Error)]
pub enum TournamentError {
    #[error(transparent)]
    Batch(#[from] BatchError),

    #[error("unknown policy id `{0}`")]
    UnknownPolicy(String),

    #[error("duplicate agent identity `{0}` in roster")]
    DuplicateIdentity(String),

    #[error("roster is empty after filtering")]
    EmptyRoster,

    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to write report: {0}")]
    ReportIo(#[from] std::io::Error),

    #[error("failed to serialize report: {0}")]
    ReportSerialize(#[from] serde_json::Error),
}
