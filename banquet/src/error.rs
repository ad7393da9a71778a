use std::io;

use thiserror::Error;

/// Errors produced while validating a simulation configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("philosopher count must be between 1 and {max} (got {got})", max = crate::config::MAX_PHILOSOPHERS)]
    PhilosopherCount { got: usize },
    #[error("{name} must be at least 60ms (got {got_ms}ms)")]
    TimingTooShort { name: &'static str, got_ms: u64 },
    #[error("meal target must be at least 1")]
    MealTargetZero,
}

/// Errors that abort a run outside the simulated outcomes.
///
/// A starvation death or a satisfied table is never an error; both are
/// reported through [`Outcome`](crate::Outcome). These variants cover the
/// runtime itself failing.
#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to spawn {name} thread")]
    ThreadSpawn {
        name: String,
        #[source]
        source: io::Error,
    },
    #[error("{name} thread panicked: {message}")]
    ThreadPanic { name: String, message: String },
    #[error("internal simulation error: {0}")]
    Other(#[from] anyhow::Error),
}
