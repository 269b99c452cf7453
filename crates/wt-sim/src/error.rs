use thiserror::Error;

use wt_core::{ConfigError, SimTime};

#[derive(Debug, Error)]
pub enum SimError {
    #[error("run configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("engine reports {got} {what}, configuration expects {expected}")]
    CountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("no access point with a routable address for fixed-start traffic")]
    NoTrafficTarget,

    #[error("engine event at {event} precedes the run clock at {now}")]
    ClockRegression { now: SimTime, event: SimTime },

    #[error("engine error: {0}")]
    Medium(String),
}

pub type SimResult<T> = Result<T, SimError>;
