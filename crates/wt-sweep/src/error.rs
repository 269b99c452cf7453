use std::path::PathBuf;

use thiserror::Error;

use wt_core::ConfigError;
use wt_output::OutputError;
use wt_sim::SimError;

#[derive(Debug, Error)]
pub enum SweepError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Sim(#[from] SimError),

    #[error("output error: {0}")]
    Output(#[from] OutputError),

    #[error("failed to read sweep config {path}: {source}")]
    ReadConfig {
        path:   PathBuf,
        source: std::io::Error,
    },

    #[error("invalid sweep config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("sweep has no points: {0} axis is empty")]
    EmptyAxis(&'static str),
}

pub type SweepResult<T> = Result<T, SweepError>;
