//! Configuration error type.
//!
//! A `ConfigError` is fatal to the single run whose parameters produced it and
//! to nothing else; the sweep records it and moves on.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("unsupported channel width {width_mhz} MHz for the {band} GHz band")]
    UnsupportedChannel { band: u32, width_mhz: u16 },

    #[error("unsupported band {0} GHz (expected 5 or 6)")]
    UnsupportedBand(u32),

    #[error("{what} must be positive, got {value}")]
    NonPositive { what: &'static str, value: f64 },

    #[error("invalid start-time jitter: {0}")]
    Jitter(String),

    #[error("configuration error: {0}")]
    Invalid(String),
}

/// Shorthand result type for configuration-time operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
