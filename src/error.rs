//! Error types for loading and validating game configuration.
//!
//! Gameplay itself has no failure states; everything that can go wrong
//! happens before a round starts.

use std::io;
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(#[from] LevelTableError),

    #[error("round length must be at least one second")]
    ZeroRoundLength,

    #[error("a survival round needs at least one life")]
    ZeroLives,
}

/// Problems with a level table supplied through configuration.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum LevelTableError {
    #[error("level table is empty")]
    Empty,

    #[error("level numbers must count up from 1: expected {expected}, found {found}")]
    OutOfSequence { expected: u32, found: u32 },

    #[error("level {level} threshold {threshold} is below the previous level's {previous}")]
    DecreasingThreshold { level: u32, threshold: u32, previous: u32 },

    #[error("level {0} has a zero spawn interval or display duration")]
    ZeroDuration(u32),
}
