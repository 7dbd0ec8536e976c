//! Errors at the few fallible boundaries (config loading).
//!
//! Gameplay systems never return errors: a missing collaborator is logged and
//! the dependent action is skipped for that tick.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read tunables from {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse tunables: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("invalid tunables: {0}")]
    Invalid(String),
}
