//! # Table Errors
//!
//! Startup failures are fatal and surface as [`TableError`]. Contention between
//! philosophers is never an error; it is handled inside the acquisition protocol.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while setting up, running or tearing down a table.
#[derive(Debug, Error)]
pub enum TableError {
    /// A configured value is unusable: an unnamed seat, an inverted sleep range or a zero
    /// report period.
    #[error("Invalid table configuration: {0}")]
    InvalidConfig(String),

    /// The fork ring could not be laid out, e.g. fewer than two seats.
    #[error("Failed to initialise forks: {0}")]
    ResourceInit(String),

    /// A philosopher task could not be started. No philosopher is running when this is returned.
    #[error("Failed to start philosopher {name}: {reason}")]
    ActorStart { name: String, reason: String },

    /// A philosopher task panicked or was aborted before it left the table.
    #[error("Philosopher {name} task failed: {source}")]
    ActorPanicked {
        name: String,
        #[source]
        source: tokio::task::JoinError,
    },
}

/// Errors raised while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
