//! Task source error types.

use std::path::PathBuf;

/// Errors that can occur while reading tasks from disk.
#[derive(Debug, thiserror::Error)]
pub enum TaskSourceError {
    /// The tasks directory exists but could not be listed.
    #[error("Failed to read tasks directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A single task file could not be read.
    #[error("Failed to read task file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A task file is not valid task JSON.
    #[error("Failed to parse task file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A task file exceeds the size limit.
    #[error("Task file {path} is too large ({size} bytes)")]
    TooLarge { path: PathBuf, size: u64 },
}
