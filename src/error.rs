//! Error types for Boardsync
//!
//! Uses `thiserror` for library errors. Every variant is fatal to the
//! current run; nothing here is retried.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Boardsync operations
pub type BoardsyncResult<T> = Result<T, BoardsyncError>;

/// Main error type for Boardsync operations
#[derive(Error, Debug)]
pub enum BoardsyncError {
    /// Named project does not exist under the projects directory
    #[error("no project named '{name}' at {path} - choose from: {}", .available.join(", "))]
    ProjectNotFound {
        name: String,
        path: PathBuf,
        available: Vec<String>,
    },

    /// Target volume is not mounted (directory missing)
    #[error("target {path} is not mounted - please mount the board first")]
    TargetNotMounted { path: PathBuf },

    /// Refusing to delete more entries than the safety cap allows
    #[error("refusing to remove {count} entries from {path} (safety cap is {cap})")]
    SafetyLimitExceeded {
        path: PathBuf,
        count: usize,
        cap: usize,
    },

    /// User declined a deletion prompt
    #[error("stopped at user request")]
    UserAborted,

    /// Bundle download failed
    #[error("failed to download bundle '{name}' from {url}: {source}")]
    Network {
        name: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Downloaded bundle archive is corrupt or unreadable
    #[error("bundle archive {path} is not a readable zip: {message}")]
    Archive { path: PathBuf, message: String },

    /// Cached bundle is missing its `lib` directory
    #[error("cached bundle {path} has no lib directory - delete the cache and retry")]
    CacheCorrupt { path: PathBuf },

    /// Requirement name matched nothing in any cached bundle
    #[error("could not find requirement '{name}' in any cached bundle")]
    RequirementNotFound { name: String },

    /// Invalid boardsync.toml
    #[error("invalid config {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BoardsyncError {
    /// Process exit status for this error.
    ///
    /// A declined deletion is a clean abort (1), everything else is an
    /// operational failure (2).
    pub fn exit_code(&self) -> i32 {
        match self {
            BoardsyncError::UserAborted => 1,
            _ => 2,
        }
    }
}
