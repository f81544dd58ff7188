//! Error types for the reload watcher.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from watcher operations.
///
/// Only [`WatchError::InitFailed`] stops the watcher from starting. The
/// others are logged and the loop carries on.
#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Failed to initialize watcher: {reason}")]
    InitFailed { reason: String },

    #[error("Cannot watch path {path}: {reason}")]
    PathWatchFailed { path: PathBuf, reason: String },

    #[error("File system event error: {details}")]
    EventError { details: String },
}

impl From<notify::Error> for WatchError {
    fn from(e: notify::Error) -> Self {
        WatchError::InitFailed {
            reason: e.to_string(),
        }
    }
}
