//! Error types for the search pipeline.

use thiserror::Error;

use crate::view::ViewError;

#[derive(Error, Debug)]
pub enum SearchError {
    /// The search binary is missing or could not be started.
    #[error("cannot start '{tool}': {reason}")]
    ToolUnavailable { tool: String, reason: String },
}

impl From<SearchError> for ViewError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::ToolUnavailable { tool, reason } => {
                ViewError::ToolUnavailable { tool, reason }
            }
        }
    }
}
