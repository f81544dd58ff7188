//! Error types for view dispatch.

use thiserror::Error;

/// Per-request failures. Each variant maps to one HTTP status at the
/// server boundary; none of them outlive the request.
#[derive(Error, Debug)]
pub enum ViewError {
    #[error("not found")]
    NotFound,

    #[error("{message}")]
    Io { message: String },

    #[error("search tool '{tool}' is unavailable: {reason}")]
    ToolUnavailable { tool: String, reason: String },

    #[error("render failed: {reason}")]
    Render { reason: String },
}

impl From<std::io::Error> for ViewError {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::NotFound {
            ViewError::NotFound
        } else {
            ViewError::Io {
                message: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_not_found_maps_to_not_found() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(matches!(ViewError::from(err), ViewError::NotFound));
    }

    #[test]
    fn test_other_io_keeps_message() {
        let err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        match ViewError::from(err) {
            ViewError::Io { message } => assert_eq!(message, "denied"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
