//! Error types for ecdeps

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for ecdeps operations
#[derive(Error, Debug)]
pub enum EcdepsError {
    #[error("Cannot read EasyConfig {}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid '{field}' in EasyConfig: {message}")]
    Parse { field: String, message: String },

    #[error("Search executable not found: {0}")]
    ExecutableNotFound(String),

    #[error("Search for '{query}' failed: {status}")]
    SearchFailed { query: String, status: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EcdepsError {
    /// Whether the run must stop when this error is raised
    pub fn is_fatal(&self) -> bool {
        !matches!(self, EcdepsError::SearchFailed { .. })
    }
}

/// Result type alias for ecdeps operations
pub type Result<T> = std::result::Result<T, EcdepsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_failure_is_not_fatal() {
        let err = EcdepsError::SearchFailed {
            query: "zlib-1.2.13".to_string(),
            status: "exit status: 1".to_string(),
        };
        assert!(!err.is_fatal());
        assert!(EcdepsError::ExecutableNotFound("eb".to_string()).is_fatal());
    }

    #[test]
    fn test_file_access_message_names_path() {
        let err = EcdepsError::FileAccess {
            path: PathBuf::from("/nope/foo.eb"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("/nope/foo.eb"));
    }
}
